use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, Level};

use manuscript_lint::manuscript::require_exists;
use manuscript_lint::report::{copyedit_report, developmental_report, full_report, write_report};
use manuscript_lint::{
    analyze_concept, analyze_dialogue, analyze_narrative, analyze_rhythm, analyze_thesis,
    check_consistency, check_facts, check_grammar, Attributes, CopyeditAnalysis,
    DevelopmentalAnalysis, Manuscript, Query, StyleCategory, StyleSheetStore, TimelineEvent,
};

#[derive(Parser)]
#[command(
    name = "manuscript-lint",
    about = "Developmental and copyediting analysis for fiction manuscripts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write the report to this file instead of printing it
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Directory holding <manuscript>_style_sheet.json files
    #[arg(long, global = true, default_value = ".")]
    sheet_dir: PathBuf,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct Target {
    /// Path to the manuscript text file
    manuscript: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full developmental editing analysis
    DevAnalysis(Target),
    /// Analyze story concept and premise
    Concept(Target),
    /// Identify the central theme from recurring vocabulary
    Thesis(Target),
    /// Analyze narrative structure and timeline markers
    Narrative(Target),
    /// Analyze pacing and sentence rhythm
    Rhythm(Target),
    /// Run the full copyediting analysis
    Copyedit(Target),
    /// Check internal consistency of names and places
    Consistency(Target),
    /// Analyze dialogue and dialogue tags
    Dialogue(Target),
    /// Check grammar with fiction-appropriate expectations
    Grammar(Target),
    /// List years and locations worth fact-checking
    Facts(Target),
    /// Show or edit the manuscript's style sheet
    StyleSheet {
        /// Path to the manuscript text file
        manuscript: PathBuf,
        #[command(subcommand)]
        action: Option<SheetAction>,
    },
    /// Run both developmental and copyediting analyses
    FullReport(Target),
}

#[derive(Subcommand)]
enum SheetAction {
    /// Print the style sheet (default)
    Show,
    /// Add or replace a character entry
    AddCharacter {
        name: String,
        /// Attributes as KEY=VALUE
        #[arg(value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Add or replace a place entry
    AddPlace {
        name: String,
        /// Attributes as KEY=VALUE
        #[arg(value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Append a timeline event
    AddEvent {
        #[arg(long, default_value_t = 0)]
        order: i64,
        #[arg(long)]
        description: String,
        /// In-story time, e.g. "Day 3, evening"
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Append an editor query
    AddQuery {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        question: String,
    },
    /// Append a free-text consistency note
    AddNote { text: String },
    /// Record a style convention, e.g. `spelling grey "grey, not gray"`
    SetConvention {
        category: StyleCategory,
        term: String,
        choice: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let output = cli.output.as_deref();
    let sheet_dir = cli.sheet_dir.as_path();

    match cli.command {
        Command::DevAnalysis(t) => {
            let manuscript = load(&t)?;
            emit(output, &dev_report(&manuscript)?)
        }
        Command::Concept(t) => emit_json(output, &analyze_concept(load(&t)?.text())),
        Command::Thesis(t) => emit_json(output, &analyze_thesis(load(&t)?.text())),
        Command::Narrative(t) => emit_json(output, &analyze_narrative(load(&t)?.text())),
        Command::Rhythm(t) => emit_json(output, &analyze_rhythm(load(&t)?.text())),
        Command::Copyedit(t) => {
            let manuscript = load(&t)?;
            emit(output, &copy_report(&manuscript, sheet_dir)?)
        }
        Command::Consistency(t) => emit_json(output, &check_consistency(load(&t)?.text())),
        Command::Dialogue(t) => emit_json(output, &analyze_dialogue(load(&t)?.text())),
        Command::Grammar(t) => emit_json(output, &check_grammar(load(&t)?.text())),
        Command::Facts(t) => emit_json(output, &check_facts(load(&t)?.text())),
        Command::StyleSheet { manuscript, action } => {
            run_style_sheet(&manuscript, sheet_dir, action.unwrap_or(SheetAction::Show), output)
        }
        Command::FullReport(t) => {
            info!("running comprehensive editing analysis");
            let manuscript = load(&t)?;
            let dev = dev_report(&manuscript)?;
            let copy = copy_report(&manuscript, sheet_dir)?;
            emit(output, &full_report(&dev, &copy))
        }
    }
}

fn load(target: &Target) -> Result<Manuscript> {
    Ok(Manuscript::load(&target.manuscript)?)
}

fn dev_report(manuscript: &Manuscript) -> Result<String> {
    let analysis = DevelopmentalAnalysis::run(manuscript.text());
    Ok(developmental_report(
        manuscript.path(),
        &analysis,
        Local::now().naive_local(),
    )?)
}

fn copy_report(manuscript: &Manuscript, sheet_dir: &Path) -> Result<String> {
    let store = StyleSheetStore::load_or_create(sheet_dir, manuscript.path())?;
    let analysis = CopyeditAnalysis::run(manuscript.text());
    Ok(copyedit_report(
        manuscript.path(),
        &analysis,
        store.sheet(),
        Local::now().naive_local(),
    )?)
}

fn run_style_sheet(
    manuscript: &Path,
    sheet_dir: &Path,
    action: SheetAction,
    output: Option<&Path>,
) -> Result<()> {
    require_exists(manuscript)?;
    let mut store = StyleSheetStore::load_or_create(sheet_dir, manuscript)?;

    match action {
        SheetAction::Show => return emit(output, &store.render()),
        SheetAction::AddCharacter { name, attributes } => {
            store.add_character(&name, to_attributes(attributes))?
        }
        SheetAction::AddPlace { name, attributes } => {
            store.add_place(&name, to_attributes(attributes))?
        }
        SheetAction::AddEvent {
            order,
            description,
            timestamp,
        } => store.add_timeline_event(TimelineEvent::new(order, timestamp, description))?,
        SheetAction::AddQuery { location, question } => {
            store.add_query(Query::new(location, question))?
        }
        SheetAction::AddNote { text } => store.add_consistency_note(&text)?,
        SheetAction::SetConvention {
            category,
            term,
            choice,
        } => store.set_convention(category, &term, &choice)?,
    }

    println!("Style sheet saved: {}", store.path().display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => write_report(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}

fn emit_json<T: Serialize>(output: Option<&Path>, findings: &T) -> Result<()> {
    emit(output, &serde_json::to_string_pretty(findings)?)
}

fn parse_attribute(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty attribute name in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn to_attributes(pairs: Vec<(String, String)>) -> Attributes {
    pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}
