//! Plain-text report rendering. Every function here is pure: the same
//! findings and timestamp always render the same text.

use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::info;

use crate::config::LIMITS;
use crate::copyedit::CopyeditAnalysis;
use crate::developmental::DevelopmentalAnalysis;
use crate::error::{EditorError, Result};
use crate::style_sheet::{StyleCategory, StyleSheet};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heavy_rule() -> String {
    "=".repeat(LIMITS.heavy_rule_width)
}

fn light_rule() -> String {
    "-".repeat(LIMITS.light_rule_width)
}

/// `dialogue_tag_frequency` -> `Dialogue Tag Frequency`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strings print bare; everything else prints as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ranked developmental entries: `[word, count]` prints as `word (count)`.
fn display_ranked(value: &Value) -> String {
    match value {
        Value::Array(pair) => match pair.as_slice() {
            [word @ Value::String(_), count @ Value::Number(_)] => {
                format!("{} ({})", display_value(word), display_value(count))
            }
            _ => display_value(value),
        },
        other => display_value(other),
    }
}

fn header(title: &str, manuscript_path: &Path, generated: NaiveDateTime) -> Vec<String> {
    vec![
        heavy_rule(),
        title.to_string(),
        heavy_rule(),
        format!("Manuscript: {}", manuscript_path.display()),
        format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
    ]
}

// ---------------------------------------------------------------------------
// Developmental report
// ---------------------------------------------------------------------------

pub fn developmental_report(
    manuscript_path: &Path,
    analysis: &DevelopmentalAnalysis,
    generated: NaiveDateTime,
) -> Result<String> {
    let mut lines = header("DEVELOPMENTAL EDITING REPORT", manuscript_path, generated);

    for (section, findings) in analysis.sections()? {
        lines.push(format!("\n{} ANALYSIS", section.to_uppercase()));
        lines.push(light_rule());

        let Value::Object(fields) = findings else {
            continue;
        };
        for (key, value) in &fields {
            match value {
                Value::Array(items) if key == "questions" => {
                    lines.push("\nKEY QUESTIONS:".to_string());
                    for q in items {
                        lines.push(format!("  \u{2753} {}", display_value(q)));
                    }
                }
                Value::Array(items) if !items.is_empty() => {
                    lines.push(format!("\n{}:", title_case(key)));
                    for item in items.iter().take(LIMITS.report_list_cap) {
                        lines.push(format!("  \u{2022} {}", display_ranked(item)));
                    }
                }
                Value::Array(_) | Value::Object(_) => {}
                scalar => lines.push(format!("\n{}: {}", title_case(key), display_value(scalar))),
            }
        }
    }

    Ok(lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Copyediting report
// ---------------------------------------------------------------------------

pub fn copyedit_report(
    manuscript_path: &Path,
    analysis: &CopyeditAnalysis,
    sheet: &StyleSheet,
    generated: NaiveDateTime,
) -> Result<String> {
    let mut lines = header("COPYEDITING REPORT", manuscript_path, generated);

    for (title, findings) in analysis.sections()? {
        lines.push(format!("\n{title}"));
        lines.push(light_rule());

        let Value::Object(fields) = findings else {
            continue;
        };
        for (key, value) in &fields {
            match value {
                Value::Array(items) if key == "checks_needed" || key == "remember" => {
                    lines.push(format!("\n{}:", title_case(key).to_uppercase()));
                    for item in items {
                        lines.push(format!("  \u{2757} {}", display_value(item)));
                    }
                }
                Value::Object(entries) => {
                    lines.push(format!("\n{}:", title_case(key)));
                    for (k, v) in entries.iter().take(LIMITS.report_list_cap) {
                        lines.push(format!("  \u{2022} {k}: {}", display_value(v)));
                    }
                }
                Value::Array(items) => {
                    lines.push(format!("\n{}: {} found", title_case(key), items.len()));
                    if items.len() <= LIMITS.report_list_cap {
                        for item in items {
                            lines.push(format!("  \u{2022} {}", display_value(item)));
                        }
                    }
                }
                scalar => lines.push(format!("\n{}: {}", title_case(key), display_value(scalar))),
            }
        }
    }

    lines.push(format!("\n\n{}", style_sheet_report(sheet)));
    Ok(lines.join("\n"))
}

/// Developmental and copyediting reports joined by a heavy rule.
pub fn full_report(developmental: &str, copyedit: &str) -> String {
    format!("{developmental}\n\n{}\n\n{copyedit}", heavy_rule())
}

// ---------------------------------------------------------------------------
// Style sheet report
// ---------------------------------------------------------------------------

fn timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn style_sheet_report(sheet: &StyleSheet) -> String {
    let mut lines = vec![
        heavy_rule(),
        format!("STYLE SHEET: {}", sheet.manuscript),
        heavy_rule(),
        format!("Created: {}", timestamp(&sheet.created)),
        format!("Last Updated: {}", timestamp(&sheet.last_updated)),
        String::new(),
    ];

    let entries = [
        ("\nCHARACTERS", &sheet.characters),
        ("\n\nPLACES", &sheet.places),
    ];
    for (heading, named) in entries {
        if named.is_empty() {
            continue;
        }
        lines.push(heading.to_string());
        lines.push(light_rule());
        for (name, attributes) in named {
            lines.push(format!("\n{name}:"));
            for (key, value) in attributes {
                lines.push(format!("  \u{2022} {key}: {}", display_value(value)));
            }
        }
    }

    if !sheet.timeline.is_empty() {
        lines.push("\n\nTIMELINE".to_string());
        lines.push(light_rule());
        for event in sheet.ordered_timeline() {
            lines.push(format!(
                "\n{}: {}",
                event.timestamp.as_deref().unwrap_or("N/A"),
                event.description
            ));
        }
    }

    if !sheet.queries.is_empty() {
        lines.push("\n\nEDITOR QUERIES".to_string());
        lines.push(light_rule());
        for (i, query) in sheet.queries.iter().enumerate() {
            lines.push(format!(
                "\n[Q{}] Location: {}",
                i + 1,
                query.location.as_deref().unwrap_or("N/A")
            ));
            lines.push(format!("     {}", query.question));
        }
    }

    let style = &sheet.general_style;
    if StyleCategory::ALL.iter().any(|c| !style.category(*c).is_empty()) {
        lines.push("\n\nSTYLE CONVENTIONS".to_string());
        lines.push(light_rule());
        for category in StyleCategory::ALL {
            let terms = style.category(category);
            if terms.is_empty() {
                continue;
            }
            lines.push(format!("\n{}:", title_case(category.as_str())));
            for (term, choice) in terms {
                lines.push(format!("  \u{2022} {term}: {}", display_value(choice)));
            }
        }
    }

    if !sheet.consistency_notes.is_empty() {
        lines.push("\n\nCONSISTENCY NOTES".to_string());
        lines.push(light_rule());
        for note in &sheet.consistency_notes {
            lines.push(format!("  \u{2022} {note}"));
        }
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Write a rendered report verbatim.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| EditorError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "report saved");
    Ok(())
}
