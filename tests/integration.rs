use std::path::{Path, PathBuf};
use std::process::Command;

use manuscript_lint::{
    analyze_concept, analyze_dialogue, analyze_narrative, analyze_rhythm, analyze_thesis,
    check_consistency, check_facts, check_grammar, Attributes, CopyeditAnalysis,
    DevelopmentalAnalysis, EditorError, Manuscript, Query, StyleSheetStore, TimelineEvent,
};
use serde_json::{json, Value};
use tempfile::TempDir;

const SAMPLE: &str = "\
Chapter 1

Elena woke before dawn. The orchard was silent. Elena listened.

\"Are you awake?\" Marco whispered.
Elena pulled on her boots.

\"Always,\" she said. \"Always, always,\" she said again, \"until the harvest.\"

They walked from Valencia to Toledo in 1985. Elena remembered Monday. Elena remembered the night.
Elena never forgot. Elena. Elena.

Chapter 2

By 2024 the orchard was gone. Gone.
";

fn write_manuscript(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_manuscript-lint"))
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

#[test]
fn word_count_equals_whitespace_tokens() {
    let result = analyze_concept(SAMPLE);
    assert_eq!(result.word_count, SAMPLE.split_whitespace().count());
}

#[test]
fn themes_are_long_non_stop_words_in_descending_order() {
    let result = analyze_thesis(SAMPLE);
    assert!(!result.frequent_themes.is_empty());
    for (word, _) in &result.frequent_themes {
        assert!(word.chars().count() > 4, "{word} is too short");
        assert!(!["would", "could", "should", "these", "those", "their", "might"]
            .contains(&word.as_str()));
    }
    for pair in result.frequent_themes.windows(2) {
        assert!(pair[0].1 >= pair[1].1, "themes not sorted: {pair:?}");
    }
    assert_eq!(result.frequent_themes[0], ("elena".to_string(), 8));
}

#[test]
fn narrative_counts_chapters_in_order() {
    let result = analyze_narrative(SAMPLE);
    assert_eq!(result.chapter_count, 2);
    assert_eq!(result.chapters_found, vec!["Chapter 1", "Chapter 2"]);
    assert_eq!(result.time_marker_samples, vec!["Monday", "dawn", "night"]);
    assert_eq!(result.time_markers_found, 3);
}

#[test]
fn rhythm_reports_mean_of_three_sentences() {
    let result = analyze_rhythm("Rain fell hard. The wind howled all night! Did the old barn survive the storm?");
    assert_eq!(result.total_sentences, 3);
    assert_eq!(result.average_sentence_length, 5.0);
}

#[test]
fn three_quoted_spans_are_three_dialogue_instances() {
    let text = r#"He said "yes" and "no" and finally "I don't know, maybe.""#;
    assert_eq!(analyze_dialogue(text).dialogue_instances, 3);
    assert_eq!(analyze_rhythm(text).dialogue_instances, 3);
}

#[test]
fn years_outside_range_are_ignored() {
    let result = check_facts("In 1985 and 2024, the clock read 1234 and 2150 and 1899.");
    assert_eq!(result.years_mentioned, vec!["1985", "2024"]);
}

#[test]
fn sample_copyedit_findings() {
    let consistency = check_consistency(SAMPLE);
    assert_eq!(consistency.character_names, vec![("Elena".to_string(), 8)]);
    assert!(consistency.potential_variants.is_empty());
    assert_eq!(consistency.places_mentioned, vec!["Toledo", "Valencia"]);

    let dialogue = analyze_dialogue(SAMPLE);
    assert_eq!(dialogue.dialogue_tag_frequency[0], ("said".to_string(), 2));
    assert_eq!(dialogue.action_beats_found, 1);

    let grammar = check_grammar(SAMPLE);
    assert_eq!(grammar.comma_splices_in_dialogue, 1);
    assert!(grammar.potential_fragments > 0);
}

#[test]
fn extractors_are_idempotent() {
    let dev_a = serde_json::to_string(&DevelopmentalAnalysis::run(SAMPLE)).unwrap();
    let dev_b = serde_json::to_string(&DevelopmentalAnalysis::run(SAMPLE)).unwrap();
    assert_eq!(dev_a, dev_b);

    let copy_a = serde_json::to_string(&CopyeditAnalysis::run(SAMPLE)).unwrap();
    let copy_b = serde_json::to_string(&CopyeditAnalysis::run(SAMPLE)).unwrap();
    assert_eq!(copy_a, copy_b);
}

#[test]
fn findings_keep_reference_key_order() {
    let json = serde_json::to_value(analyze_narrative(SAMPLE)).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "chapter_count",
            "chapters_found",
            "time_markers_found",
            "time_marker_samples",
            "questions"
        ]
    );

    let json = serde_json::to_value(analyze_dialogue(SAMPLE)).unwrap();
    assert!(json["dialogue_tag_frequency"].is_object());
    assert_eq!(json["dialogue_tag_frequency"]["said"], 2);
}

// ---------------------------------------------------------------------------
// Style sheet
// ---------------------------------------------------------------------------

#[test]
fn character_round_trip() {
    let dir = TempDir::new().unwrap();
    let manuscript = write_manuscript(dir.path(), "orchard.txt", SAMPLE);

    let mut store = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap();
    store
        .add_character("Elena", attrs(&[("role", "protagonist")]))
        .unwrap();

    let reloaded = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap();
    let sheet = reloaded.sheet();
    assert_eq!(
        serde_json::to_value(&sheet.characters).unwrap(),
        json!({"Elena": {"role": "protagonist"}})
    );
    assert!(sheet.last_updated > sheet.created);
    assert_eq!(sheet.manuscript, "orchard");
    assert_eq!(reloaded.path(), dir.path().join("orchard_style_sheet.json"));
}

#[test]
fn new_sheet_is_not_written_until_mutated() {
    let dir = TempDir::new().unwrap();
    let manuscript = write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let store = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap();
    assert!(!store.path().exists());

    store.persist().unwrap();
    assert!(store.path().exists());
}

#[test]
fn every_mutation_persists_whole_sheet() {
    let dir = TempDir::new().unwrap();
    let manuscript = write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let mut store = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap();

    store.add_place("Toledo", attrs(&[("kind", "city")])).unwrap();
    store
        .add_timeline_event(TimelineEvent::new(
            2,
            Some("1985, autumn".to_string()),
            "Walk to Toledo",
        ))
        .unwrap();
    store
        .add_query(Query::new(
            Some("ch. 2".to_string()),
            "When was the orchard sold?",
        ))
        .unwrap();
    store.add_consistency_note("Marco is never described").unwrap();

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["places"]["Toledo"]["kind"], "city");
    assert_eq!(raw["timeline"][0]["order"], 2);
    assert_eq!(raw["queries"][0]["question"], "When was the orchard sold?");
    assert_eq!(raw["consistency_notes"][0], "Marco is never described");
    for key in [
        "manuscript",
        "created",
        "last_updated",
        "general_style",
        "characters",
        "places",
        "timeline",
        "dialogue_patterns",
        "consistency_notes",
        "queries",
    ] {
        assert!(raw.get(key).is_some(), "missing key {key}");
    }
    assert!(raw["general_style"]["special_terms"].is_object());

    let report = store.render();
    assert!(report.contains("\nToledo:\n  \u{2022} kind: city"));
    assert!(report.contains("\n1985, autumn: Walk to Toledo"));
    assert!(report.contains("[Q1] Location: ch. 2"));
}

#[test]
fn corrupt_sheet_is_fatal() {
    let dir = TempDir::new().unwrap();
    let manuscript = write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    std::fs::write(dir.path().join("orchard_style_sheet.json"), "{ not json").unwrap();

    let err = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap_err();
    assert!(matches!(err, EditorError::CorruptStyleSheet { .. }));
}

#[test]
fn manuscript_loads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let manuscript = Manuscript::load(&path).unwrap();
    assert_eq!(manuscript.name(), "orchard");
    assert_eq!(manuscript.text(), SAMPLE);
}

#[test]
fn windows_line_endings_load_as_unix() {
    let dir = TempDir::new().unwrap();
    let path = write_manuscript(dir.path(), "orchard.txt", &SAMPLE.replace('\n', "\r\n"));
    let manuscript = Manuscript::load(&path).unwrap();
    assert_eq!(manuscript.text(), SAMPLE);
    assert_eq!(
        analyze_concept(manuscript.text()).paragraph_count,
        analyze_concept(SAMPLE).paragraph_count
    );
}

#[test]
fn list_attributes_render_as_stored() {
    let dir = TempDir::new().unwrap();
    let manuscript = write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let mut store = StyleSheetStore::load_or_create(dir.path(), &manuscript).unwrap();
    let mut elena = attrs(&[("role", "protagonist")]);
    elena.insert("aliases".to_string(), json!(["Ellie", "Lena"]));
    store.add_character("Elena", elena).unwrap();

    let rendered = store.render();
    assert!(rendered.contains(r#"aliases: ["Ellie","Lena"]"#));
    assert!(!rendered.contains("Ellie (Lena)"));
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[test]
fn missing_manuscript_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let status = bin()
        .current_dir(dir.path())
        .args(["concept", "nowhere.txt"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn unknown_command_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let status = bin()
        .current_dir(dir.path())
        .args(["summarize", "orchard.txt"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn single_extractor_prints_json() {
    let dir = TempDir::new().unwrap();
    write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let out = bin()
        .current_dir(dir.path())
        .args(["facts", "orchard.txt"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let parsed: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["years_mentioned"], json!(["1985", "2024"]));
}

#[test]
fn full_report_goes_to_output_file() {
    let dir = TempDir::new().unwrap();
    write_manuscript(dir.path(), "orchard.txt", SAMPLE);
    let out = bin()
        .current_dir(dir.path())
        .args(["full-report", "orchard.txt", "-o", "report.txt"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty(), "report should not also be printed");

    let report = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(report.contains("DEVELOPMENTAL EDITING REPORT"));
    assert!(report.contains("COPYEDITING REPORT"));
    assert!(report.contains("STYLE SHEET: orchard"));
    let dev_at = report.find("DEVELOPMENTAL EDITING REPORT").unwrap();
    let copy_at = report.find("COPYEDITING REPORT").unwrap();
    assert!(dev_at < copy_at);
}

#[test]
fn style_sheet_commands_edit_the_sheet() {
    let dir = TempDir::new().unwrap();
    write_manuscript(dir.path(), "orchard.txt", SAMPLE);

    let status = bin()
        .current_dir(dir.path())
        .args([
            "style-sheet",
            "orchard.txt",
            "add-character",
            "Elena",
            "role=protagonist",
            "eyes=grey",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let status = bin()
        .current_dir(dir.path())
        .args(["style-sheet", "orchard.txt", "set-convention", "spelling", "grey", "grey, not gray"])
        .status()
        .unwrap();
    assert!(status.success());

    let out = bin()
        .current_dir(dir.path())
        .args(["style-sheet", "orchard.txt"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let shown = String::from_utf8(out.stdout).unwrap();
    assert!(shown.contains("\nElena:\n  \u{2022} role: protagonist\n  \u{2022} eyes: grey"));
    assert!(shown.contains("\nSpelling:\n  \u{2022} grey: grey, not gray"));
}
