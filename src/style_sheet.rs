//! The persisted editorial style sheet for one manuscript.
//!
//! One JSON document per manuscript name, stored as
//! `<manuscript-stem>_style_sheet.json`. Every mutation computes a new sheet
//! from the current one, writes the whole document and only then replaces the
//! in-memory copy. There is no locking: two processes editing the same sheet
//! race and the last writer wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{EditorError, Result};
use crate::manuscript::manuscript_name;

/// Free-form attribute mapping for a character or place, in insertion order.
pub type Attributes = serde_json::Map<String, Value>;

/// Keys this version does not model, carried through load and save untouched.
pub type Extra = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralStyle {
    #[serde(default)]
    pub punctuation: BTreeMap<String, Value>,
    #[serde(default)]
    pub spelling: BTreeMap<String, Value>,
    #[serde(default)]
    pub capitalization: BTreeMap<String, Value>,
    #[serde(default)]
    pub numbers: BTreeMap<String, Value>,
    #[serde(default)]
    pub italics: BTreeMap<String, Value>,
    #[serde(default)]
    pub special_terms: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GeneralStyle {
    pub fn category(&self, category: StyleCategory) -> &BTreeMap<String, Value> {
        match category {
            StyleCategory::Punctuation => &self.punctuation,
            StyleCategory::Spelling => &self.spelling,
            StyleCategory::Capitalization => &self.capitalization,
            StyleCategory::Numbers => &self.numbers,
            StyleCategory::Italics => &self.italics,
            StyleCategory::SpecialTerms => &self.special_terms,
        }
    }

    fn category_mut(&mut self, category: StyleCategory) -> &mut BTreeMap<String, Value> {
        match category {
            StyleCategory::Punctuation => &mut self.punctuation,
            StyleCategory::Spelling => &mut self.spelling,
            StyleCategory::Capitalization => &mut self.capitalization,
            StyleCategory::Numbers => &mut self.numbers,
            StyleCategory::Italics => &mut self.italics,
            StyleCategory::SpecialTerms => &mut self.special_terms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCategory {
    Punctuation,
    Spelling,
    Capitalization,
    Numbers,
    Italics,
    SpecialTerms,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 6] = [
        StyleCategory::Punctuation,
        StyleCategory::Spelling,
        StyleCategory::Capitalization,
        StyleCategory::Numbers,
        StyleCategory::Italics,
        StyleCategory::SpecialTerms,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Punctuation => "punctuation",
            StyleCategory::Spelling => "spelling",
            StyleCategory::Capitalization => "capitalization",
            StyleCategory::Numbers => "numbers",
            StyleCategory::Italics => "italics",
            StyleCategory::SpecialTerms => "special_terms",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        StyleCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = StyleCategory::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown style category '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TimelineEvent {
    pub fn new(order: i64, timestamp: Option<String>, description: impl Into<String>) -> Self {
        Self {
            order,
            timestamp,
            description: description.into(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Query {
    pub fn new(location: Option<String>, question: impl Into<String>) -> Self {
        Self {
            location,
            question: question.into(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    pub manuscript: String,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub last_updated: NaiveDateTime,
    #[serde(default)]
    pub general_style: GeneralStyle,
    #[serde(default)]
    pub characters: BTreeMap<String, Attributes>,
    #[serde(default)]
    pub places: BTreeMap<String, Attributes>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub dialogue_patterns: serde_json::Map<String, Value>,
    #[serde(default)]
    pub consistency_notes: Vec<String>,
    #[serde(default)]
    pub queries: Vec<Query>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// ISO-8601 stamps at microsecond precision. Reading accepts any fractional
/// precision, including none.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&t.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<NaiveDateTime>().map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

impl StyleSheet {
    /// A fresh sheet with every collection empty.
    pub fn new(manuscript: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            manuscript: manuscript.into(),
            created: now,
            last_updated: now,
            general_style: GeneralStyle::default(),
            characters: BTreeMap::new(),
            places: BTreeMap::new(),
            timeline: Vec::new(),
            dialogue_patterns: serde_json::Map::new(),
            consistency_notes: Vec::new(),
            queries: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Add or replace a character entry.
    pub fn with_character(mut self, name: &str, attributes: Attributes, now: NaiveDateTime) -> Self {
        self.characters.insert(name.to_string(), attributes);
        self.touched(now)
    }

    /// Add or replace a place entry.
    pub fn with_place(mut self, name: &str, attributes: Attributes, now: NaiveDateTime) -> Self {
        self.places.insert(name.to_string(), attributes);
        self.touched(now)
    }

    pub fn with_timeline_event(mut self, event: TimelineEvent, now: NaiveDateTime) -> Self {
        self.timeline.push(event);
        self.touched(now)
    }

    pub fn with_query(mut self, query: Query, now: NaiveDateTime) -> Self {
        self.queries.push(query);
        self.touched(now)
    }

    pub fn with_consistency_note(mut self, note: &str, now: NaiveDateTime) -> Self {
        self.consistency_notes.push(note.to_string());
        self.touched(now)
    }

    pub fn with_convention(
        mut self,
        category: StyleCategory,
        term: &str,
        choice: &str,
        now: NaiveDateTime,
    ) -> Self {
        self.general_style
            .category_mut(category)
            .insert(term.to_string(), Value::String(choice.to_string()));
        self.touched(now)
    }

    /// Timeline events ordered by `order`; equal keys keep insertion order.
    pub fn ordered_timeline(&self) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> = self.timeline.iter().collect();
        events.sort_by_key(|e| e.order);
        events
    }

    // last_updated strictly advances on every mutation, even when the clock
    // has not moved or went backwards.
    fn touched(mut self, now: NaiveDateTime) -> Self {
        self.last_updated = if now > self.last_updated {
            now
        } else {
            self.last_updated + Duration::microseconds(1)
        };
        self
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A style sheet bound to its file on disk.
#[derive(Debug)]
pub struct StyleSheetStore {
    path: PathBuf,
    sheet: StyleSheet,
}

impl StyleSheetStore {
    /// `<dir>/<manuscript-stem>_style_sheet.json`
    pub fn sheet_path(dir: &Path, manuscript_path: &Path) -> PathBuf {
        dir.join(format!("{}_style_sheet.json", manuscript_name(manuscript_path)))
    }

    /// Load the persisted sheet for this manuscript, or start an empty one.
    ///
    /// A new sheet is only written once it is first mutated.
    pub fn load_or_create(dir: &Path, manuscript_path: &Path) -> Result<Self> {
        let path = Self::sheet_path(dir, manuscript_path);
        let sheet = if path.exists() {
            let json = std::fs::read_to_string(&path).map_err(|source| EditorError::Read {
                path: path.clone(),
                source,
            })?;
            let sheet: StyleSheet =
                serde_json::from_str(&json).map_err(|source| EditorError::CorruptStyleSheet {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), "loaded style sheet");
            sheet
        } else {
            debug!(path = %path.display(), "starting new style sheet");
            StyleSheet::new(manuscript_name(manuscript_path), now())
        };
        Ok(Self { path, sheet })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    pub fn add_character(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        let next = self.sheet.clone().with_character(name, attributes, now());
        self.commit(next)
    }

    pub fn add_place(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        let next = self.sheet.clone().with_place(name, attributes, now());
        self.commit(next)
    }

    pub fn add_timeline_event(&mut self, event: TimelineEvent) -> Result<()> {
        let next = self.sheet.clone().with_timeline_event(event, now());
        self.commit(next)
    }

    pub fn add_query(&mut self, query: Query) -> Result<()> {
        let next = self.sheet.clone().with_query(query, now());
        self.commit(next)
    }

    pub fn add_consistency_note(&mut self, note: &str) -> Result<()> {
        let next = self.sheet.clone().with_consistency_note(note, now());
        self.commit(next)
    }

    pub fn set_convention(&mut self, category: StyleCategory, term: &str, choice: &str) -> Result<()> {
        let next = self
            .sheet
            .clone()
            .with_convention(category, term, choice, now());
        self.commit(next)
    }

    /// Write the current sheet in full.
    pub fn persist(&self) -> Result<()> {
        write_sheet(&self.path, &self.sheet)
    }

    pub fn render(&self) -> String {
        crate::report::style_sheet_report(&self.sheet)
    }

    fn commit(&mut self, next: StyleSheet) -> Result<()> {
        write_sheet(&self.path, &next)?;
        self.sheet = next;
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

// Written to a sibling temp file first so a failed write never leaves a
// truncated sheet behind.
fn write_sheet(path: &Path, sheet: &StyleSheet) -> Result<()> {
    let json = serde_json::to_string_pretty(sheet)?;
    let tmp = path.with_extension("json.tmp");
    let write_err = |source| EditorError::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, json.as_bytes()).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    info!(path = %path.display(), "style sheet saved");
    Ok(())
}
