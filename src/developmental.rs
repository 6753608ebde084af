//! Developmental editing extractors: concept, theme, narrative structure and
//! pacing. Each is a single pass over the manuscript text and shares nothing
//! with the others.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{
    owned, CONCEPT_QUESTIONS, LIMITS, NARRATIVE_QUESTIONS, RHYTHM_QUESTIONS, THEME_STOP_WORDS,
    THESIS_QUESTIONS,
};
use crate::error::Result;
use crate::patterns::{
    captures, is_blank, words, CHAPTER_RE, NON_WORD_RE, QUOTED_SPAN_RE, SENTENCE_DELIM_RE,
    TIME_MARKER_RE,
};
use crate::tally::{Ranked, Tally};

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| THEME_STOP_WORDS.iter().copied().collect());

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptSummary {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub opening_concept: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThesisSummary {
    /// `[word, count]` pairs, most frequent first.
    pub frequent_themes: Ranked,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeSummary {
    pub chapter_count: usize,
    pub chapters_found: Vec<String>,
    pub time_markers_found: usize,
    pub time_marker_samples: Vec<String>,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhythmSummary {
    pub average_sentence_length: f64,
    pub total_sentences: usize,
    pub dialogue_instances: usize,
    pub questions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

pub fn analyze_concept(text: &str) -> ConceptSummary {
    let tokens: Vec<&str> = words(text).collect();
    let paragraph_count = text.split("\n\n").filter(|p| !is_blank(p)).count();
    let opening: Vec<&str> = tokens
        .iter()
        .take(LIMITS.opening_excerpt_words)
        .copied()
        .collect();

    ConceptSummary {
        word_count: tokens.len(),
        paragraph_count,
        opening_concept: opening.join(" "),
        questions: owned(CONCEPT_QUESTIONS),
    }
}

pub fn analyze_thesis(text: &str) -> ThesisSummary {
    let lowered = text.to_lowercase();
    let mut tally = Tally::new();
    for word in words(&lowered) {
        let clean = NON_WORD_RE.replace_all(word, "");
        if clean.chars().count() > LIMITS.theme_min_len && !STOP_WORDS.contains(&*clean) {
            tally.add(&clean);
        }
    }

    let mut frequent_themes = tally.ranked();
    frequent_themes.truncate(LIMITS.theme_top_n);

    ThesisSummary {
        frequent_themes,
        questions: owned(THESIS_QUESTIONS),
    }
}

pub fn analyze_narrative(text: &str) -> NarrativeSummary {
    let chapters = captures(&CHAPTER_RE, text);
    let markers = captures(&TIME_MARKER_RE, text);

    // Distinct by exact spelling; sorted so repeated runs agree.
    let distinct: BTreeSet<&str> = markers.iter().copied().collect();

    NarrativeSummary {
        chapter_count: chapters.len(),
        chapters_found: chapters
            .iter()
            .take(LIMITS.chapter_sample_cap)
            .map(|s| s.to_string())
            .collect(),
        time_markers_found: markers.len(),
        time_marker_samples: distinct
            .into_iter()
            .take(LIMITS.time_marker_sample_cap)
            .map(str::to_string)
            .collect(),
        questions: owned(NARRATIVE_QUESTIONS),
    }
}

pub fn analyze_rhythm(text: &str) -> RhythmSummary {
    let lengths: Vec<usize> = SENTENCE_DELIM_RE
        .split(text)
        .filter(|s| !is_blank(s))
        .map(|s| words(s).count())
        .collect();

    let average = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    RhythmSummary {
        average_sentence_length: round_half_even(average, 2),
        total_sentences: lengths.len(),
        dialogue_instances: QUOTED_SPAN_RE.find_iter(text).count(),
        questions: owned(RHYTHM_QUESTIONS),
    }
}

/// Round to `places` decimals with exact halves going to the even digit.
fn round_half_even(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// All four developmental findings for one manuscript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentalAnalysis {
    pub concept: ConceptSummary,
    pub thesis: ThesisSummary,
    pub narrative: NarrativeSummary,
    pub rhythm: RhythmSummary,
}

impl DevelopmentalAnalysis {
    pub fn run(text: &str) -> Self {
        debug!("running concept analysis");
        let concept = analyze_concept(text);
        debug!("running thesis analysis");
        let thesis = analyze_thesis(text);
        debug!("running narrative analysis");
        let narrative = analyze_narrative(text);
        debug!("running rhythm analysis");
        let rhythm = analyze_rhythm(text);
        Self {
            concept,
            thesis,
            narrative,
            rhythm,
        }
    }

    /// Section name and findings record, in report order.
    pub fn sections(&self) -> Result<Vec<(&'static str, Value)>> {
        Ok(vec![
            ("concept", serde_json::to_value(&self.concept)?),
            ("thesis", serde_json::to_value(&self.thesis)?),
            ("narrative", serde_json::to_value(&self.narrative)?),
            ("rhythm", serde_json::to_value(&self.rhythm)?),
        ])
    }
}
