//! Copyediting extractors: internal consistency, dialogue, grammar in fiction
//! and fact references.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{
    owned, CONSISTENCY_CHECKS, DIALOGUE_CHECKS, FACT_CHECKS, GRAMMAR_REMINDERS, LIMITS,
};
use crate::error::Result;
use crate::patterns::{
    captures, ACTION_BEAT_RE, BRAND_RE, DIALOGUE_COMMA_SPLICE_RE, DIALOGUE_TAG_RE, FRAGMENT_RE,
    LOCATION_RE, PLACE_RE, PROPER_NAME_RE, QUOTED_SPAN_RE, SENTENCE_STARTER_RE, YEAR_RE,
};
use crate::tally::{as_map, Ranked, Tally};

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyCheck {
    #[serde(serialize_with = "as_map")]
    pub character_names: Ranked,
    /// Name -> colliding spelling. Both directions of a collision are listed.
    #[serde(serialize_with = "as_map")]
    pub potential_variants: Vec<(String, String)>,
    pub places_mentioned: Vec<String>,
    pub checks_needed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueCheck {
    pub dialogue_instances: usize,
    #[serde(serialize_with = "as_map")]
    pub dialogue_tag_frequency: Ranked,
    pub action_beats_found: usize,
    pub checks_needed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarCheck {
    pub potential_fragments: usize,
    pub comma_splices_in_dialogue: usize,
    #[serde(serialize_with = "as_map")]
    pub common_sentence_starters: Ranked,
    pub remember: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheck {
    pub years_mentioned: Vec<String>,
    pub locations_to_verify: Vec<String>,
    pub brand_candidates: Vec<String>,
    pub checks_needed: Vec<String>,
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

pub fn check_consistency(text: &str) -> ConsistencyCheck {
    let tally: Tally = PROPER_NAME_RE.find_iter(text).map(|m| m.as_str()).collect();

    let frequent: Ranked = tally
        .entries()
        .iter()
        .filter(|(_, count)| *count > LIMITS.name_min_occurrences)
        .cloned()
        .collect();
    let potential_variants = case_fold_variants(&frequent);

    let mut character_names = frequent;
    character_names.sort_by(|a, b| b.1.cmp(&a.1));
    character_names.truncate(LIMITS.character_top_n);

    ConsistencyCheck {
        character_names,
        potential_variants,
        places_mentioned: sorted_capped(captures(&PLACE_RE, text), LIMITS.place_cap),
        checks_needed: owned(CONSISTENCY_CHECKS),
    }
}

/// Pairs of distinct names that are equal once lowercased.
///
/// Each name maps to the last colliding spelling seen after it, so a
/// collision between `a` and `b` yields both `(a, b)` and `(b, a)`.
pub fn case_fold_variants(names: &[(String, usize)]) -> Vec<(String, String)> {
    let folded: Vec<String> = names.iter().map(|(n, _)| n.to_lowercase()).collect();
    let mut variants = Vec::new();
    for (i, (name, _)) in names.iter().enumerate() {
        let other = names
            .iter()
            .enumerate()
            .filter(|(j, (candidate, _))| candidate != name && folded[*j] == folded[i])
            .map(|(_, (candidate, _))| candidate)
            .last();
        if let Some(other) = other {
            variants.push((name.clone(), other.clone()));
        }
    }
    variants
}

pub fn analyze_dialogue(text: &str) -> DialogueCheck {
    let mut tags = Tally::new();
    for m in DIALOGUE_TAG_RE.find_iter(text) {
        tags.add(&m.as_str().to_lowercase());
    }

    DialogueCheck {
        dialogue_instances: QUOTED_SPAN_RE.find_iter(text).count(),
        dialogue_tag_frequency: tags.ranked(),
        action_beats_found: ACTION_BEAT_RE.find_iter(text).count(),
        checks_needed: owned(DIALOGUE_CHECKS),
    }
}

pub fn check_grammar(text: &str) -> GrammarCheck {
    let starters: Tally = captures(&SENTENCE_STARTER_RE, text).into_iter().collect();
    let mut common_sentence_starters = starters.ranked();
    common_sentence_starters.truncate(LIMITS.sentence_starter_top_n);

    GrammarCheck {
        potential_fragments: count_fragments(text),
        comma_splices_in_dialogue: DIALOGUE_COMMA_SPLICE_RE.find_iter(text).count(),
        common_sentence_starters,
        remember: owned(GRAMMAR_REMINDERS),
    }
}

/// Short capitalised clauses that directly follow sentence-ending punctuation.
///
/// A fragment's closing punctuation may also open the next fragment, so the
/// search resumes on it rather than after it.
fn count_fragments(text: &str) -> usize {
    let mut count = 0;
    let mut at = 0;
    while let Some(caps) = FRAGMENT_RE.captures_at(text, at) {
        let Some(fragment) = caps.get(1) else {
            break;
        };
        count += 1;
        // closing punctuation is a single ASCII byte
        at = fragment.end() - 1;
    }
    count
}

pub fn check_facts(text: &str) -> FactCheck {
    let years: BTreeSet<&str> = captures(&YEAR_RE, text).into_iter().collect();
    let brands: BTreeSet<&str> = captures(&BRAND_RE, text).into_iter().collect();

    FactCheck {
        years_mentioned: years.into_iter().map(str::to_string).collect(),
        locations_to_verify: sorted_capped(captures(&LOCATION_RE, text), LIMITS.location_cap),
        brand_candidates: brands.into_iter().map(str::to_string).collect(),
        checks_needed: owned(FACT_CHECKS),
    }
}

fn sorted_capped(items: Vec<&str>, cap: usize) -> Vec<String> {
    let distinct: BTreeSet<&str> = items.into_iter().collect();
    distinct.into_iter().take(cap).map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// All four copyediting findings for one manuscript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyeditAnalysis {
    pub consistency: ConsistencyCheck,
    pub dialogue: DialogueCheck,
    pub grammar: GrammarCheck,
    pub facts: FactCheck,
}

impl CopyeditAnalysis {
    pub fn run(text: &str) -> Self {
        debug!("running internal consistency check");
        let consistency = check_consistency(text);
        debug!("running dialogue analysis");
        let dialogue = analyze_dialogue(text);
        debug!("running grammar-in-fiction check");
        let grammar = check_grammar(text);
        debug!("running fact-reference scan");
        let facts = check_facts(text);
        Self {
            consistency,
            dialogue,
            grammar,
            facts,
        }
    }

    /// Section title and findings record, in report order.
    pub fn sections(&self) -> Result<Vec<(&'static str, Value)>> {
        Ok(vec![
            ("INTERNAL CONSISTENCY", serde_json::to_value(&self.consistency)?),
            ("DIALOGUE", serde_json::to_value(&self.dialogue)?),
            ("GRAMMAR IN FICTION", serde_json::to_value(&self.grammar)?),
            ("FACT-CHECKING", serde_json::to_value(&self.facts)?),
        ])
    }
}
