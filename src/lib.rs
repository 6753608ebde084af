//! Heuristic developmental and copyediting analysis for fiction manuscripts.
//!
//! Extractors are independent single-pass scans over the manuscript text.
//! The only persisted state is the per-manuscript [`StyleSheet`].

pub mod config;
pub mod copyedit;
pub mod developmental;
pub mod error;
pub mod manuscript;
pub mod patterns;
pub mod report;
pub mod style_sheet;
pub mod tally;

pub use copyedit::{
    analyze_dialogue, check_consistency, check_facts, check_grammar, ConsistencyCheck,
    CopyeditAnalysis, DialogueCheck, FactCheck, GrammarCheck,
};
pub use developmental::{
    analyze_concept, analyze_narrative, analyze_rhythm, analyze_thesis, ConceptSummary,
    DevelopmentalAnalysis, NarrativeSummary, RhythmSummary, ThesisSummary,
};
pub use error::{EditorError, Result};
pub use manuscript::Manuscript;
pub use style_sheet::{
    Attributes, GeneralStyle, Query, StyleCategory, StyleSheet, StyleSheetStore, TimelineEvent,
};
