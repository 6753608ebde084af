// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Caps and thresholds shared by the extractors and report formatters.
pub struct Limits {
    pub opening_excerpt_words: usize,
    pub theme_min_len: usize,
    pub theme_top_n: usize,
    pub chapter_sample_cap: usize,
    pub time_marker_sample_cap: usize,
    pub name_min_occurrences: usize,
    pub character_top_n: usize,
    pub place_cap: usize,
    pub location_cap: usize,
    pub sentence_starter_top_n: usize,
    pub report_list_cap: usize,
    pub heavy_rule_width: usize,
    pub light_rule_width: usize,
}

pub static LIMITS: Limits = Limits {
    opening_excerpt_words: 500,
    // tokens must be strictly longer than this
    theme_min_len: 4,
    theme_top_n: 20,
    chapter_sample_cap: 10,
    time_marker_sample_cap: 20,
    // names must occur strictly more often than this
    name_min_occurrences: 5,
    character_top_n: 20,
    place_cap: 20,
    location_cap: 20,
    sentence_starter_top_n: 10,
    report_list_cap: 10,
    heavy_rule_width: 80,
    light_rule_width: 40,
};

// ---------------------------------------------------------------------------
// Stop words
// ---------------------------------------------------------------------------

pub const THEME_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "is",
    "was", "are", "been", "be", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "this", "that", "these", "those", "i", "you",
    "he", "she", "it", "we", "they", "them", "their", "my", "your", "his", "her", "its", "our",
];

// ---------------------------------------------------------------------------
// Developmental editing prompts
// ---------------------------------------------------------------------------

pub const CONCEPT_QUESTIONS: &[&str] = &[
    "What is the central concept or premise of this story?",
    "Who is the target audience?",
    "What makes this story unique in its genre?",
    "What is the emotional core that will resonate with readers?",
];

pub const THESIS_QUESTIONS: &[&str] = &[
    "What is the central argument or theme?",
    "What does this story say about the human condition?",
    "How do the recurring elements support the thesis?",
    "What's the 'so what?' factor - why does this story matter?",
];

pub const NARRATIVE_QUESTIONS: &[&str] = &[
    "Is the timeline linear or non-linear?",
    "Are there multiple timelines that need to be tracked separately?",
    "Do flashbacks serve the story or confuse the reader?",
    "Is the pacing appropriate for the genre?",
    "Does each scene advance the plot or develop character?",
];

pub const RHYTHM_QUESTIONS: &[&str] = &[
    "Do long expository sections need breaking up?",
    "Are action sequences paced with short, punchy sentences?",
    "Does dialogue move at a natural rhythm?",
    "Are there passages that drag - too much description, too little action?",
    "Are chapter endings compelling (hooks for next chapter)?",
];

// ---------------------------------------------------------------------------
// Copyediting checklists
// ---------------------------------------------------------------------------

pub const CONSISTENCY_CHECKS: &[&str] = &[
    "Verify consistent character name spelling throughout",
    "Check character descriptions don't contradict",
    "Verify place descriptions remain consistent",
    "Check timeline for impossible sequences",
];

pub const DIALOGUE_CHECKS: &[&str] = &[
    "Ensure dialogue sounds natural, not stilted",
    "Check that characters have distinct voices",
    "Verify dialect/accent consistency for each character",
    "Confirm dialogue punctuation follows chosen style",
    "Watch for over-use of dialogue tags beyond 'said'",
    "Ensure informal speech isn't 'corrected' to formal grammar",
];

/// Fiction is not held to expository-prose grammar; these are reminders, not findings.
pub const GRAMMAR_REMINDERS: &[&str] = &[
    "\"It's not my book\" - respect author's choices",
    "Fragments and comma splices can be intentional for effect",
    "First-person narration follows dialogue-like grammar",
    "Don't apply grammar hammer to creative choices",
    "Query only if something is genuinely confusing",
];

pub const FACT_CHECKS: &[&str] = &[
    "Verify historical events match stated years",
    "Check that technology references match time period",
    "Confirm real locations are accurately described",
    "Verify brand names and trademarks are used correctly",
    "Check that fictionalized places are consistently described",
    "Respect author's deliberate anachronisms if intentional",
];

pub fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| s.to_string()).collect()
}
