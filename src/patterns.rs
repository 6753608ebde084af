use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Narrative structure
// ---------------------------------------------------------------------------

pub static CHAPTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Chapter \d+|CHAPTER \d+|Part \d+|PART \d+)").unwrap());

pub static TIME_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    let markers = [
        "yesterday",
        "today",
        "tomorrow",
        "last year",
        "next month",
        "morning",
        "evening",
        "night",
        "dawn",
        "dusk",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    Regex::new(&format!("(?i)({})", markers.join("|"))).unwrap()
});

// ---------------------------------------------------------------------------
// Sentences and dialogue
// ---------------------------------------------------------------------------

pub static SENTENCE_DELIM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Naive straight-quote span; no escapes, nesting or smart quotes.
pub static QUOTED_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

pub static DIALOGUE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(said|asked|replied|shouted|whispered|muttered|exclaimed|cried|yelled|screamed)",
    )
    .unwrap()
});

pub static ACTION_BEAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s*\n\s*[A-Z][^"]*?\."#).unwrap());

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

// The regex crate has no look-behind, so the leading punctuation is part of
// the match; `count_fragments` resumes on the closing punctuation instead.
pub static FRAGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+([A-Z][^.!?]{3,30}[.!?])").unwrap());

pub static DIALOGUE_COMMA_SPLICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*,[^"]*,"[^"]*""#).unwrap());

pub static SENTENCE_STARTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[.!?]\s+)([A-Z][a-z]+)").unwrap());

// ---------------------------------------------------------------------------
// Names, places, facts
// ---------------------------------------------------------------------------

pub static PROPER_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap());

pub static PLACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:in|at|from|to)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap());

pub static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:in|at|from|to|near)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap()
});

pub static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

pub static BRAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+(?:[A-Z][a-z]+)?)\b").unwrap());

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").unwrap());

/// Whitespace-delimited tokens. The ASCII information separators
/// U+001C..=U+001F also split, as they do for `str.split()`-style tokenizers.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|w| !w.is_empty())
}

pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_separator)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Capture group 1 of every match, in order of appearance.
pub fn captures<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
