use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Ordered `(key, count)` pairs, most frequent first.
pub type Ranked = Vec<(String, usize)>;

/// Frequency table that remembers the order in which keys were first seen.
///
/// Ranking is a stable sort on descending count, so keys with equal counts
/// keep their first-seen order.
#[derive(Debug, Default)]
pub struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn ranked(self) -> Ranked {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Serialize ordered pairs as a JSON object, keeping pair order.
pub fn as_map<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}
