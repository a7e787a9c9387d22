//! Phrase matching over free-text roster fields.
//!
//! Phrases are user input, never patterns: each one is escaped before it is
//! compiled. In [`MatchMode::Bounded`] a phrase only counts when it is not
//! glued to a letter, digit, `+` or `#`, which keeps short language names
//! ("C", "R", "Go") from matching inside "JavaScript", "Rust" or "Django",
//! and keeps "C" from matching "C++" or "C#".

use crate::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BOUNDARY: &str = r"[^\p{L}\p{N}+#]";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Phrase must stand alone (see module docs)
    #[default]
    Bounded,
    /// Plain case-insensitive containment
    Substring,
}

/// Capability: which of a fixed set of phrases occur in a text
pub trait TextMatcher {
    /// The distinct phrases this matcher looks for
    fn phrases(&self) -> &[String];

    /// Indices (into [`TextMatcher::phrases`]) of phrases found at least once
    fn matched(&self, text: &str) -> Vec<usize>;

    /// Like [`TextMatcher::matched`]; a missing field matches nothing
    fn matched_field(&self, text: Option<&str>) -> Vec<usize> {
        text.map_or_else(Vec::new, |t| self.matched(t))
    }

    /// Number of distinct phrases found; a missing field counts zero
    fn count(&self, text: Option<&str>) -> usize {
        self.matched_field(text).len()
    }
}

/// Regex-backed [`TextMatcher`], one compiled pattern per phrase
#[derive(Clone, Debug)]
pub struct PhraseMatcher {
    phrases: Vec<String>,
    patterns: Vec<Regex>,
}

impl PhraseMatcher {
    pub fn new<I, S>(phrases: I, mode: MatchMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = normalize_phrases(phrases);
        let patterns = phrases
            .iter()
            .map(|phrase| compile(phrase, mode))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { phrases, patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }
}

impl TextMatcher for PhraseMatcher {
    fn phrases(&self) -> &[String] {
        &self.phrases
    }

    fn matched(&self, text: &str) -> Vec<usize> {
        self.patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(idx, _)| idx)
            .collect()
    }
}

fn compile(phrase: &str, mode: MatchMode) -> Result<Regex> {
    let escaped = regex::escape(phrase);
    let source = match mode {
        MatchMode::Bounded => format!("(?:^|{BOUNDARY}){escaped}(?:$|{BOUNDARY})"),
        MatchMode::Substring => escaped,
    };
    Ok(RegexBuilder::new(&source).case_insensitive(true).build()?)
}

/// Trim, drop empties and collapse case-insensitive duplicates, keeping the
/// first spelling seen.
pub fn normalize_phrases<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .filter_map(|p| {
            let p = p.as_ref().trim();
            (!p.is_empty() && seen.insert(p.to_lowercase())).then(|| p.to_string())
        })
        .collect()
}

/// One count per field: distinct phrases present in that field
pub fn count_matches<'a, M, I>(matcher: &M, fields: I) -> Vec<usize>
where
    M: TextMatcher + ?Sized,
    I: IntoIterator<Item = Option<&'a str>>,
{
    fields.into_iter().map(|field| matcher.count(field)).collect()
}
