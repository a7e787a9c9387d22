use crate::config::{ScorePolicy, ScoringConfig};
use crate::matcher::{count_matches, normalize_phrases, MatchMode, PhraseMatcher, TextMatcher};
use crate::{Result, ScoringError};
use reviewer_roster::ReviewerRecord;
use serde::Serialize;

/// Normalized request: distinct, trimmed keywords and languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    keywords: Vec<String>,
    languages: Vec<String>,
}

impl ReviewQuery {
    /// Fails with [`ScoringError::InvalidArgument`] when no usable keyword remains
    pub fn new(
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
        languages: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self> {
        let keywords = normalize_phrases(keywords);
        if keywords.is_empty() {
            return Err(ScoringError::InvalidArgument(
                "at least one non-empty keyword is required".to_string(),
            ));
        }
        Ok(Self {
            keywords,
            languages: normalize_phrases(languages),
        })
    }

    pub fn keywords_only(keywords: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Self> {
        Self::new(keywords, std::iter::empty::<&str>())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

/// A roster row with its relevance scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReviewer {
    #[serde(flatten)]
    pub record: ReviewerRecord,
    pub keyword_score: f64,
    pub language_score: f64,
    pub total_score: f64,
    /// Requested keywords found in the topic areas
    pub matched_keywords: Vec<String>,
    /// Requested languages found in either language field
    pub matched_languages: Vec<String>,
}

/// Turns a roster snapshot and a query into scored, filtered reviewers
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

struct Counts {
    keywords: usize,
    preferred: usize,
    other: usize,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Score every reviewer and drop those without a topic match (and,
    /// when languages were requested, those without a language match).
    ///
    /// Output preserves roster order.
    pub fn score(
        &self,
        roster: &[ReviewerRecord],
        query: &ReviewQuery,
    ) -> Result<Vec<ScoredReviewer>> {
        let keywords = PhraseMatcher::new(query.keywords(), self.config.keyword_match)?;
        let languages = PhraseMatcher::new(query.languages(), MatchMode::Bounded)?;

        let keyword_counts =
            count_matches(&keywords, roster.iter().map(|r| r.topic_areas.as_deref()));
        let preferred_counts = count_matches(
            &languages,
            roster.iter().map(|r| r.preferred_languages.as_deref()),
        );
        let other_counts =
            count_matches(&languages, roster.iter().map(|r| r.other_languages.as_deref()));

        let mut scored = Vec::new();
        for (i, record) in roster.iter().enumerate() {
            let counts = Counts {
                keywords: keyword_counts[i],
                preferred: preferred_counts[i],
                other: other_counts[i],
            };
            if counts.keywords == 0 {
                continue;
            }
            if !languages.is_empty() && counts.preferred == 0 && counts.other == 0 {
                continue;
            }
            scored.push(self.compose(record, &counts, &keywords, &languages));
        }

        // A zero other-language weight can leave a language score of zero.
        if !languages.is_empty() {
            scored.retain(|s| s.language_score > 0.0);
        }

        if self.config.policy == ScorePolicy::MaxNormalized {
            rescale_by_max(&mut scored);
        }

        log::debug!(
            "Scored {} of {} reviewers for keywords {:?} languages {:?}",
            scored.len(),
            roster.len(),
            query.keywords(),
            query.languages()
        );
        Ok(scored)
    }

    fn compose(
        &self,
        record: &ReviewerRecord,
        counts: &Counts,
        keywords: &PhraseMatcher,
        languages: &PhraseMatcher,
    ) -> ScoredReviewer {
        let cfg = &self.config;
        let keyword_count = counts.keywords as f64;
        let language_count =
            counts.preferred as f64 + cfg.other_language_weight * counts.other as f64;

        let keyword_score = cfg.keyword_scale * keyword_count / keywords.len() as f64;
        let language_score = if languages.is_empty() {
            0.0
        } else {
            cfg.language_scale * language_count / languages.len() as f64
        };
        let workload = cfg.workload_penalty * f64::from(record.active_reviews);

        let total_score = match cfg.policy {
            ScorePolicy::Linear => keyword_score + cfg.language_weight * language_score - workload,
            ScorePolicy::MaxNormalized => {
                let norm = keywords.len() as f64 + cfg.language_weight * languages.len() as f64;
                cfg.keyword_scale * (keyword_count + cfg.language_weight * language_count) / norm
                    - workload
            }
        };

        let mut language_hits = languages.matched_field(record.preferred_languages.as_deref());
        language_hits.extend(languages.matched_field(record.other_languages.as_deref()));
        language_hits.sort_unstable();
        language_hits.dedup();

        ScoredReviewer {
            record: record.clone(),
            keyword_score,
            language_score,
            total_score,
            matched_keywords: pick(
                keywords.phrases(),
                &keywords.matched_field(record.topic_areas.as_deref()),
            ),
            matched_languages: pick(languages.phrases(), &language_hits),
        }
    }
}

fn pick(phrases: &[String], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| phrases[i].clone()).collect()
}

// Only a positive maximum gives a meaningful scale; otherwise totals stay raw.
fn rescale_by_max(scored: &mut [ScoredReviewer]) {
    let max = scored
        .iter()
        .map(|s| s.total_score)
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        for s in scored.iter_mut() {
            s.total_score /= max;
        }
    }
}
