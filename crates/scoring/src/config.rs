use crate::matcher::MatchMode;
use crate::{Result, ScoringError};
use serde::{Deserialize, Serialize};

/// How keyword/language scores are combined into `total_score`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// `keyword + language_weight * language - workload_penalty * active`
    #[default]
    Linear,
    /// Combined-normalizer formula rescaled by the best score in the pass
    MaxNormalized,
}

/// Weights for the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Score of a reviewer matching every requested keyword
    pub keyword_scale: f64,

    /// Score of a reviewer preferring every requested language
    pub language_scale: f64,

    /// Credit for a language found only in the "other" list
    pub other_language_weight: f64,

    /// Share of the language score added to the total
    pub language_weight: f64,

    /// Points subtracted per active review
    pub workload_penalty: f64,

    /// Boundary rule for topic keywords (languages are always bounded)
    pub keyword_match: MatchMode,

    pub policy: ScorePolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_scale: 10.0,
            language_scale: 10.0,
            other_language_weight: 0.5,
            language_weight: 0.5,
            workload_penalty: 1.0,
            keyword_match: MatchMode::Bounded,
            policy: ScorePolicy::Linear,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("keyword_scale", self.keyword_scale),
            ("language_scale", self.language_scale),
            ("other_language_weight", self.other_language_weight),
            ("language_weight", self.language_weight),
            ("workload_penalty", self.workload_penalty),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        // A zero language scale would make the language filter drop everyone.
        for (name, value) in [
            ("keyword_scale", self.keyword_scale),
            ("language_scale", self.language_scale),
        ] {
            if value == 0.0 {
                return Err(ScoringError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}
