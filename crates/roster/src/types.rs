use serde::Serialize;

/// One row of the reviewer roster
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReviewerRecord {
    /// GitHub-style handle, used as the join key
    pub username: String,

    /// Languages the reviewer prefers (free text, may span lines)
    pub preferred_languages: Option<String>,

    /// Secondary languages (free text)
    pub other_languages: Option<String>,

    /// Domains the reviewer is comfortable reviewing (free text)
    pub topic_areas: Option<String>,

    /// Current workload
    pub active_reviews: u32,

    pub review_count_all_time: u32,
    pub review_count_last_year: u32,
    pub review_count_last_quarter: u32,

    /// Uniform draw made per ranking call; never persisted
    #[serde(skip)]
    pub random_tiebreak: f64,
}

impl ReviewerRecord {
    /// Create a record with only a handle set
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn preferred_languages(mut self, text: impl Into<String>) -> Self {
        self.preferred_languages = Some(text.into());
        self
    }

    #[must_use]
    pub fn other_languages(mut self, text: impl Into<String>) -> Self {
        self.other_languages = Some(text.into());
        self
    }

    #[must_use]
    pub fn topic_areas(mut self, text: impl Into<String>) -> Self {
        self.topic_areas = Some(text.into());
        self
    }

    #[must_use]
    pub fn active_reviews(mut self, active: u32) -> Self {
        self.active_reviews = active;
        self
    }

    #[must_use]
    pub fn with_tiebreak(mut self, value: f64) -> Self {
        self.random_tiebreak = value;
        self
    }
}
