//! # Reviewer Scoring
//!
//! Ranks roster reviewers against requested topic keywords and programming
//! languages.
//!
//! ```text
//! ReviewQuery (trimmed, deduplicated, ≥1 keyword)
//!     │
//!     ├──> PhraseMatcher (keywords)  ── topic_areas          → keyword_score
//!     ├──> PhraseMatcher (languages) ── preferred / other    → language_score
//!     │
//!     ├──> filter: keyword_score > 0, language_score > 0 if languages requested
//!     ├──> total = keyword + 0.5·language − active_reviews
//!     │
//!     └──> rank: total desc, random tiebreak desc, take N
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use reviewer_roster::ReviewerRecord;
//! use reviewer_scoring::{ReviewQuery, Shortlister};
//!
//! let roster = vec![
//!     ReviewerRecord::new("ada").topic_areas("compilers, parsing").preferred_languages("Rust"),
//!     ReviewerRecord::new("bob").topic_areas("web").preferred_languages("Go"),
//! ];
//! let query = ReviewQuery::new(["parsing"], ["Rust"]).unwrap();
//! let ranked = Shortlister::default()
//!     .shortlist(&roster, &query, 10, &mut StdRng::seed_from_u64(1))
//!     .unwrap();
//!
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].record.username, "ada");
//! ```

mod config;
mod engine;
mod error;
mod matcher;
mod ranker;

pub use config::{ScorePolicy, ScoringConfig};
pub use engine::{ReviewQuery, ScoredReviewer, ScoringEngine};
pub use error::{Result, ScoringError};
pub use matcher::{count_matches, normalize_phrases, MatchMode, PhraseMatcher, TextMatcher};
pub use ranker::{rank, relative_scores, Shortlister};
