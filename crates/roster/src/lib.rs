//! # Reviewer Roster
//!
//! The reviewer table the scorer works from: one [`ReviewerRecord`] per row
//! of the exported sign-up sheet.
//!
//! ```text
//! RosterSource::load
//!     ├──> SnapshotCache::load_fresh   (file mtime < max_age)
//!     └──> SnapshotFetcher::fetch      (HTTP GET, explicit timeout)
//!              └─> SnapshotCache::store (write tmp + rename)
//!     └──> parse_snapshot              (skip metadata row, header by name)
//! ```

mod cache;
mod error;
mod snapshot;
mod source;
mod types;

pub use cache::{SnapshotCache, DEFAULT_MAX_AGE};
pub use error::{Result, RosterError};
pub use snapshot::{
    parse_snapshot, COLUMN_ACTIVE_REVIEWS, COLUMN_OTHER_LANGUAGES, COLUMN_PREFERRED_LANGUAGES,
    COLUMN_REVIEWS_ALL_TIME, COLUMN_REVIEWS_LAST_QUARTER, COLUMN_REVIEWS_LAST_YEAR,
    COLUMN_TOPIC_AREAS, COLUMN_USERNAME,
};
pub use source::{
    HttpSnapshotFetcher, RosterSource, SnapshotFetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_ROSTER_URL,
};
pub use types::ReviewerRecord;
