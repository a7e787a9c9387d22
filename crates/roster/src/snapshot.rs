//! Roster snapshot parsing.
//!
//! The exported sheet carries one metadata row above the real header, so the
//! first CSV record is dropped before columns are located by name. Column
//! names are the contract with the upstream sheet: renaming one there breaks
//! parsing here with [`RosterError::MissingColumn`].

use crate::{ReviewerRecord, Result, RosterError};
use csv::StringRecord;

pub const COLUMN_USERNAME: &str = "username";
pub const COLUMN_PREFERRED_LANGUAGES: &str = "Preferred Programming Languages";
pub const COLUMN_OTHER_LANGUAGES: &str = "Other Programming Languages";
pub const COLUMN_TOPIC_AREAS: &str = "Domains/topic areas you are comfortable reviewing";
pub const COLUMN_ACTIVE_REVIEWS: &str = "Active reviews";
pub const COLUMN_REVIEWS_ALL_TIME: &str = "Review count(all time)";
pub const COLUMN_REVIEWS_LAST_YEAR: &str = "Review count(last year)";
pub const COLUMN_REVIEWS_LAST_QUARTER: &str = "Review count(last quarter)";

struct ColumnIndex {
    username: usize,
    preferred_languages: usize,
    other_languages: usize,
    topic_areas: usize,
    active_reviews: usize,
    all_time: usize,
    last_year: usize,
    last_quarter: usize,
}

impl ColumnIndex {
    fn locate(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell.trim() == name)
                .ok_or_else(|| RosterError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            username: find(COLUMN_USERNAME)?,
            preferred_languages: find(COLUMN_PREFERRED_LANGUAGES)?,
            other_languages: find(COLUMN_OTHER_LANGUAGES)?,
            topic_areas: find(COLUMN_TOPIC_AREAS)?,
            active_reviews: find(COLUMN_ACTIVE_REVIEWS)?,
            all_time: find(COLUMN_REVIEWS_ALL_TIME)?,
            last_year: find(COLUMN_REVIEWS_LAST_YEAR)?,
            last_quarter: find(COLUMN_REVIEWS_LAST_QUARTER)?,
        })
    }
}

/// Parse a raw roster export into records.
///
/// A document with no header at all is treated as an empty roster.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Vec<ReviewerRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = reader.records();

    // Metadata row above the header.
    if rows.next().transpose()?.is_none() {
        log::warn!("Roster snapshot is empty");
        return Ok(Vec::new());
    }
    let Some(header) = rows.next().transpose()? else {
        log::warn!("Roster snapshot has no header row");
        return Ok(Vec::new());
    };
    let columns = ColumnIndex::locate(&header)?;

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        let line = row.position().map_or(0, |pos| pos.line() as usize);

        let Some(username) = text_cell(&row, columns.username) else {
            log::debug!("Skipping roster line {line}: empty username");
            continue;
        };

        records.push(ReviewerRecord {
            username,
            preferred_languages: text_cell(&row, columns.preferred_languages),
            other_languages: text_cell(&row, columns.other_languages),
            topic_areas: text_cell(&row, columns.topic_areas),
            active_reviews: counter_cell(&row, columns.active_reviews, COLUMN_ACTIVE_REVIEWS, line)?,
            review_count_all_time: counter_cell(&row, columns.all_time, COLUMN_REVIEWS_ALL_TIME, line)?,
            review_count_last_year: counter_cell(&row, columns.last_year, COLUMN_REVIEWS_LAST_YEAR, line)?,
            review_count_last_quarter: counter_cell(
                &row,
                columns.last_quarter,
                COLUMN_REVIEWS_LAST_QUARTER,
                line,
            )?,
            random_tiebreak: 0.0,
        });
    }

    log::debug!("Parsed {} reviewers from roster snapshot", records.len());
    Ok(records)
}

fn text_cell(row: &StringRecord, idx: usize) -> Option<String> {
    let value = row.get(idx)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn counter_cell(row: &StringRecord, idx: usize, column: &str, line: usize) -> Result<u32> {
    let raw = row.get(idx).unwrap_or_default();
    parse_counter(raw).ok_or_else(|| RosterError::InvalidCell {
        row: line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

// Spreadsheet exports write whole numbers as "3" or "3.0" and leave blanks
// for zero.
fn parse_counter(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    if let Ok(value) = raw.parse::<u32>() {
        return Some(value);
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}
