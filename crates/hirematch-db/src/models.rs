//! Row types for entities that carry columns never exposed as-is (password hashes,
//! CV ownership, message participants). Read models that are safe to hand out are
//! built directly as `hirematch_types` values by the query modules.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use hirematch_types::{ApplicationStatus, Role, SwipeDirection};
use rusqlite::Row;
use rusqlite::types::Type;
use tracing::warn;

pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct CvRow {
    pub id: i64,
    pub user_id: i64,
    pub unique_id: String,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct SwipeRow {
    pub id: i64,
    pub employer_id: i64,
    pub cv_id: i64,
    pub direction: SwipeDirection,
}

pub struct ApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub jobseeker_id: i64,
    pub status: ApplicationStatus,
}

pub struct ConversationRow {
    pub id: i64,
    pub employer_id: i64,
    pub jobseeker_id: i64,
    pub created_at: DateTime<Utc>,
}

impl ConversationRow {
    /// The participant that is not `user_id`.
    pub fn other_participant(&self, user_id: i64) -> i64 {
        if self.employer_id == user_id {
            self.jobseeker_id
        } else {
            self.employer_id
        }
    }
}

pub struct MessageRow {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Reads a text column holding one of the wire enums.
pub(crate) fn enum_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn time_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    Ok(parse_timestamp(&raw))
}

/// Parses a stored timestamp. Rows written by this schema are RFC3339; the bare
/// `YYYY-MM-DD HH:MM:SS` form of SQLite's `datetime()` is accepted as UTC too.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_both_timestamp_shapes() {
        let a = parse_timestamp("2024-05-01T10:20:30.123Z");
        assert_eq!((a.year(), a.hour(), a.second()), (2024, 10, 30));

        let b = parse_timestamp("2024-05-01 10:20:30");
        assert_eq!(b.minute(), 20);
    }

    #[test]
    fn corrupt_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("yesterday"), DateTime::<Utc>::default());
    }
}
