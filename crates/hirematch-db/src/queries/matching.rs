use hirematch_types::api::{Applicant, MyApplication};
use hirematch_types::{ApplicationStatus, SwipeDirection};
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{ApplicationRow, SwipeRow, enum_col, time_col};

impl Database {
    // -- Swipes --

    /// Records an employer's decision on a CV. The `(employer_id, cv_id)` UNIQUE
    /// constraint rejects a second decision with [`DbError::UniqueViolation`]; the
    /// first row is never overwritten.
    ///
    /// A right swipe opens (or reuses) the conversation with `cv_owner_id` in the
    /// same transaction, so a swipe is never stored without its conversation.
    pub fn insert_swipe(
        &self,
        employer_id: i64,
        cv_id: i64,
        direction: SwipeDirection,
        cv_owner_id: i64,
    ) -> Result<(i64, Option<(i64, bool)>)> {
        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO cv_swipes (employer_id, cv_id, direction) VALUES (?1, ?2, ?3)",
                params![employer_id, cv_id, direction.as_str()],
            )
            .map_err(DbError::classify)?;
            let swipe_id = conn.last_insert_rowid();

            let conversation = match direction {
                SwipeDirection::Right => Some(open_conversation_in(conn, employer_id, cv_owner_id)?),
                SwipeDirection::Left => None,
            };

            Ok((swipe_id, conversation))
        })
    }

    pub fn find_swipe(&self, employer_id: i64, cv_id: i64) -> Result<Option<SwipeRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, employer_id, cv_id, direction FROM cv_swipes
                     WHERE employer_id = ?1 AND cv_id = ?2",
                    [employer_id, cv_id],
                    |row| {
                        Ok(SwipeRow {
                            id: row.get(0)?,
                            employer_id: row.get(1)?,
                            cv_id: row.get(2)?,
                            direction: enum_col(row, 3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Applications --

    /// Inserts a pending application. The `(job_id, jobseeker_id)` UNIQUE constraint
    /// rejects a repeat with [`DbError::UniqueViolation`].
    pub fn insert_application(&self, job_id: i64, jobseeker_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO applications (job_id, jobseeker_id) VALUES (?1, ?2)",
                [job_id, jobseeker_id],
            )
            .map_err(DbError::classify)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_application(&self, job_id: i64, jobseeker_id: i64) -> Result<Option<ApplicationRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, job_id, jobseeker_id, status FROM applications
                     WHERE job_id = ?1 AND jobseeker_id = ?2",
                    [job_id, jobseeker_id],
                    |row| {
                        Ok(ApplicationRow {
                            id: row.get(0)?,
                            job_id: row.get(1)?,
                            jobseeker_id: row.get(2)?,
                            status: enum_col(row, 3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Overwrites the status of an application on one of `employer_id`'s jobs.
    /// Returns `false` when no such application exists for that employer.
    pub fn update_application_status(
        &self,
        application_id: i64,
        employer_id: i64,
        status: ApplicationStatus,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE applications
                 SET status = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2
                   AND job_id IN (SELECT id FROM jobs WHERE employer_id = ?3)",
                params![status.as_str(), application_id, employer_id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Applicants on a job, newest first, identified only through their CV.
    pub fn list_applicants(&self, job_id: i64) -> Result<Vec<Applicant>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.id, a.status, a.created_at, c.unique_id, c.education, c.experience, c.skills
                 FROM applications a
                 LEFT JOIN cvs c ON c.user_id = a.jobseeker_id
                 WHERE a.job_id = ?1
                 ORDER BY a.created_at DESC, a.id DESC",
            )?;

            let rows = stmt
                .query_map([job_id], |row| {
                    Ok(Applicant {
                        id: row.get(0)?,
                        status: enum_col(row, 1)?,
                        created_at: time_col(row, 2)?,
                        unique_id: row.get(3)?,
                        education: row.get(4)?,
                        experience: row.get(5)?,
                        skills: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn list_applications_by_jobseeker(&self, jobseeker_id: i64) -> Result<Vec<MyApplication>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.id, a.job_id, a.status, a.created_at, j.title, j.location, j.job_type, j.salary
                 FROM applications a
                 JOIN jobs j ON j.id = a.job_id
                 WHERE a.jobseeker_id = ?1
                 ORDER BY a.created_at DESC, a.id DESC",
            )?;

            let rows = stmt
                .query_map([jobseeker_id], |row| {
                    Ok(MyApplication {
                        id: row.get(0)?,
                        job_id: row.get(1)?,
                        status: enum_col(row, 2)?,
                        created_at: time_col(row, 3)?,
                        title: row.get(4)?,
                        location: row.get(5)?,
                        job_type: row.get(6)?,
                        salary: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Conversations --

    /// Returns the conversation for the pair, creating it if none exists.
    /// The boolean is `true` only when this call inserted the row.
    pub fn open_conversation(&self, employer_id: i64, jobseeker_id: i64) -> Result<(i64, bool)> {
        self.with_tx(|conn| Ok(open_conversation_in(conn, employer_id, jobseeker_id)?))
    }
}

fn open_conversation_in(
    conn: &Connection,
    employer_id: i64,
    jobseeker_id: i64,
) -> rusqlite::Result<(i64, bool)> {
    let inserted = conn.execute(
        "INSERT INTO conversations (employer_id, jobseeker_id) VALUES (?1, ?2)
         ON CONFLICT (employer_id, jobseeker_id) DO NOTHING",
        [employer_id, jobseeker_id],
    )?;

    let id = conn.query_row(
        "SELECT id FROM conversations WHERE employer_id = ?1 AND jobseeker_id = ?2",
        [employer_id, jobseeker_id],
        |row| row.get(0),
    )?;

    Ok((id, inserted > 0))
}
