use hirematch_types::api::{CreateJobRequest, CvFields};
use hirematch_types::models::{AnonymousCv, Job};
use rusqlite::{OptionalExtension, Row, params};

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{CvRow, time_col};

impl Database {
    // -- CVs --

    /// Inserts the user's CV. A second CV for the same user surfaces as
    /// [`DbError::UniqueViolation`].
    pub fn create_cv(&self, user_id: i64, unique_id: &str, fields: &CvFields) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cvs (user_id, unique_id, education, experience, skills)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user_id, unique_id, fields.education, fields.experience, fields.skills],
            )
            .map_err(DbError::classify)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_cv_by_user(&self, user_id: i64) -> Result<Option<CvRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, unique_id, education, experience, skills, created_at, updated_at
                     FROM cvs WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(CvRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            unique_id: row.get(2)?,
                            education: row.get(3)?,
                            experience: row.get(4)?,
                            skills: row.get(5)?,
                            created_at: time_col(row, 6)?,
                            updated_at: time_col(row, 7)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Overwrites the user's CV fields. Returns `false` when the user has no CV.
    pub fn update_cv(&self, user_id: i64, fields: &CvFields) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE cvs
                 SET education = ?1, experience = ?2, skills = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE user_id = ?4",
                params![fields.education, fields.experience, fields.skills, user_id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn get_cv_owner(&self, cv_id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let owner = conn
                .query_row("SELECT user_id FROM cvs WHERE id = ?1", [cv_id], |row| row.get(0))
                .optional()?;
            Ok(owner)
        })
    }

    /// CVs the employer has not swiped yet, newest first, without owner identity.
    pub fn list_cvs_excluding(&self, employer_id: i64) -> Result<Vec<AnonymousCv>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.unique_id, c.education, c.experience, c.skills, c.created_at
                 FROM cvs c
                 WHERE NOT EXISTS (
                     SELECT 1 FROM cv_swipes s WHERE s.cv_id = c.id AND s.employer_id = ?1
                 )
                 ORDER BY c.created_at DESC, c.id DESC",
            )?;

            let rows = stmt
                .query_map([employer_id], |row| {
                    Ok(AnonymousCv {
                        id: row.get(0)?,
                        unique_id: row.get(1)?,
                        education: row.get(2)?,
                        experience: row.get(3)?,
                        skills: row.get(4)?,
                        created_at: time_col(row, 5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Jobs --

    pub fn create_job(&self, employer_id: i64, job: &CreateJobRequest) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO jobs (employer_id, title, responsibilities, requirements, salary, location, job_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    employer_id,
                    job.title,
                    job.responsibilities,
                    job.requirements,
                    job.salary,
                    job.location,
                    job.job_type,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_job_owner(&self, job_id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let owner = conn
                .query_row("SELECT employer_id FROM jobs WHERE id = ?1", [job_id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(owner)
        })
    }

    pub fn list_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, responsibilities, requirements, salary, location, job_type, created_at
                 FROM jobs
                 WHERE employer_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([employer_id], job_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Jobs the jobseeker has not applied to yet, newest first.
    pub fn list_jobs_excluding(&self, jobseeker_id: i64) -> Result<Vec<Job>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT j.id, j.title, j.responsibilities, j.requirements, j.salary, j.location, j.job_type, j.created_at
                 FROM jobs j
                 WHERE NOT EXISTS (
                     SELECT 1 FROM applications a WHERE a.job_id = j.id AND a.jobseeker_id = ?1
                 )
                 ORDER BY j.created_at DESC, j.id DESC",
            )?;
            let rows = stmt
                .query_map([jobseeker_id], job_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        responsibilities: row.get(2)?,
        requirements: row.get(3)?,
        salary: row.get(4)?,
        location: row.get(5)?,
        job_type: row.get(6)?,
        created_at: time_col(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db, user};
    use hirematch_types::{Role, SwipeDirection};

    fn job(title: &str) -> CreateJobRequest {
        CreateJobRequest {
            title: title.to_string(),
            responsibilities: None,
            requirements: None,
            salary: None,
            location: Some("Remote".to_string()),
            job_type: None,
        }
    }

    #[test]
    fn one_cv_per_user() {
        let db = db();
        let seeker = user(&db, "s@x.io", Role::Jobseeker);
        db.create_cv(seeker, "u-1", &CvFields::default()).unwrap();
        let err = db.create_cv(seeker, "u-2", &CvFields::default()).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn update_cv_reports_missing_cv() {
        let db = db();
        let seeker = user(&db, "s@x.io", Role::Jobseeker);
        let fields = CvFields {
            skills: Some("Rust".into()),
            ..Default::default()
        };
        assert!(!db.update_cv(seeker, &fields).unwrap());

        db.create_cv(seeker, "u-1", &CvFields::default()).unwrap();
        assert!(db.update_cv(seeker, &fields).unwrap());
        let cv = db.get_cv_by_user(seeker).unwrap().unwrap();
        assert_eq!(cv.skills.as_deref(), Some("Rust"));
        assert_eq!(cv.user_id, seeker);
    }

    #[test]
    fn unswiped_cvs_are_newest_first_and_shrink_after_swipes() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let a = user(&db, "a@x.io", Role::Jobseeker);
        let b = user(&db, "b@x.io", Role::Jobseeker);
        let cv_a = db.create_cv(a, "u-a", &CvFields::default()).unwrap();
        let cv_b = db.create_cv(b, "u-b", &CvFields::default()).unwrap();

        let ids: Vec<i64> = db
            .list_cvs_excluding(employer)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![cv_b, cv_a]);

        db.insert_swipe(employer, cv_b, SwipeDirection::Left, b).unwrap();
        let remaining = db.list_cvs_excluding(employer).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].unique_id, "u-a");
    }

    #[test]
    fn unapplied_jobs_exclude_own_applications_only() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let s1 = user(&db, "s1@x.io", Role::Jobseeker);
        let s2 = user(&db, "s2@x.io", Role::Jobseeker);
        let j1 = db.create_job(employer, &job("Backend")).unwrap();
        let j2 = db.create_job(employer, &job("Frontend")).unwrap();

        db.insert_application(j1, s1).unwrap();

        let for_s1: Vec<i64> = db.list_jobs_excluding(s1).unwrap().iter().map(|j| j.id).collect();
        let for_s2: Vec<i64> = db.list_jobs_excluding(s2).unwrap().iter().map(|j| j.id).collect();
        assert_eq!(for_s1, vec![j2]);
        assert_eq!(for_s2, vec![j2, j1]);
        assert_eq!(db.get_job_owner(j1).unwrap(), Some(employer));
        assert_eq!(db.get_job_owner(999).unwrap(), None);
    }
}
