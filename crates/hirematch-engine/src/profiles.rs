//! CV and job-posting writes that feed the matching engine.

use hirematch_db::Database;
use hirematch_types::api::{CreateJobRequest, CvFields};
use hirematch_types::models::{Cv, Job};
use hirematch_types::{Principal, Role};
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::error::{ConflictExt, EngineError, Result, not_found};

/// Creates the caller's one CV and returns `(cv_id, unique_id)`. The `unique_id`
/// is a random token and the only label employers ever see.
pub fn create_cv(db: &Database, caller: Option<&Principal>, fields: &CvFields) -> Result<(i64, String)> {
    let seeker = require_role(caller, Role::Jobseeker, "Only jobseekers can create CVs")?;

    let unique_id = Uuid::new_v4().to_string();
    let cv_id = db
        .create_cv(seeker.id, &unique_id, fields)
        .or_conflict("CV already exists for this user")?;

    info!("Jobseeker {} created CV {}", seeker.id, cv_id);
    Ok((cv_id, unique_id))
}

pub fn my_cv(db: &Database, caller: Option<&Principal>) -> Result<Cv> {
    let seeker = require_role(caller, Role::Jobseeker, "Only jobseekers can view their CV")?;
    let row = db.get_cv_by_user(seeker.id)?.ok_or_else(|| not_found("CV"))?;

    Ok(Cv {
        id: row.id,
        unique_id: row.unique_id,
        education: row.education,
        experience: row.experience,
        skills: row.skills,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Updates the caller's CV in place; `unique_id` never changes.
pub fn update_cv(db: &Database, caller: Option<&Principal>, fields: &CvFields) -> Result<()> {
    let seeker = require_role(caller, Role::Jobseeker, "Only jobseekers can update their CV")?;
    if !db.update_cv(seeker.id, fields)? {
        return Err(not_found("CV"));
    }
    Ok(())
}

pub fn post_job(db: &Database, caller: Option<&Principal>, job: &CreateJobRequest) -> Result<i64> {
    let employer = require_role(caller, Role::Employer, "Only employers can post jobs")?;
    if job.title.trim().is_empty() {
        return Err(EngineError::InvalidArgument("Job title is required".into()));
    }

    let job_id = db.create_job(employer.id, job)?;
    info!("Employer {} posted job {}", employer.id, job_id);
    Ok(job_id)
}

pub fn my_jobs(db: &Database, caller: Option<&Principal>) -> Result<Vec<Job>> {
    let employer = require_role(caller, Role::Employer, "Only employers can view their jobs")?;
    Ok(db.list_jobs_by_employer(employer.id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db, employer, jobseeker};

    #[test]
    fn second_cv_conflicts_and_first_survives() {
        let db = db();
        let seeker = jobseeker(&db, "s@x.io");
        let (_, unique_id) = create_cv(&db, Some(&seeker), &CvFields::default()).unwrap();

        let err = create_cv(&db, Some(&seeker), &CvFields::default()).unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        assert_eq!(my_cv(&db, Some(&seeker)).unwrap().unique_id, unique_id);
    }

    #[test]
    fn unique_ids_are_distinct_tokens() {
        let db = db();
        let a = jobseeker(&db, "a@x.io");
        let b = jobseeker(&db, "b@x.io");
        let (_, ua) = create_cv(&db, Some(&a), &CvFields::default()).unwrap();
        let (_, ub) = create_cv(&db, Some(&b), &CvFields::default()).unwrap();
        assert_ne!(ua, ub);
        assert!(Uuid::parse_str(&ua).is_ok());
    }

    #[test]
    fn update_keeps_unique_id() {
        let db = db();
        let seeker = jobseeker(&db, "s@x.io");
        assert!(matches!(
            update_cv(&db, Some(&seeker), &CvFields::default()).unwrap_err(),
            EngineError::NotFound(_)
        ));

        let (_, unique_id) = create_cv(&db, Some(&seeker), &CvFields::default()).unwrap();
        let fields = CvFields {
            experience: Some("5 years".into()),
            ..Default::default()
        };
        update_cv(&db, Some(&seeker), &fields).unwrap();

        let cv = my_cv(&db, Some(&seeker)).unwrap();
        assert_eq!(cv.unique_id, unique_id);
        assert_eq!(cv.experience.as_deref(), Some("5 years"));
    }

    #[test]
    fn roles_are_enforced() {
        let db = db();
        let boss = employer(&db, "e@x.io");
        let seeker = jobseeker(&db, "s@x.io");

        assert!(matches!(
            create_cv(&db, Some(&boss), &CvFields::default()).unwrap_err(),
            EngineError::Forbidden(_)
        ));

        let req = CreateJobRequest {
            title: "Dev".into(),
            responsibilities: None,
            requirements: None,
            salary: None,
            location: None,
            job_type: None,
        };
        assert!(matches!(
            post_job(&db, Some(&seeker), &req).unwrap_err(),
            EngineError::Forbidden(_)
        ));
        assert!(matches!(post_job(&db, None, &req).unwrap_err(), EngineError::NotAuthenticated));
    }

    #[test]
    fn job_title_is_required() {
        let db = db();
        let boss = employer(&db, "e@x.io");
        let req = CreateJobRequest {
            title: "   ".into(),
            responsibilities: None,
            requirements: None,
            salary: None,
            location: None,
            job_type: None,
        };
        assert!(matches!(
            post_job(&db, Some(&boss), &req).unwrap_err(),
            EngineError::InvalidArgument(_)
        ));
        assert!(my_jobs(&db, Some(&boss)).unwrap().is_empty());
    }
}
