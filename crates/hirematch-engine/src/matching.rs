//! Matching engine: unseen-candidate queries, irreversible swipe/apply decisions, and
//! conversation opening on interest.
//!
//! Matching is one-sided. An employer's right swipe on a CV, or a jobseeker's
//! application to a job, is enough to open a conversation between the two.
//! Duplicate decisions are rejected by the store's UNIQUE constraints rather than by
//! a read-then-write check, so two concurrent attempts cannot both succeed.

use hirematch_db::Database;
use hirematch_types::api::{Applicant, MyApplication};
use hirematch_types::models::{AnonymousCv, Job};
use hirematch_types::{ApplicationStatus, Principal, Role, SwipeDirection};
use tracing::{info, warn};

use crate::access::require_role;
use crate::error::{ConflictExt, EngineError, Result, not_found};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub direction: SwipeDirection,
    pub matched: bool,
    pub conversation_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub application_id: i64,
    pub conversation_id: Option<i64>,
    /// Set when the application was committed but opening its conversation failed.
    pub conversation_error: Option<String>,
}

/// CVs the calling employer has not swiped on, newest first, anonymized.
pub fn unswiped_cvs(db: &Database, caller: Option<&Principal>) -> Result<Vec<AnonymousCv>> {
    let employer = require_role(caller, Role::Employer, "Only employers can view CVs")?;
    Ok(db.list_cvs_excluding(employer.id)?)
}

/// Jobs the calling jobseeker has not applied to, newest first.
pub fn unapplied_jobs(db: &Database, caller: Option<&Principal>) -> Result<Vec<Job>> {
    let seeker = require_role(caller, Role::Jobseeker, "Only jobseekers can browse jobs")?;
    Ok(db.list_jobs_excluding(seeker.id)?)
}

pub fn record_swipe(
    db: &Database,
    caller: Option<&Principal>,
    cv_id: i64,
    direction: &str,
) -> Result<SwipeOutcome> {
    let employer = require_role(caller, Role::Employer, "Only employers can swipe CVs")?;
    let direction: SwipeDirection = direction
        .parse()
        .map_err(|_| EngineError::InvalidArgument("Invalid swipe direction".into()))?;
    let owner_id = db.get_cv_owner(cv_id)?.ok_or_else(|| not_found("CV"))?;

    let (_, conversation) = db
        .insert_swipe(employer.id, cv_id, direction, owner_id)
        .or_conflict("CV already swiped")?;

    let conversation_id = conversation.map(|(id, created)| {
        if created {
            info!("Match: employer {} opened conversation {} via CV {}", employer.id, id, cv_id);
        } else {
            info!("Employer {} swiped right on CV {}, reusing conversation {}", employer.id, cv_id, id);
        }
        id
    });

    Ok(SwipeOutcome {
        direction,
        matched: direction == SwipeDirection::Right,
        conversation_id,
    })
}

/// Stores a pending application, then opens the conversation with the job's owner.
///
/// The two writes are sequential. Once the application is committed the call
/// succeeds; a conversation failure is only reported in
/// [`ApplyOutcome::conversation_error`].
pub fn apply_to_job(db: &Database, caller: Option<&Principal>, job_id: i64) -> Result<ApplyOutcome> {
    let seeker = require_role(caller, Role::Jobseeker, "Only jobseekers can apply to jobs")?;
    let employer_id = db.get_job_owner(job_id)?.ok_or_else(|| not_found("Job"))?;

    let application_id = db
        .insert_application(job_id, seeker.id)
        .or_conflict("Already applied to this job")?;
    info!("Jobseeker {} applied to job {} (application {})", seeker.id, job_id, application_id);

    let outcome = match db.open_conversation(employer_id, seeker.id) {
        Ok((id, created)) => {
            if created {
                info!("Match: jobseeker {} opened conversation {} via job {}", seeker.id, id, job_id);
            }
            ApplyOutcome {
                application_id,
                conversation_id: Some(id),
                conversation_error: None,
            }
        }
        Err(e) => {
            warn!(
                "Application {} stored but conversation with employer {} failed: {}",
                application_id, employer_id, e
            );
            ApplyOutcome {
                application_id,
                conversation_id: None,
                conversation_error: Some(
                    "Application submitted, but the conversation could not be opened".into(),
                ),
            }
        }
    };

    Ok(outcome)
}

/// Applicants on one of the caller's jobs, identified only by CV `unique_id`.
pub fn applicants_for_job(db: &Database, caller: Option<&Principal>, job_id: i64) -> Result<Vec<Applicant>> {
    let employer = require_role(caller, Role::Employer, "Only employers can view applications")?;
    match db.get_job_owner(job_id)? {
        Some(owner) if owner == employer.id => Ok(db.list_applicants(job_id)?),
        _ => Err(not_found("Job")),
    }
}

/// Flat overwrite of an application's status; any status may follow any other.
pub fn update_application_status(
    db: &Database,
    caller: Option<&Principal>,
    application_id: i64,
    status: &str,
) -> Result<ApplicationStatus> {
    let employer = require_role(caller, Role::Employer, "Only employers can update application status")?;
    let status: ApplicationStatus = status
        .parse()
        .map_err(|_| EngineError::InvalidArgument("Invalid status".into()))?;

    if !db.update_application_status(application_id, employer.id, status)? {
        return Err(not_found("Application"));
    }

    info!("Employer {} set application {} to {}", employer.id, application_id, status);
    Ok(status)
}

pub fn my_applications(db: &Database, caller: Option<&Principal>) -> Result<Vec<MyApplication>> {
    let seeker = require_role(caller, Role::Jobseeker, "Access denied")?;
    Ok(db.list_applications_by_jobseeker(seeker.id)?)
}
