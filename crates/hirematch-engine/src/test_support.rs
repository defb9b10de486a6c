use hirematch_db::Database;
use hirematch_types::api::{CreateJobRequest, CvFields};
use hirematch_types::{Principal, Role};

pub fn db() -> Database {
    Database::open_in_memory().unwrap()
}

pub fn employer(db: &Database, email: &str) -> Principal {
    let id = db
        .create_user(email, "hash", "Erin Employer", Role::Employer, Some("Acme"), Some("CTO"))
        .unwrap();
    Principal::new(id, Role::Employer)
}

pub fn jobseeker(db: &Database, email: &str) -> Principal {
    let id = db
        .create_user(email, "hash", "Sam Seeker", Role::Jobseeker, None, None)
        .unwrap();
    Principal::new(id, Role::Jobseeker)
}

/// Gives the jobseeker a CV and returns its row id.
pub fn cv(db: &Database, seeker: &Principal, skills: &str) -> i64 {
    let fields = CvFields {
        skills: Some(skills.to_string()),
        ..Default::default()
    };
    crate::profiles::create_cv(db, Some(seeker), &fields).unwrap().0
}

pub fn job(db: &Database, owner: &Principal, title: &str) -> i64 {
    let req = CreateJobRequest {
        title: title.to_string(),
        responsibilities: None,
        requirements: None,
        salary: None,
        location: None,
        job_type: None,
    };
    crate::profiles::post_job(db, Some(owner), &req).unwrap()
}
