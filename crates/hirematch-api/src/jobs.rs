use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use hirematch_engine::{matching, profiles};
use hirematch_types::Principal;
use hirematch_types::api::{
    Ack, ApplicantsResponse, ApplyRequest, ApplyResponse, CreateJobRequest, CreateJobResponse,
    JobListResponse, MyApplicationsResponse, UpdateStatusRequest,
};

use crate::AppState;
use crate::error::{ApiError, path_id};

pub async fn post_job(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let job_id = crate::blocking(&state, move |db| profiles::post_job(db, Some(&principal), &req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            message: "Job posted successfully".into(),
            job_id,
        }),
    ))
}

pub async fn my_jobs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = crate::blocking(&state, move |db| profiles::my_jobs(db, Some(&principal))).await?;
    Ok(Json(JobListResponse { jobs }))
}

pub async fn unapplied_jobs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = crate::blocking(&state, move |db| matching::unapplied_jobs(db, Some(&principal))).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// The application is reported as created even when opening its conversation
/// failed; that failure travels in `warning`.
pub async fn apply(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let outcome = crate::blocking(&state, move |db| {
        matching::apply_to_job(db, Some(&principal), req.job_id)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            message: "Application submitted successfully".into(),
            application_id: outcome.application_id,
            conversation_id: outcome.conversation_id,
            warning: outcome.conversation_error,
        }),
    ))
}

pub async fn applicants(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = path_id(path, "Job")?;
    let applications = crate::blocking(&state, move |db| {
        matching::applicants_for_job(db, Some(&principal), job_id)
    })
    .await?;
    Ok(Json(ApplicantsResponse { applications }))
}

pub async fn update_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let application_id = path_id(path, "Application")?;
    let Json(req) = payload?;
    crate::blocking(&state, move |db| {
        matching::update_application_status(db, Some(&principal), application_id, &req.status)
    })
    .await?;
    Ok(Json(Ack::new("Application status updated successfully")))
}

pub async fn my_applications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let applications =
        crate::blocking(&state, move |db| matching::my_applications(db, Some(&principal))).await?;
    Ok(Json(MyApplicationsResponse { applications }))
}
