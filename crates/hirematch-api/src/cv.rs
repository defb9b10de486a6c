use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use hirematch_engine::{matching, profiles};
use hirematch_types::Principal;
use hirematch_types::api::{
    Ack, CreateCvResponse, CvFields, CvListResponse, CvResponse, SwipeRequest, SwipeResponse,
};

use crate::AppState;
use crate::error::ApiError;

pub async fn create_cv(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CvFields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = payload?;
    let (cv_id, unique_id) =
        crate::blocking(&state, move |db| profiles::create_cv(db, Some(&principal), &fields)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCvResponse {
            message: "CV created successfully".into(),
            cv_id,
            unique_id,
        }),
    ))
}

pub async fn my_cv(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let cv = crate::blocking(&state, move |db| profiles::my_cv(db, Some(&principal))).await?;
    Ok(Json(CvResponse { cv }))
}

pub async fn update_cv(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CvFields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = payload?;
    crate::blocking(&state, move |db| profiles::update_cv(db, Some(&principal), &fields)).await?;
    Ok(Json(Ack::new("CV updated successfully")))
}

pub async fn unswiped_cvs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let cvs = crate::blocking(&state, move |db| matching::unswiped_cvs(db, Some(&principal))).await?;
    Ok(Json(CvListResponse { cvs }))
}

pub async fn swipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<SwipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let outcome = crate::blocking(&state, move |db| {
        matching::record_swipe(db, Some(&principal), req.cv_id, &req.direction)
    })
    .await?;

    Ok(Json(SwipeResponse {
        message: "Swipe recorded successfully".into(),
        direction: outcome.direction,
        matched: outcome.matched,
        conversation_id: outcome.conversation_id,
    }))
}
