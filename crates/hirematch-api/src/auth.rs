use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{EncodingKey, Header, encode};

use hirematch_engine::identity;
use hirematch_types::Principal;
use hirematch_types::api::{
    Claims, LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
};
use hirematch_types::models::User;

use crate::AppState;
use crate::error::ApiError;

const TOKEN_TTL_HOURS: i64 = 24;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user_id = crate::blocking(&state, move |db| identity::register(db, &req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user = crate::blocking(&state, move |db| {
        identity::authenticate(db, &req.email, &req.password)
    })
    .await?;

    let token = create_token(&state.jwt_secret, &user)
        .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))?;

    Ok(Json(LoginResponse { token, user }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let user = crate::blocking(&state, move |db| identity::current_user(db, Some(&principal))).await?;
    Ok(Json(MeResponse { user }))
}

fn create_token(secret: &str, user: &User) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.user_type,
        exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
