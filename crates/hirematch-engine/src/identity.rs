//! Account registration and credential checks.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use std::sync::LazyLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use hirematch_db::Database;
use hirematch_db::models::UserRow;
use hirematch_types::api::RegisterRequest;
use hirematch_types::models::User;
use hirematch_types::{Principal, Role};
use tracing::info;

use crate::access::authenticated;
use crate::error::{ConflictExt, EngineError, Result, not_found};

const MIN_PASSWORD_LEN: usize = 8;

/// Hash checked on a login for an unknown email, so the miss costs one Argon2
/// verification like a wrong password does.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-account").ok());

pub fn register(db: &Database, req: &RegisterRequest) -> Result<i64> {
    if [&req.email, &req.password, &req.full_name, &req.user_type]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(EngineError::InvalidArgument("Missing required fields".into()));
    }
    let role: Role = req
        .user_type
        .parse()
        .map_err(|_| EngineError::InvalidArgument("Invalid user type".into()))?;
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(EngineError::InvalidArgument(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;

    let user_id = db
        .create_user(
            req.email.trim(),
            &password_hash,
            req.full_name.trim(),
            role,
            req.company_name.as_deref(),
            req.designation.as_deref(),
        )
        .or_conflict("User already exists")?;

    info!("Registered {} user {}", role, user_id);
    Ok(user_id)
}

/// Verifies an email/password pair and returns the account it belongs to.
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<User> {
    if email.is_empty() || password.is_empty() {
        return Err(EngineError::InvalidArgument(
            "Email and password are required".into(),
        ));
    }

    let Some(row) = db.get_user_by_email(email.trim())? else {
        verify_against_dummy(password);
        return Err(EngineError::InvalidCredentials);
    };

    let parsed = PasswordHash::new(&row.password)
        .map_err(|e| EngineError::Internal(format!("stored hash unreadable: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| EngineError::InvalidCredentials)?;

    Ok(public_profile(row))
}

pub fn current_user(db: &Database, caller: Option<&Principal>) -> Result<User> {
    let principal = authenticated(caller)?;
    let row = db
        .get_user_by_id(principal.id)?
        .ok_or_else(|| not_found("User"))?;

    Ok(public_profile(row))
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| EngineError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn verify_against_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        if let Ok(parsed) = PasswordHash::new(hash) {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
    }
}

fn public_profile(row: UserRow) -> User {
    User {
        id: row.id,
        email: row.email,
        full_name: row.full_name,
        user_type: row.role,
        company_name: row.company_name,
        designation: row.designation,
        created_at: row.created_at,
    }
}
