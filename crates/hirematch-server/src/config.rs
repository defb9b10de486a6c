use std::path::PathBuf;

use tracing::warn;

const DEV_SECRET: &str = "dev-secret-change-me";

const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", DEV_SECRET];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// `None` means any origin is allowed.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = match std::env::var("HIREMATCH_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => DEV_SECRET.to_string(),
        };
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            warn!("HIREMATCH_JWT_SECRET is unset or still a placeholder; tokens are forgeable");
        }

        let db_path = std::env::var("HIREMATCH_DB_PATH")
            .unwrap_or_else(|_| "hirematch.db".into())
            .into();
        let host = std::env::var("HIREMATCH_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("HIREMATCH_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()?;
        let cors_origin = std::env::var("HIREMATCH_CORS_ORIGIN")
            .ok()
            .filter(|origin| !origin.is_empty());

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            cors_origin,
        })
    }
}
