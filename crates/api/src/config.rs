use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins of the staff dashboard allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Username of the admin created on an empty user store.
    pub bootstrap_admin_username: String,
    /// Password of that admin. No account is created when unset.
    pub bootstrap_admin_password: Option<String>,
    pub jwt: JwtConfig,
}

/// A set, non-blank environment variable.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `name`, falling back to `default` when unset.
///
/// Panics on an unparsable value; a typo in deployment config should stop
/// the server rather than silently use the default.
fn parsed_var<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        None => default,
    }
}

impl ServerConfig {
    /// Load configuration from the environment (after `.env`).
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DATABASE_URL`             | unset (in-memory store)    |
    /// | `BOOTSTRAP_ADMIN_USERNAME` | `admin`                    |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                      |
    ///
    /// `CORS_ORIGINS` is comma separated. JWT settings come from
    /// [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = optional_var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: optional_var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed_var("PORT", 3000),
            cors_origins,
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT_SECS", 30),
            database_url: optional_var("DATABASE_URL"),
            bootstrap_admin_username: optional_var("BOOTSTRAP_ADMIN_USERNAME")
                .unwrap_or_else(|| "admin".into()),
            bootstrap_admin_password: optional_var("BOOTSTRAP_ADMIN_PASSWORD"),
            jwt: JwtConfig::from_env(),
        }
    }
}
