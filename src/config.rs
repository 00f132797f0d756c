use std::env;

/// ConfigError
///
/// Startup configuration problems. Any of these stops the process before it
/// accepts traffic.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// AppConfig
///
/// Holds the application's entire configuration state. Built once at startup and
/// immutable afterwards; pulled into handlers via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and whether a database is mandatory.
    pub env: Env,
    // Secret used to sign and verify credential tokens.
    pub jwt_secret: String,
    // Registering with this address makes the account an admin.
    pub admin_email: Option<String>,
    // Postgres connection string. Absent in local mode means the in-memory store.
    pub db_url: Option<String>,
    pub port: u16,
}

/// Env
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe values for test setup, without touching the process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: "super-secure-test-secret-value-local".to_string(),
            admin_email: Some("admin@example.com".to_string()),
            db_url: None,
            port: 3000,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    /// `JWT_SECRET` is mandatory in every environment and `DATABASE_URL` in
    /// production. `PORT`, when set, must be a valid port number.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let db_url = non_empty("DATABASE_URL");
        if env == Env::Production && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let port: u16 = match non_empty("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 3000,
        };

        Ok(Self {
            env,
            jwt_secret,
            admin_email: non_empty("ADMIN_EMAIL"),
            db_url,
            port,
        })
    }
}
