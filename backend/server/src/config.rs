use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub service_key: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), Path::new(SECRETS_DIR))
    }

    /// `var` stands in for the process environment, `secrets_dir` for `/run/secrets`.
    pub fn from_lookup<F>(var: F, secrets_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = require(&var, "SUPABASE_URL")?;

        Ok(Self {
            port: try_load(&var, "RUST_PORT", "1111")?,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            service_key: read_secret(&var, secrets_dir, "SUPABASE_SERVICE_ROLE_KEY")?,
        })
    }
}

fn require<F>(var: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn try_load<F, T>(var: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

/// Docker secret first, then the plain environment variable.
fn read_secret<F>(var: &F, secrets_dir: &Path, secret_name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path: PathBuf = secrets_dir.join(secret_name);

    match read_to_string(&path) {
        Ok(secret) if !secret.trim().is_empty() => return Ok(secret.trim().to_string()),
        Ok(_) => warn!("{secret_name} secret file is empty, falling back to environment"),
        Err(e) => info!("Failed to read {secret_name} from file ({e}), falling back to environment"),
    }

    require(var, secret_name)
}
