use anyhow::Context;
use std::str::FromStr;

const DEFAULT_SECRET_KEY: &str = "secret-dev";
const DEFAULT_SERVER_PORT: u16 = 3001;
const DEFAULT_DATABASE_URL: &str = "sqlite:lunchly.db";
const TEST_DATABASE_URL: &str = "sqlite:lunchly_test.db";

#[derive(Debug)]
pub struct Config {
    secret_key: String,
    server_port: u16,
    database_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`, falling back to defaults for
    /// anything unset. The test database is selected when `LUNCHLY_ENV=test`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = load_env_or(&lookup, "SECRET_KEY", DEFAULT_SECRET_KEY.to_string())?;
        let server_port = load_env_or(&lookup, "PORT", DEFAULT_SERVER_PORT)?;
        let database_url = if lookup("LUNCHLY_ENV").as_deref() == Some("test") {
            TEST_DATABASE_URL.to_string()
        } else {
            load_env_or(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL.to_string())?
        };

        Ok(Self {
            secret_key,
            server_port,
            database_url,
        })
    }

    /// Reserved for signing sessions; nothing is signed yet.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    #[must_use]
    pub fn uses_default_secret_key(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

fn load_env_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) if !val.is_empty() => val
            .parse::<T>()
            .with_context(|| format!("Failed to parse environment variable {key}")),
        _ => Ok(default),
    }
}
