use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on the number of workers a pool may be configured with.
pub const MAX_WORKERS: usize = 8;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    env_opt(key)
        .map(|v| {
            v.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{key} must be a whole number of seconds, got {v:?}"))
            })
        })
        .transpose()
}

// ── Top-level config ──────────────────────────────────────────

/// Worker pool configuration, typically parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Worker names, one worker per entry.
    #[serde(default = "default_workers")]
    pub workers: Vec<String>,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_workers() -> Vec<String> {
    vec!["One".to_string(), "Two".to_string()]
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            http: HttpConfig::default(),
        }
    }
}

impl PoolConfig {
    /// Parse a TOML config file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: PoolConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, optionally overlaid by a file, then by environment variables
    /// (call `load_dotenv()` first).
    ///
    /// - `COOP_WORKERS`: comma-separated worker names
    /// - `COOP_HTTP_TIMEOUT_SECS`: request timeout
    /// - `COOP_USER_AGENT`: user agent sent with every request
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the `COOP_*` variables. A malformed timeout is an error.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(workers) = env_opt("COOP_WORKERS") {
            self.workers = workers
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        if let Some(secs) = env_u64("COOP_HTTP_TIMEOUT_SECS")? {
            self.http.timeout_secs = Some(secs);
        }
        if let Some(agent) = env_opt("COOP_USER_AGENT") {
            self.http.user_agent = agent;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers.is_empty() {
            return Err(ConfigError::Invalid("at least one worker is required".into()));
        }
        if self.workers.len() > MAX_WORKERS {
            return Err(ConfigError::Invalid(format!(
                "{} workers configured, at most {} allowed",
                self.workers.len(),
                MAX_WORKERS
            )));
        }
        for (i, name) in self.workers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("worker names must not be blank".into()));
            }
            if self.workers[..i].contains(name) {
                return Err(ConfigError::Invalid(format!("duplicate worker name: {name}")));
            }
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  workers:  {}", self.workers.join(", "));
        tracing::info!(
            "  http:     timeout={}, user_agent={}",
            self.http
                .timeout_secs
                .map(|s| format!("{s}s"))
                .unwrap_or_else(|| "(none)".into()),
            self.http.user_agent
        );
    }
}

// ── HTTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    concat!("coop/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.workers, vec!["One", "Two"]);
        assert!(config.http.timeout().is_none());
        assert!(config.http.user_agent.starts_with("coop/"));
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PoolConfig::from_toml("[http]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.workers, vec!["One", "Two"]);
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_duplicate_workers() {
        let err = PoolConfig::from_toml(r#"workers = ["One", "One"]"#).unwrap_err();
        assert!(err.to_string().contains("duplicate worker name: One"));
    }

    #[test]
    fn rejects_empty_and_oversized_pools() {
        assert!(PoolConfig::from_toml("workers = []").is_err());

        let names: Vec<String> = (0..=MAX_WORKERS).map(|i| format!("\"W{i}\"")).collect();
        let raw = format!("workers = [{}]", names.join(", "));
        assert!(matches!(PoolConfig::from_toml(&raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            PoolConfig::from_toml("workers = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = [\"A\", \"B\", \"C\"]").unwrap();

        let config = PoolConfig::from_file(file.path()).unwrap();
        assert_eq!(config.workers, vec!["A", "B", "C"]);
    }

    // The only test touching the process environment, so it cannot race.
    #[test]
    fn env_overrides() {
        const VARS: [&str; 3] = ["COOP_WORKERS", "COOP_HTTP_TIMEOUT_SECS", "COOP_USER_AGENT"];

        env::set_var("COOP_WORKERS", " Alpha, ,Beta ,, Gamma");
        env::set_var("COOP_HTTP_TIMEOUT_SECS", "7");
        env::set_var("COOP_USER_AGENT", "coop-test/1");
        let config = PoolConfig::load(None);

        env::set_var("COOP_WORKERS", "A,B,A");
        let duplicate = PoolConfig::load(None);

        env::set_var("COOP_WORKERS", "A");
        env::set_var("COOP_HTTP_TIMEOUT_SECS", "ten");
        let malformed = PoolConfig::load(None);

        for var in VARS {
            env::remove_var(var);
        }

        let config = config.unwrap();
        assert_eq!(config.workers, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(7)));
        assert_eq!(config.http.user_agent, "coop-test/1");

        let err = duplicate.unwrap_err();
        assert!(err.to_string().contains("duplicate worker name: A"));

        match malformed {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("COOP_HTTP_TIMEOUT_SECS")),
            other => panic!("expected invalid timeout, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PoolConfig::from_file("/nonexistent/coop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
