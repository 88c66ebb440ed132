//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.itn/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ItnConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub interrupt: InterruptConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InventoryConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InterruptConfig {
    pub timeout_secs: Option<u64>,
    pub force: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_FORCE: bool = true;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
pub const DEFAULT_LOG_FILE: &str = "itn.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// How the confirmed selection is interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptSettings {
    pub timeout: Duration,
    pub force: bool,
}

impl Default for InterruptSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            force: DEFAULT_FORCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first. Never below 1.
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Worst-case time for one retried call whose attempts each take up to
    /// `per_attempt`.
    pub fn deadline(&self, per_attempt: Duration) -> Duration {
        let attempts = self.attempts.max(1);
        per_attempt
            .saturating_mul(attempts)
            .saturating_add(self.backoff.saturating_mul(attempts - 1))
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub interrupt: InterruptSettings,
    pub retry: RetryPolicy,
    pub log_file: String,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_force: bool,
    pub retries: Option<u32>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.itn/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".itn").join("config.toml"))
}

/// Load config from `explicit` if given, otherwise from `~/.itn/config.toml`.
///
/// A missing default file is generated (commented out) and treated as empty.
/// A missing explicit file is an error. A malformed file is `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<ItnConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ItnConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ItnConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<ItnConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ItnConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# itn configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "itn.log"               # Or set ITN_LOG_FILE env var

# [inventory]
# base_url = "http://localhost:8080" # Or set ITN_BASE_URL env var

# [interrupt]
# timeout_secs = 15                  # Or set ITN_TIMEOUT_SECS env var
# force = true

# [retry]
# attempts = 1                       # 1 = no retry
# backoff_ms = 500
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ItnConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ItnConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("ITN_BASE_URL"))
        .or_else(|| config.inventory.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default
    let timeout_secs = cli
        .timeout_secs
        .or_else(|| {
            env("ITN_TIMEOUT_SECS").and_then(|v| match v.trim().parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("Ignoring invalid ITN_TIMEOUT_SECS={:?}", v);
                    None
                }
            })
        })
        .or(config.interrupt.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Force: --no-force wins, otherwise config → default
    let force = !cli.no_force && config.interrupt.force.unwrap_or(DEFAULT_FORCE);

    let attempts = cli
        .retries
        .or(config.retry.attempts)
        .unwrap_or(DEFAULT_RETRY_ATTEMPTS)
        .max(1);
    let backoff_ms = config.retry.backoff_ms.unwrap_or(DEFAULT_RETRY_BACKOFF_MS);

    let log_file = env("ITN_LOG_FILE")
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        base_url,
        interrupt: InterruptSettings {
            timeout: Duration::from_secs(timeout_secs),
            force,
        },
        retry: RetryPolicy {
            attempts,
            backoff: Duration::from_millis(backoff_ms),
        },
        log_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = ItnConfig::default();
        assert!(config.inventory.base_url.is_none());
        assert!(config.interrupt.timeout_secs.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&ItnConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.interrupt, InterruptSettings::default());
        assert_eq!(resolved.interrupt.timeout, Duration::from_secs(15));
        assert!(resolved.interrupt.force);
        assert_eq!(resolved.retry, RetryPolicy::default());
        assert_eq!(resolved.log_file, "itn.log");
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ItnConfig {
            inventory: InventoryConfig {
                base_url: Some("http://inventory:9000".to_string()),
            },
            interrupt: InterruptConfig {
                timeout_secs: Some(30),
                force: Some(false),
            },
            retry: RetryConfig {
                attempts: Some(3),
                backoff_ms: Some(10),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "http://inventory:9000");
        assert_eq!(resolved.interrupt.timeout, Duration::from_secs(30));
        assert!(!resolved.interrupt.force);
        assert_eq!(resolved.retry.attempts, 3);
        assert_eq!(resolved.retry.backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = ItnConfig {
            inventory: InventoryConfig {
                base_url: Some("http://from-config".to_string()),
            },
            interrupt: InterruptConfig {
                timeout_secs: Some(30),
                force: None,
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("ITN_BASE_URL", "http://from-env"),
            ("ITN_TIMEOUT_SECS", "45"),
        ]
        .into();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), lookup);
        assert_eq!(resolved.base_url, "http://from-env");
        assert_eq!(resolved.interrupt.timeout, Duration::from_secs(45));

        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            timeout_secs: Some(5),
            no_force: true,
            retries: Some(2),
        };
        let resolved = resolve_with_env(&config, &cli, lookup);
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.interrupt.timeout, Duration::from_secs(5));
        assert!(!resolved.interrupt.force);
        assert_eq!(resolved.retry.attempts, 2);
    }

    #[test]
    fn test_invalid_env_timeout_falls_through() {
        let lookup = |key: &str| (key == "ITN_TIMEOUT_SECS").then(|| "soon".to_string());
        let resolved = resolve_with_env(&ItnConfig::default(), &CliOverrides::default(), lookup);
        assert_eq!(resolved.interrupt.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_zero_attempts_clamps_to_one() {
        let cli = CliOverrides {
            retries: Some(0),
            ..Default::default()
        };
        let resolved = resolve_with_env(&ItnConfig::default(), &cli, no_env);
        assert_eq!(resolved.retry.attempts, 1);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[interrupt]
timeout_secs = 20
"#;
        let config: ItnConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interrupt.timeout_secs, Some(20));
        assert!(config.interrupt.force.is_none());
        assert!(config.inventory.base_url.is_none());
        assert!(config.retry.attempts.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
log_file = "/tmp/itn-test.log"

[inventory]
base_url = "http://127.0.0.1:9999"

[interrupt]
force = false
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.general.log_file.as_deref(), Some("/tmp/itn-test.log"));
        assert_eq!(
            config.inventory.base_url.as_deref(),
            Some("http://127.0.0.1:9999")
        );
        assert_eq!(config.interrupt.force, Some(false));
    }

    #[test]
    fn test_load_explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[interrupt]\ntimeout_secs = \"fifteen\"\n").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        generate_default_config(&path);
        let config = load_config(Some(&path)).unwrap();
        assert!(config.inventory.base_url.is_none());
    }
}
