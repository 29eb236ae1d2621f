//! Dashboard configuration.
//!
//! Loaded from a JSON file (`~/.countdown-dash/config.json` unless a path is
//! given); a missing file means defaults. A couple of retry knobs can also be
//! overridden from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::router::{RetryPolicy, RouteBinding};

pub const RETRY_ATTEMPTS_ENV: &str = "COUNTDOWN_DASH_RETRY_ATTEMPTS";
pub const RETRY_DELAY_ENV: &str = "COUNTDOWN_DASH_RETRY_DELAY_MS";

const CONFIG_DIR: &str = ".countdown-dash";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashConfig {
    /// Pause before the first registration attempt.
    pub bootstrap_delay_ms: u64,
    pub retry: RetryPolicy,
    pub overlay_fade_ms: u64,
    /// How long the CLI waits for every module before reporting.
    pub ready_timeout_ms: u64,
    /// Per-request timeout for HTTP template sources.
    pub template_timeout_ms: u64,
    pub default_route: String,
    /// Module names the readiness barrier waits for.
    pub modules: Vec<String>,
    pub routes: Vec<RouteBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_target: Option<DateTime<Utc>>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            bootstrap_delay_ms: 50,
            retry: RetryPolicy::default(),
            overlay_fade_ms: 500,
            ready_timeout_ms: 5_000,
            template_timeout_ms: 8_000,
            default_route: "home".to_string(),
            modules: vec![
                "router".to_string(),
                "countdown".to_string(),
                "initial-view".to_string(),
            ],
            routes: vec![
                RouteBinding::new("home", "HomeView"),
                RouteBinding::new("countdown", "CountdownView"),
                RouteBinding::new("news", "NewsView"),
                RouteBinding::new("markets", "MarketsView"),
                RouteBinding::new("visits", "VisitsView"),
                RouteBinding::new("about", "AboutView"),
            ],
            countdown_target: None,
        }
    }
}

impl DashConfig {
    pub fn bootstrap_delay(&self) -> Duration {
        Duration::from_millis(self.bootstrap_delay_ms)
    }

    pub fn overlay_fade(&self) -> Duration {
        Duration::from_millis(self.overlay_fade_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn template_timeout(&self) -> Duration {
        Duration::from_millis(self.template_timeout_ms)
    }

    /// Default config location, `None` if there is no home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: DashConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Resolve, load, apply env overrides and validate.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(attempts) = env_number::<u32>(RETRY_ATTEMPTS_ENV) {
            self.retry.max_attempts = attempts;
        }
        if let Some(delay_ms) = env_number::<u64>(RETRY_DELAY_ENV) {
            self.retry.delay_ms = delay_ms;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.maxAttempts must be at least 1".to_string(),
            ));
        }
        if !self.routes.iter().any(|b| b.route == self.default_route) {
            return Err(ConfigError::Invalid(format!(
                "default route '{}' is not among the configured routes",
                self.default_route
            )));
        }
        for (i, binding) in self.routes.iter().enumerate() {
            if self.routes[..i].iter().any(|b| b.route == binding.route) {
                return Err(ConfigError::Invalid(format!(
                    "route '{}' is configured more than once",
                    binding.route
                )));
            }
        }
        Ok(())
    }
}

fn env_number<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", var, raw);
            None
        }
    }
}
