//! Playback configuration

use crate::error::{PlaybackError, Result};
use crate::types::LoopMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// How long resolved metadata stays fresh
    #[serde(default = "default_metadata_ttl_secs")]
    pub metadata_ttl_secs: u64,

    /// Resolve+probe attempts before a track is given up on
    #[serde(default = "default_endpoint_attempts")]
    pub endpoint_attempts: u32,

    /// Pause after handing a stream to the sink
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Timeout for a single endpoint liveness probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Loop mode new sessions start in
    #[serde(default)]
    pub initial_loop_mode: LoopMode,
}

fn default_metadata_ttl_secs() -> u64 {
    3 * 60 * 60
}

fn default_endpoint_attempts() -> u32 {
    3
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_probe_timeout_secs() -> u64 {
    10
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            metadata_ttl_secs: default_metadata_ttl_secs(),
            endpoint_attempts: default_endpoint_attempts(),
            settle_delay_ms: default_settle_delay_ms(),
            probe_timeout_secs: default_probe_timeout_secs(),
            initial_loop_mode: LoopMode::Off,
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment variables prefixed with `BOP_` override file values,
    /// e.g. `BOP_SETTLE_DELAY_MS=250`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                settings = settings.add_source(config::File::from(path));
            }
        }

        settings = settings.add_source(config::Environment::with_prefix("BOP").try_parsing(true));

        let loaded: Self = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_attempts == 0 {
            return Err(PlaybackError::Config(
                "endpoint_attempts must be at least 1".to_string(),
            ));
        }

        if self.metadata_ttl_secs == 0 {
            return Err(PlaybackError::Config(
                "metadata_ttl_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
