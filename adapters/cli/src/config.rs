//! Optional TOML configuration for the Balloon Popper command-line adapter.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use balloon_pop_core::{SpeedRamp, DEFAULT_SPAWN_INTERVAL_MS};
use serde::Deserialize;
use thiserror::Error;

/// Settings loaded from the configuration file. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Seed for the balloon spawner; a random seed is drawn when absent.
    pub(crate) seed: Option<u64>,
    /// Window presentation settings.
    pub(crate) window: WindowConfig,
    /// Accelerating spawn rate.
    pub(crate) spawn: SpawnConfig,
}

/// Window presentation settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    /// Title of the created window.
    pub(crate) title: String,
    /// Initial window width in pixels.
    pub(crate) width: u32,
    /// Initial window height in pixels.
    pub(crate) height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: balloon_pop_core::WELCOME_BANNER.to_string(),
            width: 480,
            height: 820,
        }
    }
}

/// Spawn cadence and the speed ramp applied to successive balloons.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawnConfig {
    /// Milliseconds between two balloon releases.
    pub(crate) interval_ms: u64,
    /// Travel time of the first balloon of a round, in milliseconds.
    pub(crate) base_travel_ms: u64,
    /// Speed multiplier applied after every spawn.
    pub(crate) speed_growth: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            base_travel_ms: SpeedRamp::DEFAULT_BASE_TRAVEL_MS,
            speed_growth: SpeedRamp::DEFAULT_GROWTH,
        }
    }
}

impl SpawnConfig {
    /// Cadence at which balloons are released.
    pub(crate) fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Speed ramp derived from the configured base travel and growth.
    pub(crate) fn speed_ramp(&self) -> SpeedRamp {
        SpeedRamp::new(Duration::from_millis(self.base_travel_ms), self.speed_growth)
    }
}

impl GameConfig {
    /// Reads and validates a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates configuration from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        if self.spawn.interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if !self.spawn.speed_growth.is_finite() || self.spawn.speed_growth < 1.0 {
            return Err(ConfigError::DeceleratingGrowth {
                growth: self.spawn.speed_growth,
            });
        }
        Ok(())
    }
}

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid TOML or contains unknown keys.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        source: toml::de::Error,
    },
    /// The window must have a visible area.
    #[error("window size must be positive (received {width}x{height})")]
    EmptyWindow {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// Balloons must be released at a positive interval.
    #[error("spawn interval must be positive")]
    ZeroSpawnInterval,
    /// Balloons may only get faster during a round.
    #[error("speed growth must be at least 1.0 (received {growth})")]
    DeceleratingGrowth {
        /// Configured growth factor.
        growth: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.spawn.interval(), Duration::from_millis(500));
        assert_eq!(config.spawn.speed_ramp(), SpeedRamp::default());
        assert_eq!(config.window.title, "Balloon Popper");
    }

    #[test]
    fn default_spawn_settings_match_core_durations() {
        let spawn = SpawnConfig::default();
        assert_eq!(spawn.interval(), balloon_pop_core::DEFAULT_SPAWN_INTERVAL);
        assert_eq!(
            spawn.speed_ramp().base_travel(),
            SpeedRamp::DEFAULT_BASE_TRAVEL
        );
    }

    #[test]
    fn sections_override_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 99

            [window]
            width = 600

            [spawn]
            interval_ms = 750
            speed_growth = 1.05
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.window.width, 600);
        assert_eq!(config.window.height, 820);
        assert_eq!(config.spawn.interval(), Duration::from_millis(750));
        assert_eq!(config.spawn.base_travel_ms, 2000);
        assert!((config.spawn.speed_growth - 1.05).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = GameConfig::from_toml_str("[rules]\nround_length = 30\n")
            .expect_err("unknown section must fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn slowing_balloons_are_rejected() {
        let error = GameConfig::from_toml_str("[spawn]\nspeed_growth = 0.8\n")
            .expect_err("decelerating ramp must fail");
        assert!(matches!(error, ConfigError::DeceleratingGrowth { .. }));

        let error = GameConfig::from_toml_str("[spawn]\ninterval_ms = 0\n")
            .expect_err("zero interval must fail");
        assert!(matches!(error, ConfigError::ZeroSpawnInterval));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/balloon-pop.toml");
        let error = GameConfig::load(path).expect_err("missing file must fail");
        assert!(error.to_string().contains("balloon-pop.toml"));
    }
}
