// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration.
//!
//! Every field has a default, so an `exerciser.toml` only needs the keys it
//! wants to change:
//!
//! ```toml
//! ticks_per_second = 120
//! pacing = "unpaced"
//!
//! [keys]
//! pause = "P"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up by [`EngineConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "exerciser.toml";

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the loop is paced against the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Wait at the end of each iteration so the loop runs at the tick rate.
    #[default]
    RealTime,
    /// Never wait; run iterations back to back.
    Unpaced,
}

/// Key names bound to the engine's global actions.
///
/// Names follow the windowing backend's key names, e.g. `"R"`, `"Space"`, `"F1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quits the run.
    pub quit: String,
    /// Rebuilds the simulation from its factory.
    pub restart: String,
    /// Toggles between running and paused.
    pub pause: String,
    /// Runs exactly one tick while paused.
    pub step: String,
    /// Toggles the help overlay.
    pub help: String,
    /// Toggles the FPS readout.
    pub fps: String,
    /// Re-executes the solution source.
    pub reload: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "Escape".to_string(),
            restart: "F5".to_string(),
            pause: "Space".to_string(),
            step: "N".to_string(),
            help: "H".to_string(),
            fps: "F1".to_string(),
            reload: "R".to_string(),
        }
    }
}

/// Run-loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed logical tick rate.
    pub ticks_per_second: u32,
    /// Wall-clock pacing mode.
    pub pacing: Pacing,
    /// How often the solution file's modification time is checked.
    pub reload_poll_interval_ms: u64,
    /// Lifetime of informational banners.
    pub info_message_ms: u64,
    /// Share of one tick period handed to the plot coordinator each iteration.
    pub plot_budget_fraction: f64,
    /// Plots are only redrawn every this many iterations.
    pub plot_redraw_every: u32,
    /// Window width used when the simulation has no preference.
    pub window_width: u32,
    /// Window height used when the simulation has no preference.
    pub window_height: u32,
    /// Global key bindings.
    pub keys: KeyBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            pacing: Pacing::RealTime,
            reload_poll_interval_ms: 1000,
            info_message_ms: 2000,
            plot_budget_fraction: 0.2,
            plot_redraw_every: 3,
            window_width: 800,
            window_height: 600,
            keys: KeyBindings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded engine config from '{}'.", path.display());
        Ok(config)
    }

    /// Loads `exerciser.toml` from `dir` if it exists, otherwise returns defaults.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            log::debug!("No {CONFIG_FILE_NAME} found, using default engine config.");
            Ok(Self::default())
        }
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be > 0".to_string(),
            ));
        }
        if !(self.plot_budget_fraction > 0.0 && self.plot_budget_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "plot_budget_fraction must be in (0, 1], got {}",
                self.plot_budget_fraction
            )));
        }
        if self.plot_redraw_every == 0 {
            return Err(ConfigError::Invalid(
                "plot_redraw_every must be > 0".to_string(),
            ));
        }
        if self.reload_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "reload_poll_interval_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The fixed simulation delta in seconds.
    pub fn delta(&self) -> f64 {
        1.0 / f64::from(self.ticks_per_second)
    }

    /// The tick period as a wall-clock duration.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(self.delta())
    }

    /// The time slice handed to the plot coordinator every iteration.
    pub fn plot_budget(&self) -> Duration {
        self.tick_period().mul_f64(self.plot_budget_fraction)
    }

    /// Interval between two modification-time checks.
    pub fn reload_poll_interval(&self) -> Duration {
        Duration::from_millis(self.reload_poll_interval_ms)
    }

    /// Lifetime of informational banners.
    pub fn info_message_duration(&self) -> Duration {
        Duration::from_millis(self.info_message_ms)
    }
}
