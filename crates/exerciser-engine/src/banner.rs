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

//! The single on-screen status message.

use std::time::{Duration, Instant};

use exerciser_core::Color;

use crate::engine::Generation;

/// Severity of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    /// Informational, e.g. a successful reload.
    Info,
    /// Something the student should look at.
    Warning,
    /// A fault in the student's code.
    Error,
}

impl BannerLevel {
    /// The text color for this level.
    pub fn color(self) -> Color {
        match self {
            BannerLevel::Info => Color::BLUE,
            BannerLevel::Warning => Color::ORANGE,
            BannerLevel::Error => Color::RED,
        }
    }
}

/// When a banner disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Hidden from this instant on.
    At(Instant),
    /// Visible until replaced.
    Never,
}

/// A message shown at the bottom of the window.
///
/// Only one banner exists at a time; posting a new one replaces the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    /// The message.
    pub text: String,
    /// Its severity.
    pub level: BannerLevel,
    /// When it stops being shown.
    pub expiry: Expiry,
    /// The simulation generation that was active when it was posted.
    pub generation: Generation,
}

impl Banner {
    /// An informational banner that expires after `lifetime`.
    pub fn info(
        text: impl Into<String>,
        generation: Generation,
        now: Instant,
        lifetime: Duration,
    ) -> Self {
        Self {
            text: text.into(),
            level: BannerLevel::Info,
            expiry: Expiry::At(now + lifetime),
            generation,
        }
    }

    /// A warning that stays until replaced.
    pub fn warning(text: impl Into<String>, generation: Generation) -> Self {
        Self {
            text: text.into(),
            level: BannerLevel::Warning,
            expiry: Expiry::Never,
            generation,
        }
    }

    /// An error that stays until replaced.
    pub fn error(text: impl Into<String>, generation: Generation) -> Self {
        Self {
            text: text.into(),
            level: BannerLevel::Error,
            expiry: Expiry::Never,
            generation,
        }
    }

    /// The text color.
    pub fn color(&self) -> Color {
        self.level.color()
    }

    /// Returns `true` while the banner has not expired.
    pub fn is_visible(&self, now: Instant) -> bool {
        match self.expiry {
            Expiry::At(deadline) => now < deadline,
            Expiry::Never => true,
        }
    }

    /// Echoes the banner to the log at the matching level.
    pub fn log(&self) {
        match self.level {
            BannerLevel::Info => log::info!("{}", self.text),
            BannerLevel::Warning => log::warn!("{}", self.text),
            BannerLevel::Error => log::error!("{}", self.text),
        }
    }
}
