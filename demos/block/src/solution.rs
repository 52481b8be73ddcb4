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

//! The student's solution: controller gains read from a TOML file.
//!
//! ```toml
//! [pid]
//! kp = 1.5
//! kd = 2.0
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use exerciser::prelude::*;
use serde::Deserialize;

use crate::exercise::{simulate, BlockExercise, ControllerFactory};

#[derive(Debug, Deserialize)]
struct SolutionFile {
    pid: Option<PidGains>,
}

/// Gains of a PID controller.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    #[serde(default)]
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    fn validate(&self) -> Result<(), ValidationError> {
        if [self.kp, self.ki, self.kd].iter().all(|gain| gain.is_finite()) {
            Ok(())
        } else {
            Err(ValidationError::new(format!(
                "PID gains must be finite numbers (kp = {}, ki = {}, kd = {})",
                self.kp, self.ki, self.kd
            )))
        }
    }
}

/// A PID controller estimating velocity from consecutive positions.
///
/// The first call has no previous position, so its output is NaN.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    last_x: f64,
    integral: f64,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            last_x: f64::NAN,
            integral: 0.0,
        }
    }

    pub fn control(&mut self, delta: f64, x: f64) -> f64 {
        let vx = (x - self.last_x) / delta;
        self.last_x = x;
        self.integral += x * delta;
        -self.gains.kp * x - self.gains.ki * self.integral - self.gains.kd * vx
    }

    fn into_controller(mut self) -> Box<dyn Controller<f64>> {
        Box::new(move |delta: f64, x: f64| -> anyhow::Result<f64> {
            Ok(self.control(delta, x))
        })
    }
}

/// A solution file re-read on every reload.
pub struct SolutionToml {
    path: PathBuf,
    delta: f64,
}

impl SolutionToml {
    /// Reads `path`, simulating with a fixed step of `delta` seconds.
    pub fn new(path: impl Into<PathBuf>, delta: f64) -> Self {
        Self {
            path: path.into(),
            delta,
        }
    }
}

impl SolutionSource for SolutionToml {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn watch_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn execute(&self, scope: &mut Scope<'_>) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read '{}'", self.path.display()))?;
        let solution: SolutionFile = toml::from_str(&text)
            .with_context(|| format!("'{}' is not a valid solution", self.path.display()))?;

        let Some(gains) = solution.pid else {
            log::warn!("'{}' has no [pid] table.", self.path.display());
            return Ok(());
        };
        log::debug!("Solution gains: {gains:?}");

        if let Err(err) = gains.validate() {
            let pid = Pid::new(gains);
            let make = move || -> Box<dyn Simulation> {
                Box::new(BlockExercise::new(pid.clone().into_controller()))
            };
            scope.run_with_error(make, err);
            return Ok(());
        }

        let make: ControllerFactory = Rc::new(move || Pid::new(gains).into_controller());
        simulate(scope, make, self.delta);
        Ok(())
    }
}
