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

//! The public-facing API for exercise authors and students.
//!
//! An exercise is a [`SolutionSource`](exerciser_engine::SolutionSource) that
//! registers a simulation. [`run`] opens the window and drives it until the
//! user closes it:
//!
//! ```no_run
//! use exerciser::prelude::*;
//!
//! struct Idle;
//!
//! impl Simulation for Idle {
//!     fn name(&self) -> &str {
//!         "idle"
//!     }
//!
//!     fn tick(&mut self, _delta: f64) -> Result<(), ExerciseError> {
//!         Ok(())
//!     }
//!
//!     fn draw(&self, _surface: &mut dyn Surface) {}
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     exerciser::run(FnSource::new("idle", |scope: &mut Scope<'_>| {
//!         scope.run(|| Box::new(Idle) as Box<dyn Simulation>);
//!         Ok(())
//!     }))
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Result;
use exerciser_core::RecordingSurface;
use exerciser_engine::{Engine, EngineConfig, RunLimit, RunSummary, SolutionSource};

pub mod shapes;

pub use exerciser_core;
pub use exerciser_engine;
pub use exerciser_infra;

/// The types needed to write an exercise or a solution.
pub mod prelude {
    pub use crate::shapes::{draw_arrow, draw_dashed_line};
    pub use crate::{run, run_headless, run_with_config};
    pub use exerciser_core::{
        show_simulation_value, show_value, Color, ControlOutput, Controller, ExerciseError,
        ForceLimit, InputEvent, MouseButton, Point, PointMass, Rect, RunError, Simulation,
        Surface, ValidationError,
    };
    pub use exerciser_engine::{
        call_control, EngineConfig, FnSource, LinePlot, Pacing, PlotHandle, RunLimit, Scope,
        SolutionSource, XAxis,
    };
}

static RUNNING: AtomicBool = AtomicBool::new(false);

/// Held while a windowed run is active.
struct RunGuard;

impl RunGuard {
    fn acquire() -> Option<Self> {
        RUNNING
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        RUNNING.store(false, Ordering::SeqCst);
    }
}

/// Runs `source` in a window, with the configuration discovered in the
/// current directory.
pub fn run(source: impl SolutionSource + 'static) -> Result<()> {
    let config = EngineConfig::discover(std::env::current_dir()?)?;
    run_with_config(config, source)
}

/// Runs `source` in a window until the user closes it.
///
/// Only one windowed run can be active per process; further calls while it
/// runs log a warning and return immediately.
pub fn run_with_config(config: EngineConfig, source: impl SolutionSource + 'static) -> Result<()> {
    let Some(_guard) = RunGuard::acquire() else {
        log::warn!("A run is already active, ignoring '{}'.", source.describe());
        return Ok(());
    };
    let mut engine = Engine::new(config, Box::new(source))?;
    engine.start(Instant::now());
    exerciser_infra::run_native(engine)
}

/// Runs `source` without a window, drawing into a [`RecordingSurface`].
///
/// Headless runs are independent of each other and of a windowed run.
pub fn run_headless(
    config: EngineConfig,
    source: impl SolutionSource + 'static,
    limit: RunLimit,
) -> Result<RunSummary> {
    let mut engine = Engine::new(config, Box::new(source))?;
    engine.start(Instant::now());
    let (width, height) = engine.initial_window_size();
    let mut surface = RecordingSurface::new(width as f32, height as f32);
    Ok(exerciser_engine::headless::run(&mut engine, &mut surface, limit))
}
