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

//! The contract every exercise implements to be driven by the engine.

use crate::error::ExerciseError;
use crate::input::InputEvent;
use crate::surface::Surface;

/// A unit of student-controlled behaviour driven at a fixed tick rate.
///
/// The engine owns the active simulation exclusively. It is replaced wholesale
/// on restart or reload and never mutated from the outside.
///
/// Only [`tick`](Simulation::tick) may fail. A failure is recorded by the engine
/// and permanently disables ticking and input for this instance; drawing carries
/// on with the last state the simulation reached.
pub trait Simulation {
    /// Display name, used for the window caption.
    fn name(&self) -> &str;

    /// Preferred initial window size, if any.
    fn initial_window_size(&self) -> Option<(u32, u32)> {
        None
    }

    /// Advances the state by exactly `delta` seconds.
    fn tick(&mut self, delta: f64) -> Result<(), ExerciseError>;

    /// Presents the current state. Must not mutate simulation state.
    ///
    /// A panic here is not isolated and terminates the process.
    fn draw(&self, surface: &mut dyn Surface);

    /// Receives the batch of input events polled this iteration.
    fn handle_input(&mut self, _events: &[InputEvent]) {}

    /// Called once, the first iteration this instance is observed as active.
    fn post_init(&mut self) {}

    /// Best-effort hook called right before this instance is replaced.
    fn cleanup(&mut self) {}
}

/// Builds fresh simulation instances, used for restarts.
pub type SimulationFactory = Box<dyn Fn() -> Box<dyn Simulation>>;
