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

//! A simulation stand-in for solutions rejected before they run.

use exerciser_core::{ExerciseError, InputEvent, Simulation, Surface};

/// Wraps a simulation so that its first tick reports a known error.
///
/// Everything else is forwarded, so the wrapped simulation keeps being drawn
/// in its initial state while the error is on screen.
pub struct ErrorProxy {
    inner: Box<dyn Simulation>,
    error: Option<ExerciseError>,
}

impl ErrorProxy {
    /// Wraps `inner`, failing its first tick with `error`.
    pub fn new(inner: Box<dyn Simulation>, error: ExerciseError) -> Self {
        Self {
            inner,
            error: Some(error),
        }
    }
}

impl Simulation for ErrorProxy {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn initial_window_size(&self) -> Option<(u32, u32)> {
        self.inner.initial_window_size()
    }

    fn tick(&mut self, delta: f64) -> Result<(), ExerciseError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => self.inner.tick(delta),
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.inner.draw(surface);
    }

    fn handle_input(&mut self, events: &[InputEvent]) {
        self.inner.handle_input(events);
    }

    fn post_init(&mut self) {
        self.inner.post_init();
    }

    fn cleanup(&mut self) {
        self.inner.cleanup();
    }
}
