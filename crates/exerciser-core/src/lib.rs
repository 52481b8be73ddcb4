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

//! # Exerciser Core
//!
//! Foundational crate containing the traits, plain types and error taxonomy
//! shared by the run-loop engine, the windowing backends and student code.

#![warn(missing_docs)]

pub mod control;
pub mod debug;
pub mod error;
pub mod event;
pub mod input;
pub mod physics;
pub mod simulation;
pub mod surface;
pub mod timer;

pub use control::{ControlOutput, Controller};
pub use debug::{show_simulation_value, show_value, DebugLine, DebugScope, ShowValue};
pub use error::{ExerciseError, ReloadError, RunError, ValidationError};
pub use event::EventBus;
pub use input::{InputEvent, MouseButton};
pub use physics::{ForceLimit, PointMass};
pub use simulation::{Simulation, SimulationFactory};
pub use surface::{Color, DrawCommand, Point, RecordingSurface, Rect, Surface};
pub use timer::Stopwatch;
