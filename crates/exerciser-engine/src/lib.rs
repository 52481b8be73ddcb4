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

//! # Exerciser Engine
//!
//! The run loop that drives student simulations: a fixed-timestep scheduler
//! with pause, single-step and restart, fault isolation around every call into
//! student code, hot reload of the solution file, the debug overlay, and a
//! time-sliced coordinator for slower plot windows.
//!
//! The engine never owns a window. Hosts call [`Engine::step`] once per
//! iteration with the input collected since the previous one and a
//! [`Surface`](exerciser_core::Surface) to draw on.

#![warn(missing_docs)]

pub mod banner;
pub mod config;
pub mod engine;
mod fps;
pub mod guard;
pub mod headless;
pub mod overlay;
pub mod plot;
pub mod proxy;
pub mod source;
pub mod watcher;

pub use banner::{Banner, BannerLevel, Expiry};
pub use config::{ConfigError, EngineConfig, KeyBindings, Pacing};
pub use engine::{
    Engine, EngineCommand, EngineHandle, FaultState, Generation, LoopState, StepReport,
    StepStatus,
};
pub use fps::FpsCounter;
pub use guard::{call_control, run_tick, TickOutcome};
pub use headless::{Pacer, RunLimit, RunSummary};
pub use plot::{
    Figure, FigureEvent, FigureStatus, LinePlot, PlotCoordinator, PlotFrame, PlotHandle, XAxis,
};
pub use source::{FnSource, Registration, Scope, SolutionSource};
pub use watcher::FileWatcher;
