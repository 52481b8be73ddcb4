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

//! Driving the engine without a window.

use std::time::Instant;

use exerciser_core::{InputEvent, Surface};

use crate::engine::{Engine, StepStatus};

/// Waits between iterations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacer;

impl Pacer {
    /// Sleeps until `deadline`. `None`, or a deadline already passed, returns at once.
    pub fn wait_until(&self, deadline: Option<Instant>) {
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
    }
}

/// When the headless driver stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLimit {
    /// Stop after this many iterations, or earlier on termination.
    Iterations(u64),
    /// Stop only when the engine terminates.
    UntilTerminated,
}

/// What a headless run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Iterations executed.
    pub iterations: u64,
    /// Iterations in which the simulation ticked.
    pub ticks: u64,
    /// The engine terminated before the limit.
    pub terminated: bool,
}

/// Steps `engine` against `surface` until `limit` is reached or it terminates.
///
/// No input is ever delivered. Pacing follows the engine's configuration.
pub fn run(engine: &mut Engine, surface: &mut dyn Surface, limit: RunLimit) -> RunSummary {
    let pacer = Pacer;
    let mut summary = RunSummary {
        iterations: 0,
        ticks: 0,
        terminated: false,
    };
    let no_input: [InputEvent; 0] = [];

    loop {
        if let RunLimit::Iterations(max) = limit {
            if summary.iterations >= max {
                break;
            }
        }
        let report = engine.step(&no_input, surface, Instant::now());
        if report.status == StepStatus::Terminated {
            summary.terminated = true;
            break;
        }
        summary.iterations += 1;
        if report.ticked {
            summary.ticks += 1;
        }
        pacer.wait_until(report.next_deadline);
    }

    log::info!(
        "Headless run finished after {} iterations ({} ticks).",
        summary.iterations,
        summary.ticks
    );
    summary
}
