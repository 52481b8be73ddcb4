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

//! Lightweight monotonic timing primitives.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from a start instant.
///
/// Used to bound time slices: callers ask how much of a budget is left with
/// [`remaining`](Stopwatch::remaining) before starting more work.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Starts a stopwatch now.
    #[inline]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Starts a stopwatch at an explicit instant.
    #[inline]
    pub fn started_at(started: Instant) -> Self {
        Self { started }
    }

    /// The instant the stopwatch was started.
    #[inline]
    pub fn start(&self) -> Instant {
        self.started
    }

    /// Time elapsed since the start.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time elapsed between the start and `now`. Zero if `now` is earlier.
    #[inline]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// How much of `budget` is left, zero once it is spent.
    #[inline]
    pub fn remaining(&self, budget: Duration) -> Duration {
        budget.saturating_sub(self.elapsed())
    }

    /// Restarts the stopwatch at `now`.
    #[inline]
    pub fn restart(&mut self, now: Instant) {
        self.started = now;
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
