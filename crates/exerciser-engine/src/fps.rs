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

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of iteration intervals averaged.
const WINDOW: usize = 10;

/// Rolling frames-per-second estimate.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    last: Option<Instant>,
    intervals: VecDeque<Duration>,
}

impl FpsCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of an iteration.
    pub fn record(&mut self, now: Instant) {
        if let Some(last) = self.last {
            if self.intervals.len() == WINDOW {
                self.intervals.pop_front();
            }
            self.intervals.push_back(now.saturating_duration_since(last));
        }
        self.last = Some(now);
    }

    /// Average iterations per second over the recorded window.
    pub fn fps(&self) -> f64 {
        let total: Duration = self.intervals.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.intervals.len() as f64 / total.as_secs_f64()
    }

    /// The overlay text.
    pub fn label(&self) -> String {
        format!("FPS: {:.2}", self.fps())
    }
}
