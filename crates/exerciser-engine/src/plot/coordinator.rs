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

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use exerciser_core::Stopwatch;

use super::figure::{FigureStatus, SharedFigure};
use super::line_plot::{LinePlot, PlotHandle};

/// What one plot slice did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceReport {
    /// Names of the figures redrawn during the slice, in order.
    pub redrawn: Vec<String>,
    /// A figure window was closed.
    pub quit_requested: bool,
}

/// Owns the figures and time-slices their redraws against the main loop.
///
/// Figures persist for the whole run, across reloads and restarts, so a
/// student's plot window stays put while the code behind it changes.
pub struct PlotCoordinator {
    figures: Vec<SharedFigure>,
    line_plots: Vec<(String, PlotHandle)>,
    redraw_every: u32,
    next_start: usize,
}

impl PlotCoordinator {
    /// Creates a coordinator that considers redraws every `redraw_every` iterations.
    pub fn new(redraw_every: u32) -> Self {
        Self {
            figures: Vec::new(),
            line_plots: Vec::new(),
            redraw_every: redraw_every.max(1),
            next_start: 0,
        }
    }

    /// Registers a custom figure.
    pub fn register(&mut self, figure: SharedFigure) {
        log::debug!("Registered figure '{}'.", figure.borrow().name());
        self.figures.push(figure);
    }

    /// Returns the line plot called `name`, creating it on first use.
    pub fn line_plot(&mut self, name: &str) -> PlotHandle {
        if let Some((_, plot)) = self.line_plots.iter().find(|(existing, _)| existing == name) {
            return Rc::clone(plot);
        }
        let plot: PlotHandle = Rc::new(RefCell::new(LinePlot::new(name)));
        self.line_plots.push((name.to_string(), Rc::clone(&plot)));
        self.register(plot.clone());
        plot
    }

    /// Every figure, in registration order.
    pub fn figures(&self) -> &[SharedFigure] {
        &self.figures
    }

    /// Looks a figure up by name.
    pub fn find(&self, name: &str) -> Option<&SharedFigure> {
        self.figures
            .iter()
            .find(|figure| figure.borrow().name() == name)
    }

    /// Returns `true` when no figure is registered.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Runs one bounded slice of plot work.
    ///
    /// Pending window events of every figure are processed on every call. On
    /// iterations that are a multiple of the redraw period, stale figures are
    /// redrawn in round-robin order until `budget` is spent. The first stale
    /// figure of a slice is always redrawn, and the round-robin start moves by
    /// one each time, so no figure waits forever.
    pub fn yield_slice(&mut self, budget: Duration, iteration: u64) -> SliceReport {
        let watch = Stopwatch::new();
        let mut report = SliceReport::default();

        for figure in &self.figures {
            let mut figure = figure.borrow_mut();
            if figure.process_events() == FigureStatus::CloseRequested {
                log::info!("Figure '{}' was closed.", figure.name());
                report.quit_requested = true;
            }
        }

        if self.figures.is_empty() || iteration % u64::from(self.redraw_every) != 0 {
            return report;
        }

        let count = self.figures.len();
        let start = self.next_start % count;
        self.next_start = (start + 1) % count;

        for offset in 0..count {
            let mut figure = self.figures[(start + offset) % count].borrow_mut();
            if !figure.is_stale() {
                continue;
            }
            if !report.redrawn.is_empty() && watch.remaining(budget).is_zero() {
                log::trace!("Plot slice budget spent after {} redraws.", report.redrawn.len());
                break;
            }
            figure.redraw();
            report.redrawn.push(figure.name().to_string());
        }
        report
    }
}
