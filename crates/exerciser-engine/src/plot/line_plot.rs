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
use std::collections::VecDeque;
use std::rc::Rc;

use exerciser_core::{Color, Rect, Surface};

use super::figure::{Figure, FigureEvent, FigureStatus, PlotFrame, PlotSegment};

/// A line plot shared with student code through [`Scope::figure`](crate::Scope::figure).
pub type PlotHandle = Rc<RefCell<LinePlot>>;

/// A y jump larger than this share of the y range breaks the line.
const DISCONTINUITY_RATIO: f64 = 0.8;

/// How the x axis is bounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XAxis {
    /// A window of the given width that follows the newest point.
    Sliding(f64),
    /// Fixed bounds.
    Fixed(f64, f64),
}

#[derive(Debug, Clone)]
struct Line {
    label: String,
    color: Color,
    points: VecDeque<(f64, f64)>,
}

/// Named lines over a shared x axis.
#[derive(Debug)]
pub struct LinePlot {
    name: String,
    lines: Vec<Line>,
    y_bounds: (f64, f64),
    x_axis: XAxis,
    point_limit: Option<usize>,
    cursor: Option<f64>,
    x_label: Option<String>,
    stale: bool,
    frame: Option<PlotFrame>,
    pending: Vec<FigureEvent>,
}

impl LinePlot {
    /// Creates an empty plot with y bounds `[-1, 1]` and a 10 unit sliding window.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            y_bounds: (-1.0, 1.0),
            x_axis: XAxis::Sliding(10.0),
            point_limit: None,
            cursor: None,
            x_label: None,
            stale: true,
            frame: None,
            pending: Vec::new(),
        }
    }

    /// Sets the y bounds.
    pub fn set_y_bounds(&mut self, min: f64, max: f64) {
        if self.y_bounds != (min, max) {
            self.y_bounds = (min, max);
            self.stale = true;
        }
    }

    /// Sets how the x axis is bounded.
    pub fn set_x_axis(&mut self, x_axis: XAxis) {
        if self.x_axis != x_axis {
            self.x_axis = x_axis;
            self.stale = true;
        }
    }

    /// Keeps at most `limit` points per line, dropping the oldest.
    pub fn set_point_limit(&mut self, limit: Option<usize>) {
        self.point_limit = limit;
        if let Some(limit) = limit {
            for line in &mut self.lines {
                while line.points.len() > limit {
                    line.points.pop_front();
                }
            }
        }
        self.stale = true;
    }

    /// Returns the index of the line called `label`, creating it if needed.
    ///
    /// An existing line keeps its points but takes the new color.
    pub fn line(&mut self, label: &str, color: Color) -> usize {
        if let Some(index) = self.lines.iter().position(|line| line.label == label) {
            if self.lines[index].color != color {
                self.lines[index].color = color;
                self.stale = true;
            }
            return index;
        }
        self.lines.push(Line {
            label: label.to_string(),
            color,
            points: VecDeque::new(),
        });
        self.stale = true;
        self.lines.len() - 1
    }

    /// Appends a point to the line at `index`. Unknown indices are ignored.
    pub fn push(&mut self, index: usize, x: f64, y: f64) {
        let Some(line) = self.lines.get_mut(index) else {
            log::warn!("Plot '{}' has no line #{index}.", self.name);
            return;
        };
        line.points.push_back((x, y));
        if let Some(limit) = self.point_limit {
            while line.points.len() > limit {
                line.points.pop_front();
            }
        }
        self.stale = true;
    }

    /// Removes every point, keeping the lines.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.points.clear();
        }
        self.stale = true;
    }

    /// Moves the vertical cursor. `None` hides it.
    pub fn set_cursor(&mut self, x: Option<f64>) {
        if self.cursor != x {
            self.cursor = x;
            self.stale = true;
        }
    }

    /// Sets the text under the x axis.
    pub fn set_x_label(&mut self, label: Option<String>) {
        if self.x_label != label {
            self.x_label = label;
            self.stale = true;
        }
    }

    /// The text under the x axis.
    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref()
    }

    /// Number of points on the line at `index`.
    pub fn len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |line| line.points.len())
    }

    /// Returns `true` when no line has any point.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.points.is_empty())
    }

    /// Paints the last redrawn frame into `bounds`. Nothing is drawn before the first redraw.
    pub fn draw_onto(&self, surface: &mut dyn Surface, bounds: Rect) {
        if let Some(frame) = &self.frame {
            frame.draw_onto(surface, bounds);
        }
    }

    fn visible_x_range(&self) -> (f64, f64) {
        match self.x_axis {
            XAxis::Fixed(min, max) => (min, max),
            XAxis::Sliding(width) => {
                let newest = self
                    .lines
                    .iter()
                    .filter_map(|line| line.points.back().map(|&(x, _)| x))
                    .fold(f64::NEG_INFINITY, f64::max);
                if newest.is_finite() && newest > width {
                    (newest - width, newest)
                } else {
                    (0.0, width)
                }
            }
        }
    }

    fn build_frame(&self) -> PlotFrame {
        let (x_min, x_max) = self.visible_x_range();
        let (y_min, y_max) = self.y_bounds;
        let x_span = (x_max - x_min).max(f64::EPSILON);
        let y_span = (y_max - y_min).max(f64::EPSILON);
        let normalise = |x: f64, y: f64| {
            (
                ((x - x_min) / x_span) as f32,
                (1.0 - ((y - y_min) / y_span).clamp(0.0, 1.0)) as f32,
            )
        };

        let mut segments = Vec::new();
        for line in &self.lines {
            let mut current: Vec<(f32, f32)> = Vec::new();
            let mut previous_y: Option<f64> = None;
            for &(x, y) in &line.points {
                let jump = previous_y
                    .is_some_and(|prev| (y - prev).abs() > DISCONTINUITY_RATIO * y_span);
                let breaks = !y.is_finite() || jump;
                if breaks || x < x_min || x > x_max {
                    if current.len() > 1 {
                        segments.push(PlotSegment {
                            color: line.color,
                            points: std::mem::take(&mut current),
                        });
                    }
                    current.clear();
                }
                if y.is_finite() && x >= x_min && x <= x_max {
                    current.push(normalise(x, y));
                    previous_y = Some(y);
                } else {
                    previous_y = None;
                }
            }
            if current.len() > 1 {
                segments.push(PlotSegment {
                    color: line.color,
                    points: current,
                });
            }
        }

        let cursor = self
            .cursor
            .filter(|x| *x >= x_min && *x <= x_max)
            .map(|x| ((x - x_min) / x_span) as f32);

        PlotFrame {
            title: self.name.clone(),
            x_range: (x_min, x_max),
            y_range: (y_min, y_max),
            segments,
            legend: self
                .lines
                .iter()
                .map(|line| (line.label.clone(), line.color))
                .collect(),
            cursor,
            x_label: self.x_label.clone(),
        }
    }
}

impl Figure for LinePlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_stale(&self) -> bool {
        self.stale
    }

    fn redraw(&mut self) {
        self.frame = Some(self.build_frame());
        self.stale = false;
    }

    fn push_event(&mut self, event: FigureEvent) {
        self.pending.push(event);
    }

    fn process_events(&mut self) -> FigureStatus {
        let mut status = FigureStatus::Open;
        for event in self.pending.drain(..) {
            match event {
                FigureEvent::CloseRequested => status = FigureStatus::CloseRequested,
                FigureEvent::Resized { .. } => self.stale = true,
            }
        }
        status
    }

    fn frame(&self) -> Option<&PlotFrame> {
        self.frame.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> LinePlot {
        let mut plot = LinePlot::new("block");
        plot.set_y_bounds(-100.0, 100.0);
        plot.set_x_axis(XAxis::Fixed(0.0, 10.0));
        plot
    }

    #[test]
    fn redraw_clears_staleness_and_mutation_sets_it() {
        let mut plot = plot();
        let x = plot.line("x", Color::BLUE);
        plot.redraw();
        assert!(!plot.is_stale());
        plot.push(x, 1.0, 2.0);
        assert!(plot.is_stale());
        plot.redraw();
        plot.set_cursor(None);
        assert!(!plot.is_stale(), "unchanged cursor should not dirty the plot");
    }

    #[test]
    fn lines_are_get_or_create_by_label() {
        let mut plot = plot();
        let first = plot.line("x", Color::BLUE);
        plot.push(first, 0.0, 1.0);
        let again = plot.line("x", Color::RED);
        assert_eq!(first, again);
        assert_eq!(plot.len(first), 1);
        assert_ne!(plot.line("vx", Color::GREEN), first);
    }

    #[test]
    fn large_jumps_split_the_line() {
        let mut plot = plot();
        let x = plot.line("x", Color::BLUE);
        for (t, y) in [(0.0, 0.0), (1.0, 10.0), (2.0, 90.0), (3.0, -90.0), (4.0, -80.0)] {
            plot.push(x, t, y);
        }
        plot.redraw();
        let frame = plot.frame().expect("frame after redraw");
        // 90 -> -90 is a jump of 180 > 0.8 * 200.
        assert_eq!(frame.segments.len(), 2);
        assert_eq!(frame.segments[0].points.len(), 3);
        assert_eq!(frame.segments[1].points.len(), 2);
    }

    #[test]
    fn nan_points_break_the_line() {
        let mut plot = plot();
        let f = plot.line("F", Color::RED);
        for (t, y) in [(0.0, 1.0), (1.0, 2.0), (2.0, f64::NAN), (3.0, 1.0), (4.0, 2.0)] {
            plot.push(f, t, y);
        }
        plot.redraw();
        assert_eq!(plot.frame().map(|frame| frame.segments.len()), Some(2));
    }

    #[test]
    fn sliding_window_follows_newest_point() {
        let mut plot = LinePlot::new("live");
        plot.set_x_axis(XAxis::Sliding(5.0));
        let x = plot.line("x", Color::BLUE);
        plot.redraw();
        assert_eq!(plot.frame().map(|frame| frame.x_range), Some((0.0, 5.0)));

        for i in 0..=20 {
            plot.push(x, f64::from(i) * 0.5, 0.0);
        }
        plot.redraw();
        assert_eq!(plot.frame().map(|frame| frame.x_range), Some((5.0, 10.0)));
    }

    #[test]
    fn point_limit_drops_oldest() {
        let mut plot = plot();
        plot.set_point_limit(Some(3));
        let x = plot.line("x", Color::BLUE);
        for i in 0..10 {
            plot.push(x, f64::from(i), 0.0);
        }
        assert_eq!(plot.len(x), 3);
    }

    #[test]
    fn cursor_and_label_reach_the_frame() {
        let mut plot = plot();
        plot.set_cursor(Some(2.5));
        plot.set_x_label(Some("Error simulating solution at t = 1.00".to_string()));
        plot.redraw();
        let frame = plot.frame().expect("frame");
        assert_eq!(frame.cursor, Some(0.25));
        assert_eq!(
            frame.x_label.as_deref(),
            Some("Error simulating solution at t = 1.00")
        );
    }

    #[test]
    fn close_request_is_reported_once() {
        let mut plot = plot();
        plot.push_event(FigureEvent::Resized {
            width: 640.0,
            height: 480.0,
        });
        plot.push_event(FigureEvent::CloseRequested);
        assert_eq!(plot.process_events(), FigureStatus::CloseRequested);
        assert_eq!(plot.process_events(), FigureStatus::Open);
    }
}
