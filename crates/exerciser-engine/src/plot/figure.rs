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

use exerciser_core::{Color, Point, Rect, Surface};

/// A figure shared between the coordinator, the host and student code.
pub type SharedFigure = Rc<RefCell<dyn Figure>>;

/// An event coming from the window a figure is shown in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FigureEvent {
    /// The user asked to close the figure's window.
    CloseRequested,
    /// The figure's window changed size.
    Resized {
        /// New width in logical pixels.
        width: f32,
        /// New height in logical pixels.
        height: f32,
    },
}

/// What processing a figure's pending events concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureStatus {
    /// The figure stays open.
    Open,
    /// The figure's window was closed.
    CloseRequested,
}

/// A slowly redrawn plot living in its own window.
pub trait Figure {
    /// Unique name, also used as the window title.
    fn name(&self) -> &str;

    /// Returns `true` when the data changed since the last redraw.
    fn is_stale(&self) -> bool;

    /// Rebuilds the cached frame from the current data.
    fn redraw(&mut self);

    /// Queues an event from the figure's window.
    fn push_event(&mut self, event: FigureEvent);

    /// Handles every queued event.
    fn process_events(&mut self) -> FigureStatus;

    /// The frame built by the last redraw, if any.
    fn frame(&self) -> Option<&PlotFrame>;
}

/// One unbroken run of points of a plotted line.
///
/// Coordinates are normalised to `[0, 1]`, with `y = 0` at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSegment {
    /// Line color.
    pub color: Color,
    /// Normalised vertices.
    pub points: Vec<(f32, f32)>,
}

/// A resolution-independent snapshot of a plot, ready to be painted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotFrame {
    /// Plot title.
    pub title: String,
    /// Visible x range.
    pub x_range: (f64, f64),
    /// Visible y range.
    pub y_range: (f64, f64),
    /// The line segments to draw.
    pub segments: Vec<PlotSegment>,
    /// Legend entries in line order.
    pub legend: Vec<(String, Color)>,
    /// Normalised x position of the vertical cursor, if visible.
    pub cursor: Option<f32>,
    /// Text under the x axis.
    pub x_label: Option<String>,
}

const MARGIN_LEFT: f32 = 60.0;
const MARGIN_RIGHT: f32 = 15.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 45.0;
const FONT_SIZE: f32 = 14.0;

impl PlotFrame {
    /// Paints the frame into `bounds` on `surface`.
    pub fn draw_onto(&self, surface: &mut dyn Surface, bounds: Rect) {
        surface.rect(bounds, Color::WHITE, None);

        let area = Rect::new(
            bounds.x + MARGIN_LEFT,
            bounds.y + MARGIN_TOP,
            (bounds.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            (bounds.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        );
        let to_screen =
            |(nx, ny): (f32, f32)| Point::new(area.x + nx * area.width, area.y + ny * area.height);

        surface.text(
            Point::new(area.x, bounds.y + 6.0),
            &self.title,
            Color::BLACK,
            FONT_SIZE + 2.0,
        );
        surface.rect(area, Color::BLACK, Some(1.0));

        let (y_min, y_max) = self.y_range;
        surface.text(
            Point::new(bounds.x + 4.0, area.y),
            &format!("{y_max:.1}"),
            Color::BLACK,
            FONT_SIZE,
        );
        surface.text(
            Point::new(bounds.x + 4.0, area.y + area.height - FONT_SIZE),
            &format!("{y_min:.1}"),
            Color::BLACK,
            FONT_SIZE,
        );
        let (x_min, x_max) = self.x_range;
        surface.text(
            Point::new(area.x, area.y + area.height + 4.0),
            &format!("{x_min:.1}"),
            Color::BLACK,
            FONT_SIZE,
        );
        surface.text(
            Point::new(area.x + area.width - 40.0, area.y + area.height + 4.0),
            &format!("{x_max:.1}"),
            Color::BLACK,
            FONT_SIZE,
        );

        for segment in &self.segments {
            let points: Vec<Point> = segment.points.iter().copied().map(to_screen).collect();
            surface.polyline(&points, segment.color, 1.5);
        }

        if let Some(cursor) = self.cursor {
            surface.line(
                to_screen((cursor, 0.0)),
                to_screen((cursor, 1.0)),
                Color::GRAY,
                1.0,
            );
        }

        for (i, (label, color)) in self.legend.iter().enumerate() {
            surface.text(
                Point::new(area.x + 8.0, area.y + 6.0 + i as f32 * (FONT_SIZE + 4.0)),
                label,
                *color,
                FONT_SIZE,
            );
        }

        if let Some(label) = &self.x_label {
            surface.text(
                Point::new(area.x + area.width / 3.0, area.y + area.height + 22.0),
                label,
                Color::BLACK,
                FONT_SIZE,
            );
        }
    }
}
