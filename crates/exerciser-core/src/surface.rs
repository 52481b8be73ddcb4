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

//! Abstractions over a mutable 2D drawing target.
//!
//! Any rendering backend (egui, a software rasterizer, a recorder for tests)
//! can implement [`Surface`] to be driven by the engine. Coordinates are in
//! logical pixels with the origin at the top-left corner.

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque red.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Opaque green, darkened for readability on white.
    pub const GREEN: Color = Color::rgb(0, 205, 0);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Opaque gray.
    pub const GRAY: Color = Color::rgb(190, 190, 190);
    /// Opaque orange.
    pub const ORANGE: Color = Color::rgb(255, 140, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A position on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }
}

/// A raster target the engine and simulations draw on every iteration.
pub trait Surface {
    /// Returns the current (width, height) of the drawable area.
    fn size(&self) -> (f32, f32);

    /// Fills the whole surface with `color`.
    fn clear(&mut self, color: Color);

    /// Draws a straight line segment.
    fn line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draws a rectangle. A `width` of `None` fills it.
    fn rect(&mut self, rect: Rect, color: Color, width: Option<f32>);

    /// Draws a circle. A `width` of `None` fills it.
    fn circle(&mut self, center: Point, radius: f32, color: Color, width: Option<f32>);

    /// Draws connected line segments through `points`.
    fn polyline(&mut self, points: &[Point], color: Color, width: f32);

    /// Draws a line of text with its top-left corner at `pos`.
    fn text(&mut self, pos: Point, text: &str, color: Color, size: f32);

    /// Finishes the frame. Backends that present implicitly leave this empty.
    fn present(&mut self) {}

    /// Notifies the surface that the drawable area changed size.
    fn resize(&mut self, _width: f32, _height: f32) {}
}

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The surface was cleared.
    Clear(Color),
    /// A line segment was drawn.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: Color,
    },
    /// A rectangle was drawn.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Fill or stroke color.
        color: Color,
        /// `true` when filled.
        filled: bool,
    },
    /// A circle was drawn.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f32,
        /// Fill or stroke color.
        color: Color,
    },
    /// A polyline was drawn.
    Polyline {
        /// The vertices.
        points: Vec<Point>,
        /// Stroke color.
        color: Color,
    },
    /// Text was drawn.
    Text {
        /// Top-left corner.
        pos: Point,
        /// Content.
        text: String,
        /// Text color.
        color: Color,
    },
}

/// An in-memory [`Surface`] that records every operation of the current frame.
///
/// Used by the headless driver and by tests to observe what would have been
/// drawn. Each [`clear`](Surface::clear) starts a new frame.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingSurface {
    /// Creates a recorder with the given drawable size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Operations recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// All text drawn in the current frame, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if any text drawn in the current frame contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: Point, to: Point, color: Color, _width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn rect(&mut self, rect: Rect, color: Color, width: Option<f32>) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            filled: width.is_none(),
        });
    }

    fn circle(&mut self, center: Point, radius: f32, color: Color, _width: Option<f32>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn polyline(&mut self, points: &[Point], color: Color, _width: f32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, pos: Point, text: &str, color: Color, _size: f32) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
