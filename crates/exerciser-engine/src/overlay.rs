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

//! The text drawn over the simulation every frame.
//!
//! [`draw_overlay`] only reads what it is given and the surface size. It has
//! no access to the simulation.

use exerciser_core::{Color, DebugLine, Point, Rect, Surface};

use crate::banner::Banner;
use crate::config::KeyBindings;

const FONT_SIZE: f32 = 20.0;
const LINE_HEIGHT: f32 = 25.0;
const LEFT: f32 = 5.0;
const RIGHT_COLUMN_WIDTH: f32 = 150.0;

/// Everything the overlay shows for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    /// The loop is paused.
    pub paused: bool,
    /// Values shown during the last tick.
    pub tick_values: &'a [DebugLine],
    /// Values shown during this draw.
    pub draw_values: &'a [DebugLine],
    /// FPS readout, when enabled.
    pub fps: Option<&'a str>,
    /// Key bindings to list, when the help overlay is enabled.
    pub help: Option<&'a KeyBindings>,
    /// The banner, when visible.
    pub banner: Option<&'a Banner>,
}

/// The help overlay's lines for `keys`.
pub fn help_lines(keys: &KeyBindings) -> Vec<String> {
    vec![
        format!("{}: pause / resume", keys.pause),
        format!("{}: single step while paused", keys.step),
        format!("{}: restart simulation", keys.restart),
        format!("{}: reload solution", keys.reload),
        format!("{}: toggle FPS", keys.fps),
        format!("{}: toggle this help", keys.help),
        format!("{}: quit", keys.quit),
    ]
}

/// Draws `overlay` on top of whatever is on `surface`.
pub fn draw_overlay(surface: &mut dyn Surface, overlay: &Overlay<'_>) {
    let (width, height) = surface.size();

    for (i, line) in overlay.tick_values.iter().enumerate() {
        surface.text(
            Point::new(LEFT, i as f32 * LINE_HEIGHT),
            &line.text,
            line.color,
            FONT_SIZE,
        );
    }
    let draw_start = overlay.tick_values.len() as f32 * LINE_HEIGHT + 5.0;
    for (i, line) in overlay.draw_values.iter().enumerate() {
        surface.text(
            Point::new(LEFT, draw_start + i as f32 * LINE_HEIGHT),
            &line.text,
            line.color,
            FONT_SIZE,
        );
    }

    let right = (width - RIGHT_COLUMN_WIDTH).max(LEFT);
    let mut right_y = 5.0;
    if overlay.paused {
        surface.text(Point::new(right, right_y), "PAUSED", Color::GRAY, FONT_SIZE);
        right_y += LINE_HEIGHT;
    }
    if let Some(fps) = overlay.fps {
        surface.text(Point::new(right, right_y), fps, Color::BLACK, FONT_SIZE);
    }

    if let Some(keys) = overlay.help {
        let lines = help_lines(keys);
        let box_height = lines.len() as f32 * LINE_HEIGHT + 20.0;
        let box_width = (width * 0.6).max(320.0).min(width);
        let panel = Rect::new(
            (width - box_width) / 2.0,
            (height - box_height) / 2.0,
            box_width,
            box_height,
        );
        surface.rect(panel, Color::rgba(240, 240, 240, 230), None);
        surface.rect(panel, Color::GRAY, Some(1.0));
        for (i, line) in lines.iter().enumerate() {
            surface.text(
                Point::new(panel.x + 15.0, panel.y + 10.0 + i as f32 * LINE_HEIGHT),
                line,
                Color::BLACK,
                FONT_SIZE,
            );
        }
    }

    if let Some(banner) = overlay.banner {
        surface.text(
            Point::new(LEFT, height - LINE_HEIGHT),
            &banner.text,
            banner.color(),
            FONT_SIZE,
        );
    }
}
