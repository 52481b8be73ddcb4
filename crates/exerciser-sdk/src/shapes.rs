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

//! Small stateless drawing helpers for exercises.

use exerciser_core::{Color, Point, Surface};

/// Longest arrow head edge, in pixels.
const ARROW_HEAD_LENGTH: f32 = 8.0;

fn rotate((x, y): (f32, f32), degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Draws an arrow from `start` to `start + offset`.
///
/// The head is scaled down for arrows shorter than its nominal size. A zero
/// offset draws a degenerate line and no head.
pub fn draw_arrow(
    surface: &mut dyn Surface,
    color: Color,
    start: Point,
    offset: (f32, f32),
    width: f32,
) {
    let end = Point::new(start.x + offset.0, start.y + offset.1);
    surface.line(start, end, color, width);

    let length = offset.0.hypot(offset.1);
    if length <= f32::EPSILON {
        return;
    }
    let direction = (offset.0 / length, offset.1 / length);
    let head = ARROW_HEAD_LENGTH.min(length);
    let left = rotate(direction, 140.0);
    let right = rotate(direction, 220.0);
    surface.polyline(
        &[
            Point::new(end.x + left.0 * head, end.y + left.1 * head),
            end,
            Point::new(end.x + right.0 * head, end.y + right.1 * head),
        ],
        color,
        width,
    );
}

/// Draws a dashed line from `start` to `end` with `(dash, gap)` lengths in pixels.
///
/// The last dash may overshoot `end` by less than one dash length.
pub fn draw_dashed_line(
    surface: &mut dyn Surface,
    color: Color,
    start: Point,
    end: Point,
    (dash, gap): (f32, f32),
    width: f32,
) {
    let axis = (end.x - start.x, end.y - start.y);
    let length = axis.0.hypot(axis.1);
    if length <= f32::EPSILON || dash <= 0.0 {
        return;
    }
    let direction = (axis.0 / length, axis.1 / length);
    let period = dash + gap.max(0.0);

    let mut offset = 0.0;
    while offset < length {
        let from = Point::new(start.x + direction.0 * offset, start.y + direction.1 * offset);
        let to = Point::new(from.x + direction.0 * dash, from.y + direction.1 * dash);
        surface.line(from, to, color, width);
        offset += period;
    }
}
