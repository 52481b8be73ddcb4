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

//! A [`Surface`] that paints through an `egui::Painter`.

use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, StrokeKind};
use exerciser_core::{Color, Point, Rect, Surface};

/// Paints engine drawing commands into a rectangle of an egui layer.
///
/// Surface coordinates are relative to the top-left corner of that rectangle.
pub struct EguiSurface {
    painter: Painter,
    area: egui::Rect,
}

impl EguiSurface {
    /// Wraps `painter`, drawing into `area`.
    pub fn new(painter: Painter, area: egui::Rect) -> Self {
        Self { painter, area }
    }

    fn pos(&self, point: Point) -> Pos2 {
        to_screen(self.area.min, point)
    }

    fn to_egui_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.pos(Point::new(rect.x, rect.y)),
            egui::vec2(rect.width, rect.height),
        )
    }
}

/// Converts an engine color.
pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn to_screen(origin: Pos2, point: Point) -> Pos2 {
    Pos2::new(origin.x + point.x, origin.y + point.y)
}

impl Surface for EguiSurface {
    fn size(&self) -> (f32, f32) {
        (self.area.width(), self.area.height())
    }

    fn clear(&mut self, color: Color) {
        self.painter.rect_filled(self.area, 0.0, to_color32(color));
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            Stroke::new(width, to_color32(color)),
        );
    }

    fn rect(&mut self, rect: Rect, color: Color, width: Option<f32>) {
        let rect = self.to_egui_rect(rect);
        match width {
            None => self.painter.rect_filled(rect, 0.0, to_color32(color)),
            Some(width) => self.painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(width, to_color32(color)),
                StrokeKind::Inside,
            ),
        };
    }

    fn circle(&mut self, center: Point, radius: f32, color: Color, width: Option<f32>) {
        let center = self.pos(center);
        match width {
            None => self.painter.circle_filled(center, radius, to_color32(color)),
            Some(width) => {
                self.painter
                    .circle_stroke(center, radius, Stroke::new(width, to_color32(color)))
            }
        };
    }

    fn polyline(&mut self, points: &[Point], color: Color, width: f32) {
        if points.len() < 2 {
            return;
        }
        let points: Vec<Pos2> = points.iter().map(|point| self.pos(*point)).collect();
        self.painter
            .add(Shape::line(points, Stroke::new(width, to_color32(color))));
    }

    fn text(&mut self, pos: Point, text: &str, color: Color, size: f32) {
        self.painter.text(
            self.pos(pos),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(size),
            to_color32(color),
        );
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.area = egui::Rect::from_min_size(self.area.min, egui::vec2(width, height));
    }
}
