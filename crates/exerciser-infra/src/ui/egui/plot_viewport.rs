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

//! One native window per figure.
//!
//! Figure windows are deferred viewports: they repaint on their own events and
//! when [`PlotViewports::sync`] reports that the coordinator redrew their
//! figure, never at the main loop's rate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use egui::{CentralPanel, Context, Frame, ViewportBuilder, ViewportCommand, ViewportId};
use exerciser_core::{Color, Rect, Surface};
use exerciser_engine::{FigureEvent, PlotCoordinator, PlotFrame};

use super::surface::EguiSurface;

const FIGURE_SIZE: [f32; 2] = [640.0, 480.0];

/// State shared between the main loop and one figure's viewport callback.
#[derive(Default)]
struct FigureWindow {
    frame: Mutex<Option<PlotFrame>>,
    close_requested: AtomicBool,
}

impl FigureWindow {
    fn paint(&self, ctx: &Context) {
        CentralPanel::default().frame(Frame::NONE).show(ctx, |ui| {
            let area = ui.max_rect();
            let mut surface = EguiSurface::new(ui.painter().clone(), area);
            surface.clear(Color::WHITE);
            let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(frame) = frame.as_ref() {
                frame.draw_onto(&mut surface, Rect::new(0.0, 0.0, area.width(), area.height()));
            }
        });

        if ctx.input(|input| input.viewport().close_requested()) {
            // The engine quits when a figure is closed, and closes every window itself.
            self.close_requested.store(true, Ordering::SeqCst);
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
    }
}

/// The figure windows of a run, keyed by figure name.
#[derive(Default)]
pub(crate) struct PlotViewports {
    windows: HashMap<String, (ViewportId, Arc<FigureWindow>)>,
}

impl PlotViewports {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hands the frames of new figures and of figures redrawn by the last
    /// plot slice to their windows, and forwards window close requests to the
    /// figures.
    ///
    /// Returns the viewports that need a repaint.
    pub(crate) fn sync(&mut self, plots: &PlotCoordinator, redrawn: &[String]) -> Vec<ViewportId> {
        let mut repaint = Vec::new();
        for figure in plots.figures() {
            let mut figure = figure.borrow_mut();
            let name = figure.name().to_string();
            let is_new = !self.windows.contains_key(&name);
            let (id, window) = self.windows.entry(name.clone()).or_insert_with(|| {
                log::debug!("Opening window for figure '{name}'.");
                (ViewportId::from_hash_of(&name), Arc::default())
            });

            if window.close_requested.swap(false, Ordering::SeqCst) {
                figure.push_event(FigureEvent::CloseRequested);
            }
            if is_new || redrawn.contains(&name) {
                let mut frame = window.frame.lock().unwrap_or_else(PoisonError::into_inner);
                *frame = figure.frame().cloned();
                repaint.push(*id);
            }
        }
        repaint
    }

    /// Keeps every figure window open for this frame.
    pub(crate) fn show(&self, ctx: &Context) {
        for (name, (id, window)) in &self.windows {
            let builder = ViewportBuilder::default()
                .with_title(name.as_str())
                .with_inner_size(FIGURE_SIZE);
            let window = Arc::clone(window);
            ctx.show_viewport_deferred(*id, builder, move |ctx, _class| window.paint(ctx));
        }
    }
}
