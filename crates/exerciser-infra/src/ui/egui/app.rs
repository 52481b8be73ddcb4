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

//! The native window host.
//!
//! eframe owns the event loop and repaints on every window event. Each
//! `update` steps the engine, which only ticks once its deadline is reached,
//! and schedules the next repaint at that deadline.

use std::time::Instant;

use egui::{CentralPanel, Context, Frame, Vec2, ViewportBuilder, ViewportCommand};
use exerciser_core::InputEvent;
use exerciser_engine::{Engine, StepStatus};

use super::plot_viewport::PlotViewports;
use super::surface::EguiSurface;
use crate::platform::input::translate_egui_input;

/// Drives an [`Engine`] from eframe's update callback.
pub struct EguiHost {
    engine: Engine,
    title: String,
    last_size: Option<Vec2>,
    terminated: bool,
    figures: PlotViewports,
}

impl EguiHost {
    /// Wraps a started engine.
    pub fn new(engine: Engine) -> Self {
        let title = engine.title();
        Self {
            engine,
            title,
            last_size: None,
            terminated: false,
            figures: PlotViewports::new(),
        }
    }

    fn collect_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut input: Vec<InputEvent> =
            ctx.input(|i| i.events.iter().filter_map(translate_egui_input).collect());

        if ctx.input(|i| i.viewport().close_requested()) {
            // The engine quits cooperatively; the window closes once it has terminated.
            input.push(InputEvent::CloseRequested);
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
        input
    }
}

impl eframe::App for EguiHost {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.terminated {
            return;
        }

        let mut input = self.collect_input(ctx);
        let now = Instant::now();
        let engine = &mut self.engine;
        let last_size = &mut self.last_size;

        let report = CentralPanel::default()
            .frame(Frame::NONE)
            .show(ctx, |ui| {
                let area = ui.max_rect();
                if last_size.is_some_and(|size| size != area.size()) {
                    input.push(InputEvent::Resized {
                        width: area.width(),
                        height: area.height(),
                    });
                }
                *last_size = Some(area.size());

                let mut surface = EguiSurface::new(ui.painter().clone(), area);
                engine.step(&input, &mut surface, now)
            })
            .inner;

        let stale = self
            .figures
            .sync(self.engine.plots(), self.engine.redrawn_figures());
        self.figures.show(ctx);
        for viewport in stale {
            ctx.request_repaint_of(viewport);
        }

        let title = self.engine.title();
        if title != self.title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        match (report.status, report.next_deadline) {
            (StepStatus::Terminated, _) => {
                log::info!("Closing window.");
                self.terminated = true;
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
            (StepStatus::Continue, Some(deadline)) => {
                ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
            }
            (StepStatus::Continue, None) => ctx.request_repaint(),
        }
    }
}

/// Opens the main window and runs `engine` until it terminates.
///
/// The engine must already be started, so that the caption and the window
/// size come from the registered simulation.
pub fn run_native(engine: Engine) -> anyhow::Result<()> {
    let (width, height) = engine.initial_window_size();
    let title = engine.title();
    log::info!("Opening '{title}' at {width}x{height}.");

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title(title.as_str())
            .with_inner_size([width as f32, height as f32])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(EguiHost::new(engine)))),
    )
    .map_err(|e| anyhow::anyhow!("Native window failed: {e}"))
}
