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

//! The secondary plotting path.
//!
//! Figures are redrawn far less often than the main surface and only inside
//! the bounded time slice the engine hands to the [`PlotCoordinator`] at the
//! end of every iteration. Hosts display the cached [`PlotFrame`] of each
//! figure in a separate window and feed window events back as [`FigureEvent`]s.

mod coordinator;
mod figure;
mod line_plot;

pub use coordinator::{PlotCoordinator, SliceReport};
pub use figure::{Figure, FigureEvent, FigureStatus, PlotFrame, PlotSegment, SharedFigure};
pub use line_plot::{LinePlot, PlotHandle, XAxis};
