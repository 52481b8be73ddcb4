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

//! # Exerciser Infra
//!
//! Concrete implementations of the engine's outer collaborators: the native
//! window, the painter-backed [`Surface`](exerciser_core::Surface) and the
//! translation of toolkit input into [`InputEvent`](exerciser_core::InputEvent)s.

#![warn(missing_docs)]

pub mod platform;
pub mod ui;

pub use platform::input::translate_egui_input;
pub use ui::egui::app::{run_native, EguiHost};
pub use ui::egui::surface::EguiSurface;
