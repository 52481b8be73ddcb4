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

//! Provides translation from the `egui` windowing backend to the engine's abstract input events.
//!
//! This module acts as an adapter layer, decoupling the engine and the
//! simulations from the specific input event format of the `egui` crate.

use egui::{Event, Key, PointerButton};
use exerciser_core::{InputEvent, MouseButton};

/// Translates an `egui::Event` into the engine's `InputEvent` format.
///
/// Key repeats are dropped so that every binding stays edge-triggered. Events
/// that are not direct user input actions (text, clipboard, focus) are ignored.
///
/// # Returns
///
/// Returns `Some(InputEvent)` if the event is a recognized input action, or `None` otherwise.
pub fn translate_egui_input(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key {
            key,
            pressed,
            repeat,
            ..
        } => {
            let key_code = map_key_to_string(*key);
            match (*pressed, *repeat) {
                (true, false) => Some(InputEvent::KeyPressed { key_code }),
                (false, _) => Some(InputEvent::KeyReleased { key_code }),
                (true, true) => None,
            }
        }
        Event::PointerMoved(position) => Some(InputEvent::MouseMoved {
            x: position.x,
            y: position.y,
        }),
        Event::PointerButton {
            button, pressed, ..
        } => {
            let button = map_pointer_button(*button);
            if *pressed {
                Some(InputEvent::MouseButtonPressed { button })
            } else {
                Some(InputEvent::MouseButtonReleased { button })
            }
        }
        Event::MouseWheel { delta, .. } => {
            if delta.x != 0.0 || delta.y != 0.0 {
                Some(InputEvent::MouseWheelScrolled {
                    delta_x: delta.x,
                    delta_y: delta.y,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

// --- Private Helper Functions ---

/// (Internal) Maps an `egui::Key` to the key name used by the bindings.
fn map_key_to_string(key: Key) -> String {
    format!("{key:?}")
}

/// (Internal) Maps an `egui::PointerButton` to the engine's `MouseButton` enum.
fn map_pointer_button(button: PointerButton) -> MouseButton {
    match button {
        PointerButton::Primary => MouseButton::Left,
        PointerButton::Secondary => MouseButton::Right,
        PointerButton::Middle => MouseButton::Middle,
        PointerButton::Extra1 => MouseButton::Back,
        PointerButton::Extra2 => MouseButton::Forward,
    }
}
