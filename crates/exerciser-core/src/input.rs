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

//! Backend-agnostic input events.
//!
//! Windowing backends translate their native events into [`InputEvent`] so the
//! engine and simulations never depend on a specific toolkit.

/// An engine-internal representation of a user input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key went down. Key repeats are never reported.
    KeyPressed {
        /// The key name, e.g. `"R"`, `"Space"`, `"F1"`.
        key_code: String,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// The key name.
        key_code: String,
    },
    /// A mouse button was pressed.
    MouseButtonPressed {
        /// The mouse button that was pressed.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseButtonReleased {
        /// The mouse button that was released.
        button: MouseButton,
    },
    /// The mouse cursor moved.
    MouseMoved {
        /// The new x-coordinate of the cursor.
        x: f32,
        /// The new y-coordinate of the cursor.
        y: f32,
    },
    /// The mouse wheel was scrolled.
    MouseWheelScrolled {
        /// The horizontal scroll delta.
        delta_x: f32,
        /// The vertical scroll delta.
        delta_y: f32,
    },
    /// The drawable area changed size.
    Resized {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// The user asked to close the window.
    CloseRequested,
}

impl InputEvent {
    /// Convenience constructor for a key-down event.
    pub fn key(key_code: impl Into<String>) -> Self {
        InputEvent::KeyPressed {
            key_code: key_code.into(),
        }
    }

    /// Returns `true` if this is a key-down event for `key_code`.
    pub fn is_key_pressed(&self, key_code: &str) -> bool {
        matches!(self, InputEvent::KeyPressed { key_code: k } if k == key_code)
    }
}

/// An engine-internal representation of a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
}
