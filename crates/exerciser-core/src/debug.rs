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

//! On-screen debug values.
//!
//! Student code calls [`show_value`] from anywhere inside `tick`, and exercise
//! code calls [`show_simulation_value`] from inside `draw`. The engine installs a
//! per-thread capture buffer only for the duration of those calls with
//! [`capture`]; values shown outside an active capture are dropped.

use std::cell::RefCell;
use std::thread::LocalKey;

use crate::surface::Color;

/// Which buffer a value is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugScope {
    /// Values shown while the simulation ticks.
    Tick,
    /// Values shown while the simulation draws.
    Draw,
}

/// A formatted `label = value` line and the color to draw it with.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    /// The formatted text.
    pub text: String,
    /// Text color.
    pub color: Color,
}

thread_local! {
    static TICK_VALUES: RefCell<Option<Vec<DebugLine>>> = const { RefCell::new(None) };
    static DRAW_VALUES: RefCell<Option<Vec<DebugLine>>> = const { RefCell::new(None) };
}

fn slot(scope: DebugScope) -> &'static LocalKey<RefCell<Option<Vec<DebugLine>>>> {
    match scope {
        DebugScope::Tick => &TICK_VALUES,
        DebugScope::Draw => &DRAW_VALUES,
    }
}

/// Formats a value for the debug overlay.
///
/// Floating point values are shown with two decimals. NaN stays visible as `NaN`.
pub trait ShowValue {
    /// Returns the text shown after `label = `.
    fn show(&self) -> String;
}

impl ShowValue for f64 {
    fn show(&self) -> String {
        format!("{self:.2}")
    }
}

impl ShowValue for f32 {
    fn show(&self) -> String {
        format!("{self:.2}")
    }
}

macro_rules! show_with_display {
    ($($ty:ty),*) => {
        $(impl ShowValue for $ty {
            fn show(&self) -> String {
                self.to_string()
            }
        })*
    };
}

show_with_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool, char, String, &str);

/// Shows a student-supplied value on screen for this tick.
pub fn show_value(label: &str, value: impl ShowValue) {
    push(DebugScope::Tick, label, &value, Color::BLACK);
}

/// Shows an exercise-specific value on screen for this frame.
pub fn show_simulation_value(label: &str, value: impl ShowValue, color: Color) {
    push(DebugScope::Draw, label, &value, color);
}

fn push(scope: DebugScope, label: &str, value: &dyn ShowValue, color: Color) {
    slot(scope).with(|cell| {
        if let Some(values) = cell.borrow_mut().as_mut() {
            values.push(DebugLine {
                text: format!("{label} = {}", value.show()),
                color,
            });
        }
    });
}

/// Runs `f` with `buffer` installed as the active capture for `scope`.
///
/// Values shown during `f` are appended to `buffer`. The previously active
/// capture, if any, is restored afterwards, including when `f` unwinds.
pub fn capture<R>(scope: DebugScope, buffer: &mut Vec<DebugLine>, f: impl FnOnce() -> R) -> R {
    struct Restore<'a> {
        scope: DebugScope,
        buffer: &'a mut Vec<DebugLine>,
        previous: Option<Vec<DebugLine>>,
    }

    impl Drop for Restore<'_> {
        fn drop(&mut self) {
            let previous = self.previous.take();
            let captured = slot(self.scope).with(|cell| cell.replace(previous));
            *self.buffer = captured.unwrap_or_default();
        }
    }

    let installed = std::mem::take(buffer);
    let previous = slot(scope).with(|cell| cell.replace(Some(installed)));
    let _restore = Restore {
        scope,
        buffer,
        previous,
    };
    f()
}
