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

//! The bare control-function contract.
//!
//! Exercises that only ask the student for a control law call a [`Controller`]
//! once per tick and validate what it returned with
//! [`ControlOutput::expect_scalar`] or [`ControlOutput::expect_vector`].

use std::fmt;

use crate::error::ValidationError;

/// The value a control function returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutput {
    /// A single real number.
    Scalar(f64),
    /// A fixed-size tuple of real numbers.
    Vector(Vec<f64>),
    /// Nothing was returned.
    Empty,
    /// A non-numeric value.
    Text(String),
}

impl ControlOutput {
    /// Returns the scalar, or a [`ValidationError`] for any other shape.
    ///
    /// NaN is accepted; the numeric policy of the exercise decides what it means.
    pub fn expect_scalar(&self) -> Result<f64, ValidationError> {
        match self {
            ControlOutput::Scalar(value) => Ok(*value),
            other => Err(ValidationError::new(format!(
                "Control method did not return a number (returned {other})"
            ))),
        }
    }

    /// Returns exactly `N` components, or a [`ValidationError`].
    pub fn expect_vector<const N: usize>(&self) -> Result<[f64; N], ValidationError> {
        match self {
            ControlOutput::Vector(values) if values.len() == N => {
                let mut out = [0.0; N];
                out.copy_from_slice(values);
                Ok(out)
            }
            ControlOutput::Vector(values) => Err(ValidationError::new(format!(
                "Control method returned {} numbers, expected {N}",
                values.len()
            ))),
            other => Err(ValidationError::new(format!(
                "Control method did not return {N} numbers (returned {other})"
            ))),
        }
    }
}

impl fmt::Display for ControlOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlOutput::Scalar(value) => write!(f, "{value}"),
            ControlOutput::Vector(values) => write!(f, "{values:?}"),
            ControlOutput::Empty => write!(f, "nothing"),
            ControlOutput::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<f64> for ControlOutput {
    fn from(value: f64) -> Self {
        ControlOutput::Scalar(value)
    }
}

impl From<f32> for ControlOutput {
    fn from(value: f32) -> Self {
        ControlOutput::Scalar(value.into())
    }
}

impl From<(f64, f64)> for ControlOutput {
    fn from((a, b): (f64, f64)) -> Self {
        ControlOutput::Vector(vec![a, b])
    }
}

impl<const N: usize> From<[f64; N]> for ControlOutput {
    fn from(values: [f64; N]) -> Self {
        ControlOutput::Vector(values.to_vec())
    }
}

impl From<Vec<f64>> for ControlOutput {
    fn from(values: Vec<f64>) -> Self {
        ControlOutput::Vector(values)
    }
}

impl From<Option<f64>> for ControlOutput {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ControlOutput::Empty, ControlOutput::Scalar)
    }
}

impl From<()> for ControlOutput {
    fn from(_: ()) -> Self {
        ControlOutput::Empty
    }
}

impl From<&str> for ControlOutput {
    fn from(text: &str) -> Self {
        ControlOutput::Text(text.to_string())
    }
}

/// A student-written control law over the exercise state `S`.
///
/// The exercise hands the controller its own copy of the state every tick, so
/// the controller cannot reach into the simulation by reference.
pub trait Controller<S> {
    /// Computes the control value for this tick.
    fn control(&mut self, delta: f64, state: S) -> anyhow::Result<ControlOutput>;
}

impl<S, F, R> Controller<S> for F
where
    F: FnMut(f64, S) -> anyhow::Result<R>,
    R: Into<ControlOutput>,
{
    fn control(&mut self, delta: f64, state: S) -> anyhow::Result<ControlOutput> {
        self(delta, state).map(Into::into)
    }
}
