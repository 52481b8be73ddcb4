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

//! Error taxonomy for faults raised by student code.
//!
//! * [`ValidationError`]: the student's code ran, but what it returned breaks a
//!   documented contract (wrong shape, wrong arity).
//! * [`RunError`]: the student's code itself failed. The original cause is kept
//!   for diagnostics.
//! * [`ReloadError`]: re-executing the solution source failed.
//!
//! Faults in the harness itself have no type here: they panic and are not caught.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The student's output violates a documented contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The student's code failed while running.
pub struct RunError {
    message: String,
    cause_kind: &'static str,
    cause: Option<anyhow::Error>,
    backtrace: Backtrace,
}

impl RunError {
    /// Creates a run error without a known cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause_kind: "",
            cause: None,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a run error caused by a typed error value.
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause_kind: short_type_name::<E>(),
            cause: Some(anyhow::Error::new(cause)),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a run error caused by an `anyhow` error returned from student code.
    pub fn from_anyhow(message: impl Into<String>, cause: anyhow::Error) -> Self {
        Self {
            message: message.into(),
            cause_kind: "Error",
            cause: Some(cause),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a run error from the payload of a caught panic.
    pub fn from_panic(message: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
        Self {
            message: message.into(),
            cause_kind: "panic",
            cause: Some(anyhow::Error::msg(panic_message(payload))),
            backtrace: Backtrace::capture(),
        }
    }

    /// The harness-level description of what was being run.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// A short name for the kind of cause (`"panic"`, an error type name, ...).
    pub fn cause_kind(&self) -> &str {
        self.cause_kind
    }

    /// The original failure, if known.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    /// The backtrace captured where the failure was classified, if enabled.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self.backtrace.status() {
            BacktraceStatus::Captured => Some(&self.backtrace),
            _ => None,
        }
    }

    /// One-line text shown in the on-screen banner.
    pub fn banner_text(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}: {}: {}", self.message, self.cause_kind, cause),
            None => format!("{}: <unknown cause>", self.message),
        }
    }
}

impl fmt::Debug for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunError")
            .field("message", &self.message)
            .field("cause_kind", &self.cause_kind)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + 'static) = self.cause.as_ref()?.as_ref();
        Some(cause)
    }
}

/// Re-executing the solution source failed.
#[derive(Debug, Error)]
#[error("Error reloading solution: {source:#}")]
pub struct ReloadError {
    /// The source that failed, when it is backed by a file.
    pub path: Option<PathBuf>,
    /// The underlying failure.
    #[source]
    pub source: anyhow::Error,
}

/// A fault raised by a simulation tick.
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// The tick completed but produced an invalid result.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The tick failed while running student code.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload".to_string()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[derive(Debug, Error)]
    #[error("division by zero")]
    struct DivisionByZero;

    #[test]
    fn validation_error_displays_its_message() {
        let err = ValidationError::new("Control method did not return a number");
        assert_eq!(format!("{err}"), "Control method did not return a number");
    }

    #[test]
    fn run_error_keeps_typed_cause() {
        let err = RunError::with_cause("Error running control method", DivisionByZero);
        assert_eq!(err.cause_kind(), "DivisionByZero");
        assert_eq!(
            err.banner_text(),
            "Error running control method: DivisionByZero: division by zero"
        );
        let source = err.source().expect("cause should be exposed as source");
        assert_eq!(source.to_string(), "division by zero");
    }

    #[test]
    fn run_error_without_cause_says_unknown() {
        let err = RunError::new("Error running control method");
        assert!(err.cause().is_none());
        assert_eq!(
            err.banner_text(),
            "Error running control method: <unknown cause>"
        );
    }

    #[test]
    fn run_error_from_panic_payload() {
        let payload: Box<dyn Any + Send> = Box::new("index out of bounds");
        let err = RunError::from_panic("Error running control method", payload);
        assert_eq!(err.cause_kind(), "panic");
        assert_eq!(
            err.banner_text(),
            "Error running control method: panic: index out of bounds"
        );
    }

    #[test]
    fn panic_message_handles_owned_and_opaque_payloads() {
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u32)), "panic payload");
    }

    #[test]
    fn exercise_error_is_transparent() {
        let err: ExerciseError = ValidationError::new("bad arity").into();
        assert_eq!(err.to_string(), "bad arity");
    }

    #[test]
    fn reload_error_display_includes_cause_chain() {
        let err = ReloadError {
            path: None,
            source: anyhow::anyhow!("expected `=`").context("solution.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Error reloading solution: solution.toml: expected `=`"
        );
    }
}
