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

//! Fault isolation around student code.
//!
//! Everything the student wrote runs through this module. Failures are
//! classified into [`ValidationError`] or [`RunError`] and returned as values;
//! nothing raised by student code unwinds into the run loop. Partial state
//! changes made before a failure are kept as they are.

use std::panic::{self, AssertUnwindSafe};

use exerciser_core::{
    ControlOutput, Controller, ExerciseError, RunError, Simulation, ValidationError,
};

/// Message attached to failures raised by a control function.
pub const CONTROL_FAILED: &str = "Error running control method";

/// Message attached to panics raised by a simulation tick.
pub const TICK_PANICKED: &str = "Error running simulation";

/// Message attached to panics raised while building a simulation.
pub const CONSTRUCT_PANICKED: &str = "Error creating simulation";

/// The classified result of one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The tick completed normally.
    Success,
    /// The tick completed but the student's output broke a contract.
    Invalid(ValidationError),
    /// The student's code failed while running.
    Failed(RunError),
}

impl TickOutcome {
    /// Returns `true` for [`TickOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, TickOutcome::Success)
    }
}

/// Ticks `simulation` once, catching any error or panic it raises.
pub fn run_tick(simulation: &mut dyn Simulation, delta: f64) -> TickOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| simulation.tick(delta))) {
        Ok(Ok(())) => TickOutcome::Success,
        Ok(Err(ExerciseError::Validation(err))) => TickOutcome::Invalid(err),
        Ok(Err(ExerciseError::Run(err))) => TickOutcome::Failed(err),
        Err(payload) => TickOutcome::Failed(RunError::from_panic(TICK_PANICKED, payload)),
    }
}

/// Builds a simulation from a student factory.
pub fn construct(
    factory: &dyn Fn() -> Box<dyn Simulation>,
) -> Result<Box<dyn Simulation>, RunError> {
    panic::catch_unwind(AssertUnwindSafe(factory))
        .map_err(|payload| RunError::from_panic(CONSTRUCT_PANICKED, payload))
}

/// Runs one of the simulation's optional hooks, turning a panic into a [`RunError`].
pub fn run_hook(message: &str, hook: impl FnOnce()) -> Result<(), RunError> {
    panic::catch_unwind(AssertUnwindSafe(hook))
        .map_err(|payload| RunError::from_panic(message, payload))
}

/// Calls a student control function with its own copy of `state`.
///
/// An `Err` returned by the controller or a panic inside it becomes a
/// [`RunError`] that keeps the original failure as its cause. The returned
/// value is not validated here; see [`ControlOutput::expect_scalar`].
pub fn call_control<S, C>(
    controller: &mut C,
    delta: f64,
    state: &S,
) -> Result<ControlOutput, RunError>
where
    S: Clone,
    C: Controller<S> + ?Sized,
{
    let state = state.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| controller.control(delta, state))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(RunError::from_anyhow(CONTROL_FAILED, err)),
        Err(payload) => Err(RunError::from_panic(CONTROL_FAILED, payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exerciser_core::Surface;

    struct Scripted {
        result: fn() -> Result<(), ExerciseError>,
        ticks: u32,
    }

    impl Simulation for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn tick(&mut self, _delta: f64) -> Result<(), ExerciseError> {
            self.ticks += 1;
            (self.result)()
        }

        fn draw(&self, _surface: &mut dyn Surface) {}
    }

    fn scripted(result: fn() -> Result<(), ExerciseError>) -> Scripted {
        Scripted { result, ticks: 0 }
    }

    #[test]
    fn successful_tick_is_success() {
        let mut sim = scripted(|| Ok(()));
        assert!(run_tick(&mut sim, 1.0 / 60.0).is_success());
        assert_eq!(sim.ticks, 1);
    }

    #[test]
    fn validation_error_is_never_a_run_error() {
        let mut sim = scripted(|| Err(ValidationError::new("wrong arity").into()));
        match run_tick(&mut sim, 1.0 / 60.0) {
            TickOutcome::Invalid(err) => assert_eq!(err.message(), "wrong arity"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn panic_in_tick_becomes_run_error_with_cause() {
        let mut sim = scripted(|| panic!("attempt to divide by zero"));
        match run_tick(&mut sim, 1.0 / 60.0) {
            TickOutcome::Failed(err) => {
                assert_eq!(err.message(), TICK_PANICKED);
                assert_eq!(err.cause_kind(), "panic");
                assert_eq!(
                    err.cause().map(ToString::to_string).as_deref(),
                    Some("attempt to divide by zero")
                );
            }
            other => panic!("expected a run error, got {other:?}"),
        }
        // The mutation made before the panic is kept.
        assert_eq!(sim.ticks, 1);
    }

    #[test]
    fn panicking_factory_is_a_run_error() {
        let factory = || -> Box<dyn Simulation> { panic!("constructor failed") };
        let err = construct(&factory).err().expect("construction should fail");
        assert_eq!(
            err.banner_text(),
            "Error creating simulation: panic: constructor failed"
        );
        assert!(construct(&|| -> Box<dyn Simulation> { Box::new(scripted(|| Ok(()))) }).is_ok());
    }

    #[test]
    fn hook_panics_are_caught() {
        assert!(run_hook("Error handling input", || {}).is_ok());
        let err = run_hook("Error handling input", || panic!("bad key")).unwrap_err();
        assert_eq!(err.message(), "Error handling input");
    }

    #[test]
    fn controller_error_is_wrapped() {
        let mut failing =
            |_delta: f64, _x: f64| -> anyhow::Result<f64> { anyhow::bail!("gain not set") };
        let err = call_control(&mut failing, 0.1, &1.0).unwrap_err();
        assert_eq!(err.message(), CONTROL_FAILED);
        assert_eq!(err.banner_text(), "Error running control method: Error: gain not set");
    }

    #[test]
    fn controller_panic_is_wrapped() {
        let mut failing = |_delta: f64, values: Vec<f64>| -> anyhow::Result<f64> { Ok(values[3]) };
        let err = call_control(&mut failing, 0.1, &vec![1.0]).unwrap_err();
        assert_eq!(err.cause_kind(), "panic");
    }

    #[test]
    fn controller_receives_a_copy() {
        let state = vec![1.0, 2.0];
        let mut mutating = |_delta: f64, mut values: Vec<f64>| -> anyhow::Result<f64> {
            values[0] = 99.0;
            Ok(values[0])
        };
        let output = call_control(&mut mutating, 0.1, &state).unwrap();
        assert_eq!(output, ControlOutput::Scalar(99.0));
        assert_eq!(state, vec![1.0, 2.0]);
    }

    #[test]
    fn non_numeric_output_is_left_to_validation() {
        let mut wrong = |_delta: f64, _x: f64| -> anyhow::Result<&'static str> { Ok("left") };
        let output = call_control(&mut wrong, 0.1, &0.0).unwrap();
        assert!(output.expect_scalar().is_err());
    }
}
