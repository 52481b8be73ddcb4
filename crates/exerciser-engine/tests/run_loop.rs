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

//! Scheduler behaviour observed through a recording surface.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use exerciser_core::{
    show_simulation_value, show_value, Color, Controller, ExerciseError, ForceLimit,
    InputEvent, PointMass, RecordingSurface, Simulation, Surface, ValidationError,
};
use exerciser_engine::{
    call_control, Engine, EngineConfig, FaultState, FnSource, LoopState, Pacing, Scope,
};

const DELTA: f64 = 1.0 / 60.0;

/// A 1-D block pushed by a student controller.
struct Block {
    body: PointMass<1>,
    force: f64,
    controller: Box<dyn Controller<f64>>,
    state: Rc<RefCell<PointMass<1>>>,
}

impl Block {
    fn new(
        controller: impl Controller<f64> + 'static,
        state: Rc<RefCell<PointMass<1>>>,
    ) -> Self {
        Self {
            body: PointMass::at_rest([100.0]),
            force: f64::NAN,
            controller: Box::new(controller),
            state,
        }
    }
}

impl Simulation for Block {
    fn name(&self) -> &str {
        "block"
    }

    fn tick(&mut self, delta: f64) -> Result<(), ExerciseError> {
        let output = call_control(self.controller.as_mut(), delta, &self.body.position[0])?;
        self.force = ForceLimit::default().clamp(output.expect_scalar()?);
        self.body.integrate([self.force], delta);
        show_value("F", self.force);
        *self.state.borrow_mut() = self.body;
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) {
        show_simulation_value("x", self.body.position[0], Color::BLACK);
        show_simulation_value("vx", self.body.velocity[0], Color::BLACK);
        surface.text((0.0, 0.0).into(), "block", Color::RED, 12.0);
    }
}

fn engine_with<C>(make: impl Fn() -> C + 'static) -> (Engine, Rc<RefCell<PointMass<1>>>)
where
    C: Controller<f64> + 'static,
{
    engine_paced(Pacing::Unpaced, make)
}

fn engine_paced<C>(
    pacing: Pacing,
    make: impl Fn() -> C + 'static,
) -> (Engine, Rc<RefCell<PointMass<1>>>)
where
    C: Controller<f64> + 'static,
{
    let state = Rc::new(RefCell::new(PointMass::at_rest([100.0])));
    let shared = state.clone();
    let make = Rc::new(make);
    let source = FnSource::new("solution.rs", move |scope: &mut Scope<'_>| -> anyhow::Result<()> {
        let shared = shared.clone();
        let make = make.clone();
        scope.run(move || Box::new(Block::new(make(), shared.clone())));
        Ok(())
    });
    let config = EngineConfig {
        pacing,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Box::new(source)).expect("valid config");
    engine.start(Instant::now());
    (engine, state)
}

type BoxedControl = Box<dyn FnMut(f64, f64) -> anyhow::Result<f64>>;

fn constant(force: f64) -> impl Fn() -> BoxedControl {
    move || -> BoxedControl {
        Box::new(move |_delta: f64, _x: f64| -> anyhow::Result<f64> { Ok(force) })
    }
}

fn run_steps(
    engine: &mut Engine,
    surface: &mut RecordingSurface,
    steps: u32,
    start: Instant,
    jitter: &[u64],
) {
    let mut now = start;
    for i in 0..steps {
        engine.step(&[], surface, now);
        now += Duration::from_millis(jitter[i as usize % jitter.len()]);
    }
}

#[test]
fn constant_force_for_one_simulated_second() {
    let (mut engine, state) = engine_with(constant(-150.0));
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 60, Instant::now(), &[16]);

    let body = *state.borrow();
    assert_relative_eq!(body.velocity[0], -150.0, epsilon = 1e-9);
    assert_relative_eq!(
        body.position[0],
        100.0 - 150.0 * DELTA * DELTA * 1830.0,
        epsilon = 1e-9
    );
    assert_eq!(engine.tick_count(), 60);
}

#[test]
fn wall_clock_jitter_does_not_change_the_outcome() {
    let (mut steady, steady_state) = engine_with(constant(42.0));
    let (mut jittery, jittery_state) = engine_with(constant(42.0));
    let mut surface = RecordingSurface::new(800.0, 600.0);

    run_steps(&mut steady, &mut surface, 120, Instant::now(), &[16]);
    run_steps(&mut jittery, &mut surface, 120, Instant::now(), &[3, 40, 1, 90, 17]);

    assert_eq!(*steady_state.borrow(), *jittery_state.borrow());
}

#[test]
fn clamped_force_matches_the_limit() {
    let (mut clamped, clamped_state) = engine_with(constant(5000.0));
    let (mut limit, limit_state) = engine_with(constant(1000.0));
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut clamped, &mut surface, 30, Instant::now(), &[16]);
    run_steps(&mut limit, &mut surface, 30, Instant::now(), &[16]);
    assert_eq!(*clamped_state.borrow(), *limit_state.borrow());
}

#[test]
fn nan_force_keeps_velocity_and_is_displayed() {
    let (mut engine, state) =
        engine_with(|| |_delta: f64, _x: f64| -> anyhow::Result<f64> { Ok(f64::NAN) });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 3, Instant::now(), &[16]);

    assert_eq!(state.borrow().velocity[0], 0.0);
    assert_eq!(engine.fault_state(), FaultState::Valid);
    assert!(surface.contains_text("F = NaN"));
    assert!(surface.contains_text("x = 100.00"));
}

#[test]
fn non_numeric_control_output_is_a_validation_error() {
    let (mut engine, _state) =
        engine_with(|| |_delta: f64, _x: f64| -> anyhow::Result<&'static str> { Ok("push left") });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 2, Instant::now(), &[16]);

    assert_eq!(engine.fault_state(), FaultState::ValidationFailed);
    let banner = engine.banner().expect("fault banner");
    assert!(
        banner.text.starts_with("Invalid solution: Control method did not return a number"),
        "unexpected banner: {}",
        banner.text
    );
}

#[test]
fn failing_controller_is_a_run_error_with_cause() {
    let (mut engine, _state) = engine_with(|| {
        |_delta: f64, x: f64| -> anyhow::Result<f64> {
            anyhow::ensure!(x < 0.0, "x must be negative, got {x}");
            Ok(0.0)
        }
    });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 1, Instant::now(), &[16]);

    assert_eq!(engine.fault_state(), FaultState::RunFailed);
    assert_eq!(
        engine.banner().map(|banner| banner.text.as_str()),
        Some("Error running control method: Error: x must be negative, got 100")
    );
    assert_eq!(engine.banner().map(|banner| banner.color()), Some(Color::RED));
}

#[test]
fn panicking_controller_is_a_run_error() {
    let (mut engine, _state) = engine_with(|| {
        |_delta: f64, _x: f64| -> anyhow::Result<f64> {
            let gains: Vec<f64> = Vec::new();
            Ok(gains[0])
        }
    });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 1, Instant::now(), &[16]);

    assert_eq!(engine.fault_state(), FaultState::RunFailed);
    let banner = engine.banner().expect("fault banner");
    assert!(banner.text.starts_with("Error running control method: panic: "));
}

#[test]
fn faulted_simulation_is_frozen_but_still_drawn() {
    let calls = Rc::new(RefCell::new(0_u32));
    let counter = calls.clone();
    let (mut engine, state) = engine_with(move || {
        let counter = counter.clone();
        move |_delta: f64, _x: f64| -> anyhow::Result<f64> {
            *counter.borrow_mut() += 1;
            if *counter.borrow() == 10 {
                anyhow::bail!("diverged");
            }
            Ok(-10.0)
        }
    });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 10, Instant::now(), &[16]);
    let frozen = *state.borrow();

    run_steps(&mut engine, &mut surface, 20, Instant::now(), &[16]);
    assert_eq!(*calls.borrow(), 10);
    assert_eq!(*state.borrow(), frozen);
    assert_eq!(surface.frames_presented(), 30);
    assert!(surface.contains_text("block"));
    assert!(surface.contains_text("Error running control method: Error: diverged"));
}

#[test]
fn restart_clears_the_fault_and_the_banner() {
    let (mut engine, _state) =
        engine_with(|| |_delta: f64, _x: f64| -> anyhow::Result<()> { Ok(()) });
    let mut surface = RecordingSurface::new(800.0, 600.0);
    run_steps(&mut engine, &mut surface, 1, Instant::now(), &[16]);
    assert_eq!(engine.fault_state(), FaultState::ValidationFailed);
    let before = engine.generation();

    engine.step(&[InputEvent::key("F5")], &mut surface, Instant::now());
    assert!(engine.generation() > before);
    // The restarted instance fails again on its first tick, in the same iteration.
    assert_eq!(engine.fault_state(), FaultState::ValidationFailed);

    engine.step(&[InputEvent::key("Space")], &mut surface, Instant::now());
    engine.step(&[InputEvent::key("F5")], &mut surface, Instant::now());
    assert_eq!(engine.loop_state(), LoopState::Paused);
    assert_eq!(engine.fault_state(), FaultState::Valid);
    assert!(engine.banner().is_none());
}

#[test]
fn input_is_not_forwarded_to_a_faulted_simulation() {
    struct Listener {
        seen: Rc<RefCell<Vec<InputEvent>>>,
    }

    impl Simulation for Listener {
        fn name(&self) -> &str {
            "listener"
        }

        fn tick(&mut self, _delta: f64) -> Result<(), ExerciseError> {
            Err(ValidationError::new("always wrong").into())
        }

        fn draw(&self, _surface: &mut dyn Surface) {}

        fn handle_input(&mut self, events: &[InputEvent]) {
            self.seen.borrow_mut().extend_from_slice(events);
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let shared = seen.clone();
    let source = FnSource::new("listener", move |scope: &mut Scope<'_>| -> anyhow::Result<()> {
        scope.run_instance(Box::new(Listener {
            seen: shared.clone(),
        }));
        Ok(())
    });
    let mut engine =
        Engine::new(EngineConfig::default(), Box::new(source)).expect("default config");
    engine.start(Instant::now());
    let mut surface = RecordingSurface::new(800.0, 600.0);

    let click = InputEvent::MouseMoved { x: 1.0, y: 2.0 };
    engine.step(&[click.clone()], &mut surface, Instant::now());
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(engine.fault_state(), FaultState::ValidationFailed);

    engine.step(&[click], &mut surface, Instant::now());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn real_time_pacing_ticks_once_per_period_however_often_it_is_stepped() {
    let (mut engine, state) = engine_paced(Pacing::RealTime, constant(-150.0));
    let mut surface = RecordingSurface::new(800.0, 600.0);
    let now = Instant::now();
    let moved = InputEvent::MouseMoved { x: 10.0, y: 10.0 };

    let mut deadline = None;
    for _ in 0..10 {
        let report = engine.step(&[moved.clone()], &mut surface, now);
        deadline = report.next_deadline;
    }
    assert_eq!(engine.tick_count(), 1);
    assert_eq!(engine.iteration(), 1);
    assert_eq!(surface.frames_presented(), 10, "every call still draws");

    let deadline = deadline.expect("real-time pacing reports a deadline");
    assert_eq!(deadline, now + Duration::from_secs_f64(DELTA));
    let report = engine.step(&[], &mut surface, deadline);
    assert!(report.ticked);
    assert_eq!(engine.tick_count(), 2);
    assert_relative_eq!(state.borrow().velocity[0], -300.0 * DELTA, epsilon = 1e-12);
}

#[test]
fn single_step_before_the_deadline_runs_at_the_deadline() {
    let (mut engine, _state) = engine_paced(Pacing::RealTime, constant(0.0));
    let mut surface = RecordingSurface::new(800.0, 600.0);
    let t0 = Instant::now();
    let deadline = engine.step(&[], &mut surface, t0).next_deadline.expect("deadline");

    engine.step(&[InputEvent::key("Space")], &mut surface, t0);
    engine.step(&[InputEvent::key("N")], &mut surface, t0 + Duration::from_millis(1));
    assert_eq!(engine.loop_state(), LoopState::Stepping);
    assert_eq!(engine.tick_count(), 1);

    let report = engine.step(&[], &mut surface, deadline);
    assert!(report.ticked);
    assert_eq!(engine.tick_count(), 2);
    assert_eq!(engine.loop_state(), LoopState::Paused);
}
