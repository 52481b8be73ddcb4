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

//! The fixed-timestep run loop.
//!
//! [`Engine::step`] runs exactly one iteration. The host decides how
//! iterations are driven (an eframe repaint callback, the headless driver, a
//! test) and waits until [`StepReport::next_deadline`] between them.
//!
//! One iteration, in order:
//! 1. queued [`EngineCommand`]s are applied and a pending quit terminates the run;
//! 2. input goes to the global key bindings, then to the simulation if it has not faulted;
//! 3. restart and reload requests (including a changed solution file) are served;
//! 4. a newly installed simulation gets `post_init` and a clean slate;
//! 5. the simulation ticks once with the fixed delta, unless paused or faulted;
//! 6. the surface is cleared, the simulation draws, the overlay is added, the frame is presented;
//! 7. the plot coordinator gets its time slice.
//!
//! Steps 5 and 7 are skipped while the real-time tick deadline has not been reached.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use exerciser_core::error::panic_message;
use exerciser_core::{
    debug, Color, DebugLine, DebugScope, EventBus, InputEvent, ReloadError, RunError, Simulation,
    SimulationFactory, Surface,
};

use crate::banner::Banner;
use crate::config::{ConfigError, EngineConfig, Pacing};
use crate::fps::FpsCounter;
use crate::guard::{self, TickOutcome};
use crate::overlay::{draw_overlay, Overlay};
use crate::plot::PlotCoordinator;
use crate::proxy::ErrorProxy;
use crate::source::{Registration, Scope, SolutionSource};
use crate::watcher::FileWatcher;

/// Identifies one installed simulation instance.
///
/// Every install gets a strictly greater generation, which is how the engine
/// notices that the active simulation was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking every iteration.
    Running,
    /// Drawing only.
    Paused,
    /// Paused, with exactly one tick to run this iteration.
    Stepping,
    /// The run is over. Irreversible.
    Terminated,
}

/// Whether the active simulation may still tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultState {
    /// No fault so far.
    Valid,
    /// A tick produced output that broke a contract.
    ValidationFailed,
    /// Student code failed while running.
    RunFailed,
}

/// Requests that may be sent to a running engine from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    /// End the run at the top of the next iteration.
    Quit,
    /// Rebuild the simulation.
    Restart,
    /// Re-execute the solution source.
    Reload,
}

/// A cloneable, thread-safe sender of [`EngineCommand`]s.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: flume::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Sends `command`. A command sent after the engine is gone is dropped.
    pub fn send(&self, command: EngineCommand) {
        if self.sender.send(command).is_err() {
            log::debug!("Engine is gone, dropping {command:?}.");
        }
    }

    /// Asks the engine to quit.
    pub fn quit(&self) {
        self.send(EngineCommand::Quit);
    }

    /// Asks the engine to restart the simulation.
    pub fn restart(&self) {
        self.send(EngineCommand::Restart);
    }

    /// Asks the engine to reload the solution.
    pub fn reload(&self) {
        self.send(EngineCommand::Reload);
    }
}

/// Whether the host should keep driving the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Call [`Engine::step`] again.
    Continue,
    /// The run is over.
    Terminated,
}

/// The result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Whether to keep going.
    pub status: StepStatus,
    /// When the next iteration should start. `None` means immediately.
    pub next_deadline: Option<Instant>,
    /// Whether the simulation ticked during this iteration.
    pub ticked: bool,
}

impl StepReport {
    fn terminated() -> Self {
        Self {
            status: StepStatus::Terminated,
            next_deadline: None,
            ticked: false,
        }
    }
}

struct Active {
    simulation: Box<dyn Simulation>,
    generation: Generation,
}

/// The run-loop engine. One per run, driven from a single thread.
pub struct Engine {
    config: EngineConfig,
    source: Box<dyn SolutionSource>,
    watcher: Option<FileWatcher>,
    commands: EventBus<EngineCommand>,
    plots: PlotCoordinator,

    active: Option<Active>,
    factory: Option<SimulationFactory>,
    generation: Generation,
    last_seen: Option<Generation>,
    fault: FaultState,
    banner: Option<Banner>,

    loop_state: LoopState,
    pending_quit: bool,
    restart_requested: bool,
    reload_requested: bool,
    show_help: bool,
    show_fps: bool,
    fps: FpsCounter,

    tick_values: Vec<DebugLine>,
    draw_values: Vec<DebugLine>,
    iteration: u64,
    tick_count: u64,
    next_tick: Option<Instant>,
    last_redrawn: Vec<String>,
}

impl Engine {
    /// Creates an engine for `source`. Nothing runs until [`start`](Engine::start).
    ///
    /// Fails if `config` does not pass [`EngineConfig::validate`].
    pub fn new(
        config: EngineConfig,
        source: Box<dyn SolutionSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let watcher = source
            .watch_path()
            .map(|path| FileWatcher::new(path, config.reload_poll_interval()));
        let plots = PlotCoordinator::new(config.plot_redraw_every);
        Ok(Self {
            config,
            source,
            watcher,
            commands: EventBus::new(),
            plots,
            active: None,
            factory: None,
            generation: Generation::default(),
            last_seen: None,
            fault: FaultState::Valid,
            banner: None,
            loop_state: LoopState::Running,
            pending_quit: false,
            restart_requested: false,
            reload_requested: false,
            show_help: false,
            show_fps: false,
            fps: FpsCounter::new(),
            tick_values: Vec::new(),
            draw_values: Vec::new(),
            iteration: 0,
            tick_count: 0,
            next_tick: None,
            last_redrawn: Vec::new(),
        })
    }

    /// Executes the solution source for the first time.
    ///
    /// A failing solution does not stop the run: the failure is shown on screen
    /// and the student can fix the file and reload.
    pub fn start(&mut self, now: Instant) {
        log::info!("Starting '{}'.", self.source.describe());
        self.execute_source(now, false);
    }

    /// Returns a handle that can send commands to this engine from any thread.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            sender: self.commands.sender(),
        }
    }

    /// Runs one iteration of the loop.
    ///
    /// With real-time pacing, calls made before the previous deadline still
    /// handle input and draw a frame, but do not tick, sample the FPS counter
    /// or yield to the plots. Hosts that repaint on every window event can
    /// therefore call this as often as they like.
    pub fn step(
        &mut self,
        input: &[InputEvent],
        surface: &mut dyn Surface,
        now: Instant,
    ) -> StepReport {
        if self.loop_state == LoopState::Terminated {
            return StepReport::terminated();
        }

        for command in self.commands.drain() {
            match command {
                EngineCommand::Quit => self.pending_quit = true,
                EngineCommand::Restart => self.restart_requested = true,
                EngineCommand::Reload => self.reload_requested = true,
            }
        }
        if self.pending_quit {
            self.terminate();
            return StepReport::terminated();
        }

        // Input, reloads and drawing are served on every call; ticks, the FPS
        // sample and the plot slice only once the tick deadline is reached.
        let due = self.is_due(now);
        if due {
            self.fps.record(now);
        }
        self.handle_input(input, surface);

        if std::mem::take(&mut self.restart_requested) {
            self.restart(now);
        }
        let file_changed = self.watcher.as_mut().is_some_and(|watcher| watcher.poll(now));
        if std::mem::take(&mut self.reload_requested) || file_changed {
            self.reload(now);
        }

        self.observe_identity();
        let ticked = due && self.tick();
        self.render(surface, now);

        self.last_redrawn.clear();
        if due {
            let slice = self.plots.yield_slice(self.config.plot_budget(), self.iteration);
            if slice.quit_requested {
                self.pending_quit = true;
            }
            self.last_redrawn = slice.redrawn;
            self.iteration += 1;
            if self.config.pacing == Pacing::RealTime {
                self.next_tick = Some(now + self.config.tick_period());
            }
        }

        StepReport {
            status: StepStatus::Continue,
            next_deadline: match self.config.pacing {
                Pacing::RealTime => self.next_tick,
                Pacing::Unpaced => None,
            },
            ticked,
        }
    }

    /// Whether the tick deadline has been reached at `now`.
    fn is_due(&self, now: Instant) -> bool {
        match (self.config.pacing, self.next_tick) {
            (Pacing::RealTime, Some(deadline)) => now >= deadline,
            _ => true,
        }
    }

    fn handle_input(&mut self, input: &[InputEvent], surface: &mut dyn Surface) {
        for event in input {
            match event {
                InputEvent::KeyPressed { key_code } => self.handle_key(key_code),
                InputEvent::Resized { width, height } => surface.resize(*width, *height),
                InputEvent::CloseRequested => {
                    log::info!("Window close requested.");
                    self.pending_quit = true;
                }
                _ => {}
            }
        }

        if input.is_empty() || self.fault != FaultState::Valid {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            let simulation = &mut active.simulation;
            let result = guard::run_hook("Error handling input", || {
                simulation.handle_input(input);
            });
            if let Err(err) = result {
                self.record_run_error(err);
            }
        }
    }

    fn handle_key(&mut self, key: &str) {
        let keys = &self.config.keys;
        if key == keys.quit {
            log::info!("Quit requested.");
            self.pending_quit = true;
        } else if key == keys.pause {
            self.loop_state = match self.loop_state {
                LoopState::Running => LoopState::Paused,
                LoopState::Paused | LoopState::Stepping => LoopState::Running,
                LoopState::Terminated => LoopState::Terminated,
            };
            log::debug!("Loop state is now {:?}.", self.loop_state);
        } else if key == keys.step {
            if matches!(self.loop_state, LoopState::Running | LoopState::Paused) {
                self.loop_state = LoopState::Stepping;
            }
        } else if key == keys.restart {
            self.restart_requested = true;
        } else if key == keys.reload {
            self.reload_requested = true;
        } else if key == keys.help {
            self.show_help = !self.show_help;
        } else if key == keys.fps {
            self.show_fps = !self.show_fps;
        }
    }

    /// Resets per-instance state the first time a new simulation is seen.
    fn observe_identity(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if self.last_seen == Some(active.generation) {
            return;
        }
        let generation = active.generation;
        self.last_seen = Some(generation);
        self.fault = FaultState::Valid;
        if self
            .banner
            .as_ref()
            .is_some_and(|banner| banner.generation < generation)
        {
            self.banner = None;
        }
        self.tick_values.clear();
        self.draw_values.clear();

        log::debug!("Simulation '{}' is now active.", active.simulation.name());
        let simulation = &mut active.simulation;
        let result = guard::run_hook("Error initializing simulation", || simulation.post_init());
        if let Err(err) = result {
            self.record_run_error(err);
        }
    }

    fn tick(&mut self) -> bool {
        let stepping = self.loop_state == LoopState::Stepping;
        let wants_tick = matches!(self.loop_state, LoopState::Running | LoopState::Stepping);
        if stepping {
            self.loop_state = LoopState::Paused;
        }
        if !wants_tick || self.fault != FaultState::Valid {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let delta = self.config.delta();
        let simulation = &mut active.simulation;
        self.tick_values.clear();
        let outcome = debug::capture(DebugScope::Tick, &mut self.tick_values, || {
            guard::run_tick(simulation.as_mut(), delta)
        });
        self.tick_count += 1;

        match outcome {
            TickOutcome::Success => {}
            TickOutcome::Invalid(err) => {
                self.fault = FaultState::ValidationFailed;
                self.post(Banner::error(
                    format!("Invalid solution: {err}"),
                    self.generation,
                ));
            }
            TickOutcome::Failed(err) => self.record_run_error(err),
        }
        true
    }

    fn render(&mut self, surface: &mut dyn Surface, now: Instant) {
        surface.clear(Color::WHITE);
        self.draw_values.clear();
        if let Some(active) = self.active.as_ref() {
            let simulation = &active.simulation;
            debug::capture(DebugScope::Draw, &mut self.draw_values, || {
                simulation.draw(&mut *surface)
            });
        }

        if self.banner.as_ref().is_some_and(|banner| !banner.is_visible(now)) {
            self.banner = None;
        }
        let fps = self.show_fps.then(|| self.fps.label());
        draw_overlay(
            surface,
            &Overlay {
                paused: self.loop_state == LoopState::Paused,
                tick_values: &self.tick_values,
                draw_values: &self.draw_values,
                fps: fps.as_deref(),
                help: self.show_help.then_some(&self.config.keys),
                banner: self.banner.as_ref(),
            },
        );
        surface.present();
    }

    fn restart(&mut self, now: Instant) {
        let Some(factory) = self.factory.take() else {
            log::info!("No simulation factory registered, re-executing the solution.");
            self.reload(now);
            return;
        };
        log::info!("Restarting simulation.");
        self.teardown();
        match guard::construct(factory.as_ref()) {
            Ok(simulation) => self.install(simulation),
            Err(err) => self.record_run_error(err),
        }
        self.factory = Some(factory);
    }

    fn reload(&mut self, now: Instant) {
        log::info!("Reloading '{}'.", self.source.describe());
        self.teardown();
        self.factory = None;
        self.execute_source(now, true);
    }

    /// Executes the source in a fresh scope and installs what it registered.
    fn execute_source(&mut self, now: Instant, announce: bool) {
        let source = &self.source;
        let mut scope = Scope::new(&mut self.plots);
        let result = panic::catch_unwind(AssertUnwindSafe(|| source.execute(&mut scope)))
            .unwrap_or_else(|payload| Err(anyhow::anyhow!("panic: {}", panic_message(payload))));
        let registration = scope.into_registration();

        if let Err(source_err) = result {
            let err = ReloadError {
                path: self.source.watch_path().map(Into::into),
                source: source_err,
            };
            log::error!("{:?}", err.source);
            self.post(Banner::error(err.to_string(), self.generation));
            return;
        }

        let Some(registration) = registration else {
            let text = if announce {
                "Reloaded solution did not provide a simulation"
            } else {
                "Solution did not provide a simulation"
            };
            self.post(Banner::warning(text, self.generation));
            return;
        };

        let installed = match registration {
            Registration::Factory(factory) => match guard::construct(factory.as_ref()) {
                Ok(simulation) => {
                    self.factory = Some(factory);
                    self.install(simulation);
                    true
                }
                Err(err) => {
                    self.record_run_error(err);
                    false
                }
            },
            Registration::Instance(simulation) => {
                self.install(simulation);
                true
            }
            Registration::Faulted { simulation, error } => {
                self.install(Box::new(ErrorProxy::new(simulation, error)));
                true
            }
        };

        if installed && announce {
            self.post(Banner::info(
                "Reloaded solution",
                self.generation,
                now,
                self.config.info_message_duration(),
            ));
        }
    }

    fn install(&mut self, simulation: Box<dyn Simulation>) {
        self.generation = self.generation.next();
        log::debug!(
            "Installing '{}' as generation {}.",
            simulation.name(),
            self.generation.0
        );
        self.active = Some(Active {
            simulation,
            generation: self.generation,
        });
    }

    /// Calls the cleanup hook of the active simulation and drops it.
    fn teardown(&mut self) {
        self.tick_values.clear();
        self.draw_values.clear();
        if let Some(mut active) = self.active.take() {
            let simulation = &mut active.simulation;
            let result = guard::run_hook("Error cleaning up simulation", || simulation.cleanup());
            if let Err(err) = result {
                log::warn!("{}", err.banner_text());
            }
        }
    }

    fn terminate(&mut self) {
        log::info!("Terminating after {} ticks.", self.tick_count);
        self.teardown();
        self.factory = None;
        self.loop_state = LoopState::Terminated;
    }

    fn record_run_error(&mut self, err: RunError) {
        self.fault = FaultState::RunFailed;
        if let Some(cause) = err.cause() {
            log::error!("{}: {cause:#}", err.message());
        }
        if let Some(backtrace) = err.backtrace() {
            log::error!("{backtrace}");
        }
        self.post(Banner::error(err.banner_text(), self.generation));
    }

    fn post(&mut self, banner: Banner) {
        banner.log();
        self.banner = Some(banner);
    }

    /// The window caption: simulation name and solution file name.
    pub fn title(&self) -> String {
        let file = self
            .source
            .watch_path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.describe());
        match self.active.as_ref() {
            Some(active) => format!("{} / {file}", active.simulation.name()),
            None => file,
        }
    }

    /// The window size to open with.
    pub fn initial_window_size(&self) -> (u32, u32) {
        self.active
            .as_ref()
            .and_then(|active| active.simulation.initial_window_size())
            .unwrap_or((self.config.window_width, self.config.window_height))
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current scheduler state.
    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Fault state of the active simulation.
    pub fn fault_state(&self) -> FaultState {
        self.fault
    }

    /// The banner currently set, visible or not.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Generation of the most recently installed simulation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` while a simulation is installed.
    pub fn has_simulation(&self) -> bool {
        self.active.is_some()
    }

    /// Number of ticks attempted so far, across all simulations.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Number of iterations that reached their tick deadline so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Figures redrawn by the plot slice of the last call to [`step`](Engine::step).
    ///
    /// Hosts repaint only these figure windows.
    pub fn redrawn_figures(&self) -> &[String] {
        &self.last_redrawn
    }

    /// Values shown during the last tick.
    pub fn tick_values(&self) -> &[DebugLine] {
        &self.tick_values
    }

    /// Values shown during the last draw.
    pub fn draw_values(&self) -> &[DebugLine] {
        &self.draw_values
    }

    /// The figures, for hosts that display them.
    pub fn plots(&self) -> &PlotCoordinator {
        &self.plots
    }

    /// Mutable access to the figures, for hosts that forward window events.
    pub fn plots_mut(&mut self) -> &mut PlotCoordinator {
        &mut self.plots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FnSource;
    use exerciser_core::{show_value, ExerciseError, RecordingSurface, ValidationError};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter {
        ticks: Rc<Cell<u32>>,
        post_inits: Rc<Cell<u32>>,
        fail_on: Option<u32>,
    }

    impl Simulation for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn tick(&mut self, _delta: f64) -> Result<(), ExerciseError> {
            self.ticks.set(self.ticks.get() + 1);
            show_value("ticks", self.ticks.get());
            if Some(self.ticks.get()) == self.fail_on {
                return Err(ValidationError::new("bad output").into());
            }
            Ok(())
        }

        fn draw(&self, _surface: &mut dyn Surface) {}

        fn post_init(&mut self) {
            self.post_inits.set(self.post_inits.get() + 1);
        }
    }

    struct Counters {
        ticks: Rc<Cell<u32>>,
        post_inits: Rc<Cell<u32>>,
    }

    fn engine(fail_on: Option<u32>) -> (Engine, Counters) {
        let ticks = Rc::new(Cell::new(0));
        let post_inits = Rc::new(Cell::new(0));
        let counters = Counters {
            ticks: ticks.clone(),
            post_inits: post_inits.clone(),
        };
        let source = FnSource::new(
            "counter.rs",
            move |scope: &mut Scope<'_>| -> anyhow::Result<()> {
                let ticks = ticks.clone();
                let post_inits = post_inits.clone();
                scope.run(move || {
                    Box::new(Counter {
                        ticks: ticks.clone(),
                        post_inits: post_inits.clone(),
                        fail_on,
                    })
                });
                Ok(())
            },
        );
        let config = EngineConfig {
            pacing: Pacing::Unpaced,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config, Box::new(source)).expect("valid config");
        engine.start(Instant::now());
        (engine, counters)
    }

    fn press(key: &str) -> Vec<InputEvent> {
        vec![InputEvent::key(key)]
    }

    #[test]
    fn running_engine_ticks_every_step() {
        let (mut engine, counters) = engine(None);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        for _ in 0..5 {
            let report = engine.step(&[], &mut surface, Instant::now());
            assert!(report.ticked);
            assert_eq!(report.next_deadline, None);
        }
        assert_eq!(counters.ticks.get(), 5);
        assert_eq!(counters.post_inits.get(), 1);
        assert_eq!(surface.frames_presented(), 5);
        assert!(surface.contains_text("ticks = 5"));
        assert_eq!(engine.title(), "counter / counter.rs");
    }

    #[test]
    fn pause_and_single_step() {
        let (mut engine, counters) = engine(None);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        engine.step(&press("Space"), &mut surface, Instant::now());
        assert_eq!(engine.loop_state(), LoopState::Paused);
        assert_eq!(counters.ticks.get(), 0);
        assert!(surface.contains_text("PAUSED"));

        engine.step(&[], &mut surface, Instant::now());
        assert_eq!(counters.ticks.get(), 0);

        let report = engine.step(&press("N"), &mut surface, Instant::now());
        assert!(report.ticked);
        assert_eq!(counters.ticks.get(), 1);
        assert_eq!(engine.loop_state(), LoopState::Paused);

        engine.step(&press("Space"), &mut surface, Instant::now());
        assert_eq!(engine.loop_state(), LoopState::Running);
        assert_eq!(counters.ticks.get(), 2);
    }

    #[test]
    fn step_while_running_pauses_after_one_tick() {
        let (mut engine, counters) = engine(None);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        engine.step(&press("N"), &mut surface, Instant::now());
        engine.step(&[], &mut surface, Instant::now());
        assert_eq!(counters.ticks.get(), 1);
        assert_eq!(engine.loop_state(), LoopState::Paused);
    }

    #[test]
    fn validation_fault_stops_ticking_until_restart() {
        let (mut engine, counters) = engine(Some(2));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        for _ in 0..4 {
            engine.step(&[], &mut surface, Instant::now());
        }
        assert_eq!(counters.ticks.get(), 2);
        assert_eq!(engine.fault_state(), FaultState::ValidationFailed);
        assert!(surface.contains_text("Invalid solution: bad output"));

        engine.step(&press("F5"), &mut surface, Instant::now());
        assert_eq!(engine.fault_state(), FaultState::Valid);
        assert!(engine.banner().is_none());
        assert_eq!(counters.post_inits.get(), 2);
        assert_eq!(counters.ticks.get(), 3);
    }

    #[test]
    fn quit_takes_effect_on_the_next_iteration() {
        let (mut engine, counters) = engine(None);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let report = engine.step(&press("Escape"), &mut surface, Instant::now());
        assert_eq!(report.status, StepStatus::Continue);
        assert_eq!(counters.ticks.get(), 1);

        let report = engine.step(&[], &mut surface, Instant::now());
        assert_eq!(report.status, StepStatus::Terminated);
        assert_eq!(engine.loop_state(), LoopState::Terminated);
        assert_eq!(counters.ticks.get(), 1);
    }

    #[test]
    fn handle_commands_are_applied_at_the_top_of_a_step() {
        let (mut engine, counters) = engine(None);
        let handle = engine.handle();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        engine.step(&[], &mut surface, Instant::now());

        handle.restart();
        engine.step(&[], &mut surface, Instant::now());
        assert_eq!(counters.post_inits.get(), 2);

        std::thread::spawn(move || handle.quit())
            .join()
            .expect("sender thread");
        let report = engine.step(&[], &mut surface, Instant::now());
        assert_eq!(report.status, StepStatus::Terminated);
    }

    #[test]
    fn fps_and_help_toggle() {
        let (mut engine, _counters) = engine(None);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        engine.step(&press("F1"), &mut surface, Instant::now());
        assert!(surface.contains_text("FPS: "));
        engine.step(&press("H"), &mut surface, Instant::now());
        assert!(surface.contains_text("Space: pause / resume"));
        engine.step(&press("F1"), &mut surface, Instant::now());
        assert!(!surface.contains_text("FPS: "));
    }

    #[test]
    fn real_time_pacing_reports_a_deadline() {
        let (mut engine, _counters) = engine(None);
        engine.config.pacing = Pacing::RealTime;
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let now = Instant::now();
        let report = engine.step(&[], &mut surface, now);
        assert_eq!(report.next_deadline, Some(now + engine.config().tick_period()));
    }

    #[test]
    fn redrawn_figures_name_the_last_slice_only() {
        let (mut engine, _counters) = engine(None);
        engine.plots_mut().line_plot("force");
        let mut surface = RecordingSurface::new(800.0, 600.0);

        engine.step(&[], &mut surface, Instant::now());
        assert_eq!(engine.redrawn_figures(), ["force".to_string()]);

        engine.step(&[], &mut surface, Instant::now());
        assert!(engine.redrawn_figures().is_empty());
    }

    #[test]
    fn zero_tick_rate_is_rejected_at_construction() {
        let source = FnSource::new("empty", |_scope: &mut Scope<'_>| -> anyhow::Result<()> {
            Ok(())
        });
        let config = EngineConfig {
            ticks_per_second: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(config, Box::new(source)),
            Err(ConfigError::Invalid(_))
        ));
    }
}
