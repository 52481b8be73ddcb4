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

//! Reloadable solution sources.
//!
//! A [`SolutionSource`] is executed once at start-up and again on every
//! reload. Each execution receives a brand new [`Scope`] and registers the
//! simulation to run through it, so nothing registered by an earlier version
//! of the solution can leak into a later one. Figures are the exception: they
//! belong to the engine's [`PlotCoordinator`] and outlive reloads.

use std::path::{Path, PathBuf};

use exerciser_core::{ExerciseError, Simulation, SimulationFactory};

use crate::plot::{PlotCoordinator, PlotHandle};

/// Student code that can be executed again after it changed.
pub trait SolutionSource {
    /// Human-readable name for logs and the window caption.
    fn describe(&self) -> String;

    /// The file to watch for changes, if any.
    fn watch_path(&self) -> Option<&Path> {
        None
    }

    /// Runs the solution, registering a simulation through `scope`.
    ///
    /// Returning an error (or panicking) is reported as a reload error and
    /// leaves the engine without a simulation.
    fn execute(&self, scope: &mut Scope<'_>) -> anyhow::Result<()>;
}

/// What an execution registered.
pub enum Registration {
    /// A factory; the engine builds an instance now and on every restart.
    Factory(SimulationFactory),
    /// A single instance. Restarting re-executes the source.
    Instance(Box<dyn Simulation>),
    /// An instance that fails with `error` on its first tick.
    Faulted {
        /// The simulation that keeps being drawn.
        simulation: Box<dyn Simulation>,
        /// The error reported in place of the first tick.
        error: ExerciseError,
    },
}

impl Registration {
    fn kind(&self) -> &'static str {
        match self {
            Registration::Factory(_) => "factory",
            Registration::Instance(_) => "instance",
            Registration::Faulted { .. } => "faulted instance",
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Registration").field(&self.kind()).finish()
    }
}

/// The fresh namespace handed to one execution of a [`SolutionSource`].
pub struct Scope<'a> {
    plots: &'a mut PlotCoordinator,
    registration: Option<Registration>,
}

impl<'a> Scope<'a> {
    /// Creates an empty scope backed by the engine's plots.
    pub fn new(plots: &'a mut PlotCoordinator) -> Self {
        Self {
            plots,
            registration: None,
        }
    }

    /// Registers a factory for the simulation to run.
    pub fn run<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Simulation> + 'static,
    {
        self.register(Registration::Factory(Box::new(factory)));
    }

    /// Registers a ready-made simulation instance.
    pub fn run_instance(&mut self, simulation: Box<dyn Simulation>) {
        self.register(Registration::Instance(simulation));
    }

    /// Registers a simulation that reports `error` instead of ticking, while
    /// still being drawn. Used when the solution is known to be unusable
    /// before the simulation even starts.
    pub fn run_with_error<F>(&mut self, factory: F, error: impl Into<ExerciseError>)
    where
        F: Fn() -> Box<dyn Simulation>,
    {
        self.register(Registration::Faulted {
            simulation: factory(),
            error: error.into(),
        });
    }

    /// Returns the line plot called `name`, creating it on first use.
    ///
    /// The same name yields the same plot across reloads.
    pub fn figure(&mut self, name: &str) -> PlotHandle {
        self.plots.line_plot(name)
    }

    /// Returns `true` once something was registered.
    pub fn has_registration(&self) -> bool {
        self.registration.is_some()
    }

    /// Consumes the scope, returning the last registration.
    pub fn into_registration(self) -> Option<Registration> {
        self.registration
    }

    fn register(&mut self, registration: Registration) {
        if let Some(previous) = self.registration.replace(registration) {
            log::debug!("Replacing previously registered {}.", previous.kind());
        }
    }
}

/// A [`SolutionSource`] backed by a closure.
pub struct FnSource<F> {
    name: String,
    path: Option<PathBuf>,
    init: F,
}

impl<F> FnSource<F>
where
    F: Fn(&mut Scope<'_>) -> anyhow::Result<()>,
{
    /// Creates a source called `name` that runs `init` on every execution.
    pub fn new(name: impl Into<String>, init: F) -> Self {
        Self {
            name: name.into(),
            path: None,
            init,
        }
    }

    /// Watches `path` and re-executes the closure when it changes.
    pub fn watching(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl<F> SolutionSource for FnSource<F>
where
    F: Fn(&mut Scope<'_>) -> anyhow::Result<()>,
{
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn watch_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn execute(&self, scope: &mut Scope<'_>) -> anyhow::Result<()> {
        (self.init)(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exerciser_core::{Surface, ValidationError};

    struct Idle(&'static str);

    impl Simulation for Idle {
        fn name(&self) -> &str {
            self.0
        }

        fn tick(&mut self, _delta: f64) -> Result<(), ExerciseError> {
            Ok(())
        }

        fn draw(&self, _surface: &mut dyn Surface) {}
    }

    #[test]
    fn last_registration_wins() {
        let mut plots = PlotCoordinator::new(3);
        let mut scope = Scope::new(&mut plots);
        scope.run(|| Box::new(Idle("first")));
        scope.run_instance(Box::new(Idle("second")));
        match scope.into_registration() {
            Some(Registration::Instance(sim)) => assert_eq!(sim.name(), "second"),
            _ => panic!("expected the instance registration"),
        }
    }

    #[test]
    fn empty_scope_registers_nothing() {
        let mut plots = PlotCoordinator::new(3);
        let scope = Scope::new(&mut plots);
        assert!(!scope.has_registration());
        assert!(scope.into_registration().is_none());
    }

    #[test]
    fn faulted_registration_keeps_its_error() {
        let mut plots = PlotCoordinator::new(3);
        let mut scope = Scope::new(&mut plots);
        scope.run_with_error(|| Box::new(Idle("block")), ValidationError::new("kp is NaN"));
        match scope.into_registration() {
            Some(Registration::Faulted { simulation, error }) => {
                assert_eq!(simulation.name(), "block");
                assert_eq!(error.to_string(), "kp is NaN");
            }
            _ => panic!("expected a faulted registration"),
        }
    }

    #[test]
    fn figures_survive_across_scopes() {
        let mut plots = PlotCoordinator::new(3);
        let first = Scope::new(&mut plots).figure("block");
        let second = Scope::new(&mut plots).figure("block");
        assert!(std::rc::Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn fn_source_executes_its_closure() {
        let source = FnSource::new("pid", |scope: &mut Scope<'_>| -> anyhow::Result<()> {
            scope.run(|| Box::new(Idle("block")));
            Ok(())
        })
        .watching("solution.toml");
        assert_eq!(source.describe(), "pid");
        assert_eq!(source.watch_path(), Some(Path::new("solution.toml")));

        let mut plots = PlotCoordinator::new(3);
        let mut scope = Scope::new(&mut plots);
        source.execute(&mut scope).expect("execution succeeds");
        assert!(scope.has_registration());
    }
}
