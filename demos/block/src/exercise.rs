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

//! Lab 1 - PID: a block on a frictionless line, pushed by the student's
//! controller towards the centre.

use std::rc::Rc;

use exerciser::prelude::*;

/// Caption of the exercise and name of its plot.
pub const EXERCISE_NAME: &str = "Lab 1 - PID";

/// Simulated time run up-front into the plot.
const PRESIMULATION_SECONDS: f64 = 30.0;
const START_X: f64 = 100.0;
const BLOCK_SIZE: f32 = 20.0;

/// Builds a fresh controller, so that every run starts from the same state.
pub type ControllerFactory = Rc<dyn Fn() -> Box<dyn Controller<f64>>>;

/// The block and the controller steering it.
pub struct BlockExercise {
    t: f64,
    body: PointMass<1>,
    force: f64,
    limit: ForceLimit,
    controller: Box<dyn Controller<f64>>,
    plot: Option<PlotHandle>,
}

impl BlockExercise {
    /// A block at rest at `x = 100` with no force applied yet.
    pub fn new(controller: Box<dyn Controller<f64>>) -> Self {
        Self {
            t: 0.0,
            body: PointMass::at_rest([START_X]),
            force: f64::NAN,
            limit: ForceLimit::default(),
            controller,
            plot: None,
        }
    }

    /// Moves the cursor of `plot` to the current time on every draw.
    pub fn with_plot(mut self, plot: PlotHandle) -> Self {
        self.plot = Some(plot);
        self
    }

    pub fn position(&self) -> f64 {
        self.body.position[0]
    }

    pub fn velocity(&self) -> f64 {
        self.body.velocity[0]
    }

    /// The clamped force of the last tick. NaN before the first one.
    pub fn force(&self) -> f64 {
        self.force
    }
}

impl Simulation for BlockExercise {
    fn name(&self) -> &str {
        EXERCISE_NAME
    }

    fn tick(&mut self, delta: f64) -> Result<(), ExerciseError> {
        let output = call_control(self.controller.as_mut(), delta, &self.body.position[0])?;
        self.force = self.limit.clamp(output.expect_scalar()?);

        self.t += delta;
        self.body.integrate([self.force], delta);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if let Some(plot) = &self.plot {
            plot.borrow_mut().set_cursor(Some(self.t));
        }

        show_simulation_value("x", self.position(), Color::BLACK);
        show_simulation_value("vx", self.velocity(), Color::BLACK);
        show_simulation_value("F", self.force, Color::BLACK);

        let (width, height) = surface.size();
        let middle = width / 2.0;
        draw_dashed_line(
            surface,
            Color::GRAY,
            Point::new(middle, 0.0),
            Point::new(middle, height),
            (10.0, 6.0),
            1.0,
        );

        let center = Point::new(self.position() as f32 + middle, height / 2.0);
        surface.rect(Rect::centered(center, BLOCK_SIZE, BLOCK_SIZE), Color::RED, None);
        draw_arrow(surface, Color::GREEN, center, (self.velocity() as f32, 0.0), 2.0);
        if !self.force.is_nan() {
            draw_arrow(surface, Color::BLUE, center, (self.force as f32, 0.0), 2.0);
        }
    }
}

/// Runs the exercise for 30 simulated seconds into `plot`.
///
/// Returns the time at which the controller failed, if it did. The failure
/// is also written under the x axis.
pub fn presimulate(
    plot: &PlotHandle,
    make_controller: &dyn Fn() -> Box<dyn Controller<f64>>,
    delta: f64,
) -> Option<f64> {
    let mut exercise = BlockExercise::new(make_controller());
    let mut plot = plot.borrow_mut();
    plot.clear();
    plot.set_x_axis(XAxis::Fixed(0.0, PRESIMULATION_SECONDS));
    plot.set_y_bounds(-200.0, 200.0);
    plot.set_x_label(None);
    let x_line = plot.line("x", Color::RED);
    let vx_line = plot.line("vx", Color::GREEN);
    let force_line = plot.line("F", Color::BLUE);

    let steps = (PRESIMULATION_SECONDS / delta).round() as u64;
    for step in 0..steps {
        let t = step as f64 * delta;
        if let Err(err) = exercise.tick(delta) {
            log::warn!("Presimulation stopped at t = {t:.2}: {err}");
            plot.set_x_label(Some(format!("Error simulating solution at t = {t:.2}")));
            return Some(t);
        }
        plot.push(x_line, t, exercise.position());
        plot.push(vx_line, t, exercise.velocity());
        plot.push(force_line, t, exercise.force());
    }
    None
}

/// Presimulates into the exercise plot and registers the live exercise.
pub fn simulate(scope: &mut Scope<'_>, make_controller: ControllerFactory, delta: f64) {
    let plot = scope.figure(EXERCISE_NAME);
    presimulate(&plot, make_controller.as_ref(), delta);

    scope.run(move || {
        let exercise = BlockExercise::new(make_controller()).with_plot(plot.clone());
        Box::new(exercise) as Box<dyn Simulation>
    });
}
