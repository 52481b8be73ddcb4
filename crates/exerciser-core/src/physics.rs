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

//! Numeric policy for applying student control forces.

/// Symmetric clamp applied element-wise to every returned force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLimit(pub f64);

impl ForceLimit {
    /// Clamps `force` into `[-limit, limit]`. NaN is passed through unchanged.
    pub fn clamp(self, force: f64) -> f64 {
        if force.is_nan() {
            force
        } else {
            force.clamp(-self.0, self.0)
        }
    }

    /// Clamps every component of `force`.
    pub fn clamp_all<const N: usize>(self, force: [f64; N]) -> [f64; N] {
        force.map(|component| self.clamp(component))
    }
}

impl Default for ForceLimit {
    fn default() -> Self {
        ForceLimit(1000.0)
    }
}

/// A unit point mass in `N` dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass<const N: usize> {
    /// Position.
    pub position: [f64; N],
    /// Velocity.
    pub velocity: [f64; N],
}

impl<const N: usize> PointMass<N> {
    /// Creates a point mass at rest at `position`.
    pub fn at_rest(position: [f64; N]) -> Self {
        Self {
            position,
            velocity: [0.0; N],
        }
    }

    /// Integrates one step of semi-implicit Euler: velocity first, then position.
    ///
    /// A NaN force component leaves the matching velocity component unchanged.
    pub fn integrate(&mut self, acceleration: [f64; N], delta: f64) {
        for axis in 0..N {
            if !acceleration[axis].is_nan() {
                self.velocity[axis] += acceleration[axis] * delta;
            }
            self.position[axis] += self.velocity[axis] * delta;
        }
    }
}
