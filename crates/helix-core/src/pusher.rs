//! Fixed-step charged-particle pusher in a static uniform magnetic field.
//!
//! Semi-implicit Euler: the velocity takes an explicit Lorentz-force step and
//! the position then advances with the updated velocity. The scheme does not
//! conserve |v|; its drift is characterised in `diagnostics`.

use crate::field::UniformField;
use helix_math::vector::cross;
use helix_types::constants::PhysicalConstants;
use helix_types::error::{HelixError, HelixResult};
use helix_types::state::{ParticleState, Trajectory, Vec3};
use ndarray::Array2;
use tracing::debug;

/// Charge and mass of the tracked particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    /// Signed charge [C].
    pub charge_c: f64,
    pub mass_kg: f64,
}

impl Species {
    /// Electron built from the run constants (charge `-e`).
    pub fn electron(constants: &PhysicalConstants) -> Self {
        Species {
            charge_c: constants.particle_charge_c(),
            mass_kg: constants.particle_mass_kg,
        }
    }
}

/// Advance one sample with semi-implicit Euler.
///
/// Force `F = q (v × B)`, acceleration `a = F / m`, then
/// `v_{i+1} = v_i + a Δt` and `r_{i+1} = r_i + v_{i+1} Δt`.
/// Inputs are checked once by `integrate_trajectory`.
fn semi_implicit_euler_step(state: &mut ParticleState, species: &Species, magnetic_t: Vec3, dt_s: f64) {
    let c = cross(state.velocity_m_s, magnetic_t);
    let v = &mut state.velocity_m_s;
    for k in 0..3 {
        let force = species.charge_c * c[k];
        let accel = force / species.mass_kg;
        v[k] += accel * dt_s;
    }
    let v_new = *v;
    for k in 0..3 {
        state.position_m[k] += v_new[k] * dt_s;
    }
}

fn validate_push_inputs(
    initial: &ParticleState,
    species: &Species,
    field: &UniformField,
    dt_s: f64,
    steps: usize,
) -> HelixResult<()> {
    if steps == 0 {
        return Err(HelixError::ConfigError(
            "steps must be >= 1".to_string(),
        ));
    }
    if !dt_s.is_finite() || dt_s <= 0.0 {
        return Err(HelixError::ConfigError(format!(
            "dt_s must be finite and > 0, got {dt_s}"
        )));
    }
    if !species.mass_kg.is_finite() || species.mass_kg <= 0.0 {
        return Err(HelixError::ConfigError(format!(
            "species.mass_kg must be finite and > 0, got {}",
            species.mass_kg
        )));
    }
    if !species.charge_c.is_finite() {
        return Err(HelixError::ConfigError(format!(
            "species.charge_c must be finite, got {}",
            species.charge_c
        )));
    }
    if field.b_t.iter().any(|b| !b.is_finite()) {
        return Err(HelixError::ConfigError(format!(
            "magnetic field components must be finite, got {:?}",
            field.b_t
        )));
    }
    if !initial.is_finite() {
        return Err(HelixError::ConfigError(
            "initial position and velocity components must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Integrate a trajectory of exactly `steps` samples, the initial condition
/// included at index 0.
pub fn integrate_trajectory(
    initial: ParticleState,
    species: &Species,
    field: &UniformField,
    dt_s: f64,
    steps: usize,
) -> HelixResult<Trajectory> {
    validate_push_inputs(&initial, species, field, dt_s, steps)?;
    debug!(steps, dt_s, "integrating trajectory");

    let mut positions = Array2::zeros((steps, 3));
    let mut velocities = Array2::zeros((steps, 3));
    let mut state = initial;
    for k in 0..3 {
        positions[[0, k]] = state.position_m[k];
        velocities[[0, k]] = state.velocity_m_s[k];
    }
    for i in 1..steps {
        semi_implicit_euler_step(&mut state, species, field.b_t, dt_s);
        for k in 0..3 {
            positions[[i, k]] = state.position_m[k];
            velocities[[i, k]] = state.velocity_m_s[k];
        }
    }

    if !state.is_finite() {
        return Err(HelixError::PhysicsViolation(format!(
            "integration produced non-finite state after {steps} samples"
        )));
    }
    Trajectory::from_arrays(positions, velocities, dt_s)
}
