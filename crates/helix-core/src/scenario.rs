// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Beam Scenario
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scattered vs. collimated electron beams in the Helmholtz field.
//!
//! Both beams start from the same point. The scattered beam carries a
//! transverse velocity and follows a helix; the collimated beam moves along
//! the field and sees no force. The two runs are independent.

use crate::diagnostics::{speed_drift, trajectory_extent};
use crate::field::{cyclotron_period, larmor_radius, UniformField};
use crate::pusher::{integrate_trajectory, Species};
use helix_math::vector::norm;
use helix_types::config::SimulationConfig;
use helix_types::error::HelixResult;
use helix_types::state::{ParticleState, Trajectory};
use tracing::info;

/// Both integrated beams plus the field that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub field: UniformField,
    pub species: Species,
    pub scattered: Trajectory,
    pub collimated: Trajectory,
}

/// Validate `config`, build the field and integrate both beams.
pub fn run_scenario(config: &SimulationConfig) -> HelixResult<ScenarioResult> {
    config.validate()?;

    let field = UniformField::from_coil(&config.coil, config.physics.vacuum_permeability)?;
    let species = Species::electron(&config.physics);
    let dt = config.integrator.dt_s;
    let steps = config.integrator.steps;
    let beams = &config.beams;

    let scattered = integrate_trajectory(
        ParticleState::new(beams.origin_m, beams.scattered_velocity_m_s),
        &species,
        &field,
        dt,
        steps,
    )?;
    let collimated = integrate_trajectory(
        ParticleState::new(beams.origin_m, beams.collimated_velocity_m_s),
        &species,
        &field,
        dt,
        steps,
    )?;

    let drift = speed_drift(&scattered);
    let extent = trajectory_extent(&scattered);
    let b0 = field.magnitude_t();
    let (_, v_perp) = field.split_velocity(beams.scattered_velocity_m_s);
    let v_perp = norm(v_perp);
    info!(
        b0_t = b0,
        cyclotron_period_s = cyclotron_period(species.charge_c, species.mass_kg, b0),
        larmor_radius_m = larmor_radius(v_perp, species.charge_c, species.mass_kg, b0),
        steps,
        scattered_final_x_m = extent.final_position_m[0],
        collimated_final_x_m = collimated.last().position_m[0],
        max_transverse_m = extent.max_abs_transverse_m,
        scattered_path_m = extent.path_length_m,
        speed_drift_rel = drift.max_rel,
        "beam scenario integrated"
    );

    Ok(ScenarioResult {
        field,
        species,
        scattered,
        collimated,
    })
}
