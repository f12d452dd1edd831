// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Property-Based Tests (proptest) for helix-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the trajectory pusher.
//!
//! Covers: field-aligned motion, parallel-velocity conservation,
//! semi-implicit Euler perpendicular growth, determinism.

use helix_core::diagnostics::{
    parallel_velocity_drift, perpendicular_speed_ratio, predicted_perpendicular_growth,
};
use helix_core::field::{helmholtz_axial_field, UniformField};
use helix_core::pusher::{integrate_trajectory, Species};
use helix_types::constants::{PhysicalConstants, MU0_SI};
use helix_types::state::ParticleState;
use proptest::prelude::*;

fn electron() -> Species {
    Species::electron(&PhysicalConstants::ELECTRON)
}

fn axial_field(current_a: f64) -> UniformField {
    let b0 = helmholtz_axial_field(0.20, 320, current_a, MU0_SI).unwrap();
    UniformField {
        b_t: [b0, 0.0, 0.0],
    }
}

// ── Field-Aligned Motion ─────────────────────────────────────────────

proptest! {
    /// Velocity parallel to B never changes and position is linear in time.
    #[test]
    fn aligned_beam_moves_in_a_straight_line(
        vx in -3e7f64..3e7,
        steps in 1usize..2000,
        current in 0.1f64..5.0,
    ) {
        let field = axial_field(current);
        let initial = ParticleState::new([0.0; 3], [vx, 0.0, 0.0]);
        let traj = integrate_trajectory(
            initial, &electron(), &field, 1e-11, steps,
        ).unwrap();
        prop_assert_eq!(traj.len(), steps);
        for i in 0..steps {
            let v = traj.velocity(i).unwrap();
            prop_assert_eq!(v, [vx, 0.0, 0.0]);
            let r = traj.position(i).unwrap();
            let expected = i as f64 * 1e-11 * vx;
            prop_assert!((r[0] - expected).abs() <= 1e-9 * expected.abs().max(1e-12));
            prop_assert_eq!(r[1], 0.0);
            prop_assert_eq!(r[2], 0.0);
        }
    }
}

// ── Helical Motion ───────────────────────────────────────────────────

proptest! {
    /// With B along x, v_x is conserved exactly.
    #[test]
    fn parallel_component_is_conserved(
        vx in -3e7f64..3e7,
        vy in -5e6f64..5e6,
        vz in -5e6f64..5e6,
    ) {
        let initial = ParticleState::new([0.0; 3], [vx, vy, vz]);
        let traj = integrate_trajectory(
            initial, &electron(), &axial_field(1.5), 1e-11, 1500,
        ).unwrap();
        prop_assert_eq!(parallel_velocity_drift(&traj, [1.0, 0.0, 0.0]), 0.0);
    }

    /// Semi-implicit Euler grows v⊥ by exactly sqrt(1 + (ωc Δt)²) per step.
    #[test]
    fn semi_implicit_perpendicular_growth_is_predictable(
        vy in 1e5f64..5e6,
        vz in -5e6f64..5e6,
        steps in 2usize..3000,
        current in 0.1f64..5.0,
    ) {
        let field = axial_field(current);
        let initial = ParticleState::new([0.0; 3], [2e7, vy, vz]);
        let traj = integrate_trajectory(
            initial, &electron(), &field, 1e-11, steps,
        ).unwrap();
        let measured = perpendicular_speed_ratio(&traj, &field);
        let predicted = predicted_perpendicular_growth(&electron(), &field, 1e-11, steps);
        prop_assert!(((measured - predicted) / predicted).abs() < 1e-10,
            "measured={}, predicted={}", measured, predicted);
        prop_assert!(measured >= 1.0);
    }

    /// Identical inputs give identical trajectories.
    #[test]
    fn integration_is_deterministic(
        vy in -5e6f64..5e6,
        vz in -5e6f64..5e6,
        steps in 1usize..1000,
    ) {
        let initial = ParticleState::new([0.1, -0.2, 0.3], [2e7, vy, vz]);
        let run = || integrate_trajectory(
            initial, &electron(), &axial_field(1.5), 1e-11, steps,
        ).unwrap();
        prop_assert_eq!(run(), run());
    }
}
