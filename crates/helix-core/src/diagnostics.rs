//! Integrator drift and extent diagnostics for sampled trajectories.
//!
//! In a pure magnetic field |v| is conserved in continuous time. Semi-implicit
//! Euler instead multiplies the perpendicular speed by `sqrt(1 + (ωc Δt)²)`
//! on every step while leaving the parallel component untouched, so its drift
//! is predictable and can be checked exactly.

use crate::field::{cyclotron_frequency, UniformField};
use crate::pusher::Species;
use helix_math::vector::{dot, norm};
use helix_types::state::{Trajectory, Vec3};

/// Deviation of |v| from its initial value over a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftReport {
    pub initial_speed_m_s: f64,
    pub max_abs_m_s: f64,
    /// `max_abs / |v0|`, or `max_abs` itself when `|v0| = 0`.
    pub max_rel: f64,
    /// Signed relative change at the last sample.
    pub final_rel: f64,
}

/// Spatial extent used for plot limits and summaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryExtent {
    /// max(|y|, |z|) over all samples [m].
    pub max_abs_transverse_m: f64,
    pub final_position_m: Vec3,
    /// Sum of segment lengths [m].
    pub path_length_m: f64,
}

fn velocity_row(traj: &Trajectory, i: usize) -> Vec3 {
    let v = traj.velocities();
    [v[[i, 0]], v[[i, 1]], v[[i, 2]]]
}

fn relative(delta: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        delta / reference
    } else {
        delta
    }
}

/// Speed drift relative to the first sample.
pub fn speed_drift(traj: &Trajectory) -> DriftReport {
    let speed0 = traj.initial().speed_m_s();
    let max_abs = (0..traj.len())
        .map(|i| (norm(velocity_row(traj, i)) - speed0).abs())
        .fold(0.0_f64, f64::max);
    let final_delta = traj.last().speed_m_s() - speed0;
    DriftReport {
        initial_speed_m_s: speed0,
        max_abs_m_s: max_abs,
        max_rel: relative(max_abs, speed0),
        final_rel: relative(final_delta, speed0),
    }
}

/// Maximum absolute change of the velocity component along `direction`.
pub fn parallel_velocity_drift(traj: &Trajectory, direction: Vec3) -> f64 {
    let v0 = dot(traj.initial().velocity_m_s, direction);
    (0..traj.len())
        .map(|i| (dot(velocity_row(traj, i), direction) - v0).abs())
        .fold(0.0_f64, f64::max)
}

/// Ratio |v⊥(last)| / |v⊥(0)|; 1 when there is no initial perpendicular speed.
pub fn perpendicular_speed_ratio(traj: &Trajectory, field: &UniformField) -> f64 {
    let (_, perp0) = field.split_velocity(traj.initial().velocity_m_s);
    let (_, perp1) = field.split_velocity(traj.last().velocity_m_s);
    let n0 = norm(perp0);
    if n0 == 0.0 {
        return 1.0;
    }
    norm(perp1) / n0
}

/// Predicted semi-implicit Euler perpendicular growth after `steps` samples.
///
/// `(1 + (ωc Δt)²)^((steps − 1) / 2)`.
pub fn predicted_perpendicular_growth(
    species: &Species,
    field: &UniformField,
    dt_s: f64,
    steps: usize,
) -> f64 {
    let omega_dt = cyclotron_frequency(species.charge_c, species.mass_kg, field.magnitude_t()) * dt_s;
    let updates = steps.saturating_sub(1) as f64;
    (1.0 + omega_dt * omega_dt).powf(0.5 * updates)
}

pub fn trajectory_extent(traj: &Trajectory) -> TrajectoryExtent {
    let positions = traj.positions();
    let mut max_abs_transverse = 0.0_f64;
    let mut path_length = 0.0_f64;
    for i in 0..traj.len() {
        max_abs_transverse = max_abs_transverse
            .max(positions[[i, 1]].abs())
            .max(positions[[i, 2]].abs());
        if i > 0 {
            let d = [
                positions[[i, 0]] - positions[[i - 1, 0]],
                positions[[i, 1]] - positions[[i - 1, 1]],
                positions[[i, 2]] - positions[[i - 1, 2]],
            ];
            path_length += norm(d);
        }
    }
    TrajectoryExtent {
        max_abs_transverse_m: max_abs_transverse,
        final_position_m: traj.last().position_m,
        path_length_m: path_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn two_sample(v0: Vec3, v1: Vec3) -> Trajectory {
        let positions = Array2::from_shape_vec((2, 3), vec![0.0, 0.0, 0.0, 1.0, -3.0, 2.0]).unwrap();
        let velocities = Array2::from_shape_vec(
            (2, 3),
            vec![v0[0], v0[1], v0[2], v1[0], v1[1], v1[2]],
        )
        .unwrap();
        Trajectory::from_arrays(positions, velocities, 1.0).unwrap()
    }

    #[test]
    fn test_speed_drift_of_hand_built_trajectory() {
        let traj = two_sample([3.0, 4.0, 0.0], [0.0, 0.0, 6.0]);
        let drift = speed_drift(&traj);
        assert_eq!(drift.initial_speed_m_s, 5.0);
        assert!((drift.max_abs_m_s - 1.0).abs() < 1e-15);
        assert!((drift.max_rel - 0.2).abs() < 1e-15);
        assert!((drift.final_rel - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_speed_drift_from_rest_is_absolute() {
        let traj = two_sample([0.0; 3], [0.0, 2.0, 0.0]);
        let drift = speed_drift(&traj);
        assert_eq!(drift.max_rel, 2.0);
    }

    #[test]
    fn test_parallel_drift_and_perp_ratio() {
        let traj = two_sample([1.0, 2.0, 0.0], [1.5, 0.0, 4.0]);
        assert!((parallel_velocity_drift(&traj, [1.0, 0.0, 0.0]) - 0.5).abs() < 1e-15);
        let field = UniformField {
            b_t: [2e-3, 0.0, 0.0],
        };
        assert!((perpendicular_speed_ratio(&traj, &field) - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_extent() {
        let traj = two_sample([0.0; 3], [0.0; 3]);
        let ext = trajectory_extent(&traj);
        assert_eq!(ext.max_abs_transverse_m, 3.0);
        assert_eq!(ext.final_position_m, [1.0, -3.0, 2.0]);
        assert!((ext.path_length_m - 14.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_predicted_growth_is_one_without_field_or_steps() {
        let species = Species {
            charge_c: -1.602e-19,
            mass_kg: 9.109e-31,
        };
        let none = UniformField { b_t: [0.0; 3] };
        assert_eq!(predicted_perpendicular_growth(&species, &none, 1e-11, 20_000), 1.0);
        let field = UniformField {
            b_t: [2e-3, 0.0, 0.0],
        };
        assert_eq!(predicted_perpendicular_growth(&species, &field, 1e-11, 1), 1.0);
        assert!(predicted_perpendicular_growth(&species, &field, 1e-11, 100) > 1.0);
    }
}
