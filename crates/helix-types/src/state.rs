// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{HelixError, HelixResult};
use ndarray::{s, Array2, ArrayView2};

/// Cartesian 3-vector `[x, y, z]`. Axis 0 is the field axis.
pub type Vec3 = [f64; 3];

/// Position and velocity of one particle at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub position_m: Vec3,
    pub velocity_m_s: Vec3,
}

impl ParticleState {
    pub fn new(position_m: Vec3, velocity_m_s: Vec3) -> Self {
        ParticleState {
            position_m,
            velocity_m_s,
        }
    }

    /// |v| (m/s).
    pub fn speed_m_s(&self) -> f64 {
        let v = self.velocity_m_s;
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.position_m
            .iter()
            .chain(self.velocity_m_s.iter())
            .all(|c| c.is_finite())
    }
}

/// Fixed-length sampled trajectory.
/// Rows are samples, columns are x/y/z: `positions[[i, k]]`, shape `[n, 3]`.
/// Immutable once built; the renderer reads prefixes of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    positions: Array2<f64>,
    velocities: Array2<f64>,
    dt_s: f64,
}

impl Trajectory {
    /// Wrap integrator output. Both arrays must be `[n, 3]` with `n >= 1`.
    pub fn from_arrays(
        positions: Array2<f64>,
        velocities: Array2<f64>,
        dt_s: f64,
    ) -> HelixResult<Self> {
        if positions.ncols() != 3 || velocities.ncols() != 3 {
            return Err(HelixError::PhysicsViolation(format!(
                "trajectory arrays must have 3 columns, got positions={:?}, velocities={:?}",
                positions.dim(),
                velocities.dim()
            )));
        }
        if positions.nrows() != velocities.nrows() {
            return Err(HelixError::PhysicsViolation(format!(
                "trajectory length mismatch: positions={}, velocities={}",
                positions.nrows(),
                velocities.nrows()
            )));
        }
        if positions.nrows() == 0 {
            return Err(HelixError::PhysicsViolation(
                "trajectory must hold at least one sample".to_string(),
            ));
        }
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(HelixError::PhysicsViolation(format!(
                "trajectory dt_s must be finite and > 0, got {dt_s}"
            )));
        }
        Ok(Trajectory {
            positions,
            velocities,
            dt_s,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    /// `from_arrays` never builds an empty trajectory.
    pub fn is_empty(&self) -> bool {
        self.positions.nrows() == 0
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    /// Time of sample `i` relative to the initial condition (s).
    pub fn time_s(&self, i: usize) -> f64 {
        i as f64 * self.dt_s
    }

    pub fn positions(&self) -> ArrayView2<'_, f64> {
        self.positions.view()
    }

    pub fn velocities(&self) -> ArrayView2<'_, f64> {
        self.velocities.view()
    }

    pub fn position(&self, i: usize) -> HelixResult<Vec3> {
        self.check_index(i)?;
        Ok(row(&self.positions, i))
    }

    pub fn velocity(&self, i: usize) -> HelixResult<Vec3> {
        self.check_index(i)?;
        Ok(row(&self.velocities, i))
    }

    pub fn state(&self, i: usize) -> HelixResult<ParticleState> {
        self.check_index(i)?;
        Ok(ParticleState::new(
            row(&self.positions, i),
            row(&self.velocities, i),
        ))
    }

    pub fn initial(&self) -> ParticleState {
        ParticleState::new(row(&self.positions, 0), row(&self.velocities, 0))
    }

    pub fn last(&self) -> ParticleState {
        let i = self.len() - 1;
        ParticleState::new(row(&self.positions, i), row(&self.velocities, i))
    }

    /// Positions of the first `k` samples, clamped to the trajectory length.
    pub fn position_prefix(&self, k: usize) -> ArrayView2<'_, f64> {
        let k = k.min(self.len());
        self.positions.slice(s![..k, ..])
    }

    fn check_index(&self, i: usize) -> HelixResult<()> {
        if i >= self.len() {
            return Err(HelixError::SampleOutOfBounds {
                index: i,
                len: self.len(),
            });
        }
        Ok(())
    }
}

fn row(a: &Array2<f64>, i: usize) -> Vec3 {
    [a[[i, 0]], a[[i, 1]], a[[i, 2]]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Trajectory {
        let positions = Array2::from_shape_fn((n, 3), |(i, k)| (i * 3 + k) as f64);
        let velocities = Array2::from_elem((n, 3), 1.0);
        Trajectory::from_arrays(positions, velocities, 0.5).unwrap()
    }

    #[test]
    fn test_indexed_access() {
        let traj = ramp(4);
        assert_eq!(traj.len(), 4);
        assert!(!traj.is_empty());
        assert_eq!(traj.position(2).unwrap(), [6.0, 7.0, 8.0]);
        assert_eq!(traj.velocity(3).unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(traj.initial().position_m, [0.0, 1.0, 2.0]);
        assert_eq!(traj.last().position_m, [9.0, 10.0, 11.0]);
        assert!((traj.time_s(3) - 1.5).abs() < 1e-15);
    }

    #[test]
    fn test_out_of_bounds_index_errors() {
        let traj = ramp(4);
        match traj.state(4) {
            Err(HelixError::SampleOutOfBounds { index, len }) => {
                assert_eq!(index, 4);
                assert_eq!(len, 4);
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_prefix_is_clamped() {
        let traj = ramp(5);
        assert_eq!(traj.position_prefix(2).dim(), (2, 3));
        assert_eq!(traj.position_prefix(0).dim(), (0, 3));
        assert_eq!(traj.position_prefix(50).dim(), (5, 3));
    }

    #[test]
    fn test_from_arrays_rejects_shape_mismatch() {
        let err = Trajectory::from_arrays(Array2::zeros((3, 3)), Array2::zeros((2, 3)), 1.0)
            .unwrap_err();
        match err {
            HelixError::PhysicsViolation(msg) => assert!(msg.contains("length mismatch")),
            other => panic!("Unexpected error: {other:?}"),
        }
        assert!(Trajectory::from_arrays(Array2::zeros((3, 2)), Array2::zeros((3, 2)), 1.0).is_err());
        assert!(Trajectory::from_arrays(Array2::zeros((0, 3)), Array2::zeros((0, 3)), 1.0).is_err());
        assert!(Trajectory::from_arrays(Array2::zeros((1, 3)), Array2::zeros((1, 3)), 0.0).is_err());
    }

    #[test]
    fn test_particle_state_speed() {
        let s = ParticleState::new([0.0; 3], [3.0, 4.0, 12.0]);
        assert!((s.speed_m_s() - 13.0).abs() < 1e-12);
        assert!(s.is_finite());
        let bad = ParticleState::new([f64::NAN, 0.0, 0.0], [0.0; 3]);
        assert!(!bad.is_finite());
    }
}
