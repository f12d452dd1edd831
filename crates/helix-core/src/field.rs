// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Helmholtz Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Uniform magnetic field between a Helmholtz coil pair.
//!
//! The field at the midpoint of two coaxial coils of radius R separated by R is
//!
//!   B0 = (8 / (5·√5)) · μ₀ · N · I / R
//!
//! and is treated as uniform and directed along +x over the tracking volume.

use helix_math::vector::{decompose, norm, normalize};
use helix_types::config::CoilConfig;
use helix_types::error::{HelixError, HelixResult};
use helix_types::state::Vec3;
use std::f64::consts::PI;

/// Geometric factor 8 / (5·√5) of the Helmholtz midpoint field.
pub fn helmholtz_factor() -> f64 {
    8.0 / (5.0 * 5.0_f64.sqrt())
}

/// On-axis midpoint field magnitude [T] of a Helmholtz pair.
///
/// `B0 = (8 / (5·√5)) · μ₀ · N · I / R`.
pub fn helmholtz_axial_field(radius_m: f64, turns: u32, current_a: f64, mu0: f64) -> HelixResult<f64> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(HelixError::ConfigError(format!(
            "coil radius must be finite and > 0, got {radius_m}"
        )));
    }
    if turns == 0 {
        return Err(HelixError::ConfigError(
            "coil turns must be >= 1".to_string(),
        ));
    }
    if !current_a.is_finite() {
        return Err(HelixError::ConfigError(format!(
            "coil current must be finite, got {current_a}"
        )));
    }
    if !mu0.is_finite() || mu0 <= 0.0 {
        return Err(HelixError::ConfigError(format!(
            "vacuum permeability mu0 must be finite and > 0, got {mu0}"
        )));
    }
    Ok(helmholtz_factor() * mu0 * turns as f64 * current_a / radius_m)
}

/// Spatially uniform, static magnetic field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformField {
    pub b_t: Vec3,
}

impl UniformField {
    /// Field `(B0, 0, 0)` of the given coil pair.
    pub fn from_coil(coil: &CoilConfig, mu0: f64) -> HelixResult<Self> {
        let b0 = helmholtz_axial_field(coil.radius_m, coil.turns, coil.current_a, mu0)?;
        Ok(UniformField {
            b_t: [b0, 0.0, 0.0],
        })
    }

    /// |B| [T].
    pub fn magnitude_t(&self) -> f64 {
        norm(self.b_t)
    }

    /// Unit vector along B, `None` for a zero field.
    pub fn direction(&self) -> Option<Vec3> {
        normalize(self.b_t)
    }

    /// Split a velocity into (parallel, perpendicular) components w.r.t. B.
    /// A zero field has no preferred axis, so everything counts as parallel.
    pub fn split_velocity(&self, v: Vec3) -> (Vec3, Vec3) {
        match self.direction() {
            Some(dir) => decompose(v, dir),
            None => (v, [0.0, 0.0, 0.0]),
        }
    }
}

/// Cyclotron angular frequency [rad/s].
///
/// `ωc = |q| · |B| / m`.
pub fn cyclotron_frequency(charge_c: f64, mass_kg: f64, b_t: f64) -> f64 {
    if mass_kg <= 0.0 {
        return 0.0;
    }
    charge_c.abs() * b_t.abs() / mass_kg
}

/// Gyration period [s]; infinite without a field.
///
/// `T = 2π / ωc`.
pub fn cyclotron_period(charge_c: f64, mass_kg: f64, b_t: f64) -> f64 {
    let omega = cyclotron_frequency(charge_c, mass_kg, b_t);
    if omega <= 0.0 {
        return f64::INFINITY;
    }
    2.0 * PI / omega
}

/// Larmor (gyro) radius [m].
///
/// `r_L = v⊥ / ωc`.
pub fn larmor_radius(v_perp_m_s: f64, charge_c: f64, mass_kg: f64, b_t: f64) -> f64 {
    let omega = cyclotron_frequency(charge_c, mass_kg, b_t);
    if omega <= 0.0 {
        return f64::INFINITY;
    }
    v_perp_m_s.abs() / omega
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_types::constants::{M_ELECTRON, MU0_SI, Q_ELEMENTARY};

    #[test]
    fn test_reference_coil_field_matches_closed_form() {
        let b0 = helmholtz_axial_field(0.20, 320, 1.5, MU0_SI).unwrap();
        let independent = 8.0 * (4.0 * PI * 1e-7) * 320.0 * 1.5 / (5.0 * 5.0_f64.sqrt() * 0.20);
        assert!(
            ((b0 - independent) / independent).abs() < 1e-14,
            "b0={b0}, closed form={independent}"
        );
        assert!((b0 - 2.158e-3).abs() < 1e-6, "b0={b0}");
    }

    #[test]
    fn test_field_points_along_x() {
        let field = UniformField::from_coil(&CoilConfig::default(), MU0_SI).unwrap();
        assert!(field.b_t[0] > 0.0);
        assert_eq!(field.b_t[1], 0.0);
        assert_eq!(field.b_t[2], 0.0);
        assert_eq!(field.direction(), Some([1.0, 0.0, 0.0]));
        assert!((field.magnitude_t() - field.b_t[0]).abs() < 1e-18);
    }

    #[test]
    fn test_field_scales_linearly_with_current_and_turns() {
        let b1 = helmholtz_axial_field(0.2, 100, 1.0, MU0_SI).unwrap();
        let b2 = helmholtz_axial_field(0.2, 200, 1.0, MU0_SI).unwrap();
        let b3 = helmholtz_axial_field(0.2, 100, 3.0, MU0_SI).unwrap();
        let b4 = helmholtz_axial_field(0.4, 100, 1.0, MU0_SI).unwrap();
        assert!((b2 / b1 - 2.0).abs() < 1e-12);
        assert!((b3 / b1 - 3.0).abs() < 1e-12);
        assert!((b1 / b4 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_coil() {
        for bad_r in [0.0, -0.1, f64::NAN] {
            match helmholtz_axial_field(bad_r, 320, 1.5, MU0_SI) {
                Err(HelixError::ConfigError(msg)) => assert!(msg.contains("radius")),
                other => panic!("Unexpected result: {other:?}"),
            }
        }
        assert!(helmholtz_axial_field(0.2, 0, 1.5, MU0_SI).is_err());
        assert!(helmholtz_axial_field(0.2, 320, f64::INFINITY, MU0_SI).is_err());
        assert!(helmholtz_axial_field(0.2, 320, 1.5, 0.0).is_err());
    }

    #[test]
    fn test_cyclotron_scales_for_reference_electron() {
        let b0 = helmholtz_axial_field(0.20, 320, 1.5, MU0_SI).unwrap();
        let omega = cyclotron_frequency(-Q_ELEMENTARY, M_ELECTRON, b0);
        assert!((omega - 3.795e8).abs() / 3.795e8 < 1e-3, "omega={omega}");
        let period = cyclotron_period(-Q_ELEMENTARY, M_ELECTRON, b0);
        assert!((period - 1.6555e-8).abs() / 1.6555e-8 < 1e-3);
        let v_perp = (2e6_f64.powi(2) + 1e6_f64.powi(2)).sqrt();
        let r_l = larmor_radius(v_perp, -Q_ELEMENTARY, M_ELECTRON, b0);
        assert!((r_l - 5.89e-3).abs() < 1e-5, "r_L={r_l}");
    }

    #[test]
    fn test_zero_field_limits() {
        assert_eq!(cyclotron_frequency(1.0, 1.0, 0.0), 0.0);
        assert!(cyclotron_period(1.0, 1.0, 0.0).is_infinite());
        assert!(larmor_radius(1.0, 1.0, 1.0, 0.0).is_infinite());
        let zero = UniformField { b_t: [0.0; 3] };
        assert!(zero.direction().is_none());
        assert_eq!(zero.split_velocity([1.0, 2.0, 3.0]).0, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_split_velocity_of_scattered_beam() {
        let field = UniformField::from_coil(&CoilConfig::default(), MU0_SI).unwrap();
        let (par, perp) = field.split_velocity([2e7, 2e6, 1e6]);
        assert_eq!(par, [2e7, 0.0, 0.0]);
        assert_eq!(perp, [0.0, 2e6, 1e6]);
    }
}
