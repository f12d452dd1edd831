// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Vacuum permeability (H/m), classical definition 4π × 10⁻⁷.
pub const MU0_SI: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// Elementary charge magnitude (C).
/// NOTE: rounded to four significant digits so reference runs reproduce exactly.
pub const Q_ELEMENTARY: f64 = 1.602e-19;

/// Electron rest mass (kg), same rounding as `Q_ELEMENTARY`.
pub const M_ELECTRON: f64 = 9.109e-31;

/// Immutable physical constants for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Elementary charge magnitude (C). The tracked particle carries `-e`.
    pub elementary_charge_c: f64,
    /// Tracked particle mass (kg).
    pub particle_mass_kg: f64,
    /// Vacuum permeability (H/m).
    pub vacuum_permeability: f64,
}

impl PhysicalConstants {
    /// Electron in SI units.
    pub const ELECTRON: PhysicalConstants = PhysicalConstants {
        elementary_charge_c: Q_ELEMENTARY,
        particle_mass_kg: M_ELECTRON,
        vacuum_permeability: MU0_SI,
    };

    /// Signed charge of the tracked particle (C).
    pub fn particle_charge_c(&self) -> f64 {
        -self.elementary_charge_c
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::ELECTRON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mu0_matches_classical_value() {
        assert!((MU0_SI - 1.256_637_061_4e-6).abs() < 1e-15);
    }

    #[test]
    fn test_electron_charge_is_negative() {
        let c = PhysicalConstants::default();
        assert_eq!(c.particle_charge_c(), -Q_ELEMENTARY);
        assert_eq!(c.particle_mass_kg, M_ELECTRON);
    }
}
