// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::PhysicalConstants;
use crate::error::{HelixError, HelixResult};
use crate::state::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level run configuration.
/// Every section defaults to the reference electron-beam run, so an empty
/// JSON object `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub physics: PhysicalConstants,
    #[serde(default)]
    pub coil: CoilConfig,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    #[serde(default)]
    pub beams: BeamConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Helmholtz coil pair geometry and drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoilConfig {
    /// Coil radius R (m).
    pub radius_m: f64,
    /// Turns per coil N.
    pub turns: u32,
    /// Coil current I (A).
    pub current_a: f64,
}

impl Default for CoilConfig {
    fn default() -> Self {
        CoilConfig {
            radius_m: 0.20,
            turns: 320,
            current_a: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Fixed time step Δt (s).
    pub dt_s: f64,
    /// Number of stored samples, initial condition included.
    pub steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            dt_s: 1e-11,
            steps: 20_000,
        }
    }
}

/// Initial conditions of the two electron beams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Shared starting point (m).
    pub origin_m: Vec3,
    /// Scattered beam: parallel plus transverse components (m/s).
    pub scattered_velocity_m_s: Vec3,
    /// Collimated beam: purely parallel to the field (m/s).
    pub collimated_velocity_m_s: Vec3,
}

impl Default for BeamConfig {
    fn default() -> Self {
        BeamConfig {
            origin_m: [0.0, 0.0, 0.0],
            scattered_velocity_m_s: [2e7, 2e6, 1e6],
            collimated_velocity_m_s: [2e7, 0.0, 0.0],
        }
    }
}

/// Figure and animation layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Static figure size [width, height] in pixels.
    #[serde(default = "default_static_size")]
    pub static_size_px: [u32; 2],
    /// Pixels per inch of the static figure, used to scale point widths.
    #[serde(default = "default_static_dpi")]
    pub static_dpi: f64,
    /// Animation frame size [width, height] in pixels.
    #[serde(default = "default_frame_size")]
    pub frame_size_px: [u32; 2],
    #[serde(default = "default_frame_dpi")]
    pub frame_dpi: f64,
    #[serde(default = "default_num_frames")]
    pub num_frames: usize,
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,
    /// Camera elevation above the x-y plane (degrees).
    #[serde(default = "default_elevation")]
    pub elevation_deg: f64,
    /// Camera azimuth around the z axis (degrees).
    #[serde(default = "default_azimuth")]
    pub azimuth_deg: f64,
}

fn default_static_size() -> [u32; 2] {
    [1200, 1600]
}
fn default_static_dpi() -> f64 {
    100.0
}
fn default_frame_size() -> [u32; 2] {
    [900, 1080]
}
fn default_frame_dpi() -> f64 {
    90.0
}
fn default_num_frames() -> usize {
    150
}
fn default_frame_delay_ms() -> u32 {
    40
}
fn default_elevation() -> f64 {
    20.0
}
fn default_azimuth() -> f64 {
    -60.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            static_size_px: default_static_size(),
            static_dpi: default_static_dpi(),
            frame_size_px: default_frame_size(),
            frame_dpi: default_frame_dpi(),
            num_frames: default_num_frames(),
            frame_delay_ms: default_frame_delay_ms(),
            elevation_deg: default_elevation(),
            azimuth_deg: default_azimuth(),
        }
    }
}

fn require_finite_vec(v: &Vec3, label: &str) -> HelixResult<()> {
    if v.iter().any(|c| !c.is_finite()) {
        return Err(HelixError::ConfigError(format!(
            "{label} components must be finite, got {v:?}"
        )));
    }
    Ok(())
}

impl SimulationConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn from_file(path: &str) -> HelixResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Reject configurations the integrator or renderer cannot run.
    pub fn validate(&self) -> HelixResult<()> {
        let p = &self.physics;
        if !p.elementary_charge_c.is_finite() || p.elementary_charge_c <= 0.0 {
            return Err(HelixError::ConfigError(format!(
                "physics.elementary_charge_c must be finite and > 0, got {}",
                p.elementary_charge_c
            )));
        }
        if !p.particle_mass_kg.is_finite() || p.particle_mass_kg <= 0.0 {
            return Err(HelixError::ConfigError(format!(
                "physics.particle_mass_kg must be finite and > 0, got {}",
                p.particle_mass_kg
            )));
        }
        if !p.vacuum_permeability.is_finite() || p.vacuum_permeability <= 0.0 {
            return Err(HelixError::ConfigError(format!(
                "physics.vacuum_permeability must be finite and > 0, got {}",
                p.vacuum_permeability
            )));
        }

        let c = &self.coil;
        if !c.radius_m.is_finite() || c.radius_m <= 0.0 {
            return Err(HelixError::ConfigError(format!(
                "coil.radius_m must be finite and > 0, got {}",
                c.radius_m
            )));
        }
        if c.turns == 0 {
            return Err(HelixError::ConfigError(
                "coil.turns must be >= 1".to_string(),
            ));
        }
        if !c.current_a.is_finite() {
            return Err(HelixError::ConfigError(format!(
                "coil.current_a must be finite, got {}",
                c.current_a
            )));
        }

        let i = &self.integrator;
        if !i.dt_s.is_finite() || i.dt_s <= 0.0 {
            return Err(HelixError::ConfigError(format!(
                "integrator.dt_s must be finite and > 0, got {}",
                i.dt_s
            )));
        }
        if i.steps == 0 {
            return Err(HelixError::ConfigError(
                "integrator.steps must be >= 1".to_string(),
            ));
        }

        require_finite_vec(&self.beams.origin_m, "beams.origin_m")?;
        require_finite_vec(
            &self.beams.scattered_velocity_m_s,
            "beams.scattered_velocity_m_s",
        )?;
        require_finite_vec(
            &self.beams.collimated_velocity_m_s,
            "beams.collimated_velocity_m_s",
        )?;
        // The coil field lies along +x, so the collimated beam may only move along x.
        let [_, vy, vz] = self.beams.collimated_velocity_m_s;
        if vy != 0.0 || vz != 0.0 {
            return Err(HelixError::ConfigError(format!(
                "beams.collimated_velocity_m_s must be parallel to the x-directed field, \
                 got transverse components ({vy}, {vz})"
            )));
        }

        let r = &self.render;
        for (label, size) in [
            ("render.static_size_px", r.static_size_px),
            ("render.frame_size_px", r.frame_size_px),
        ] {
            if size[0] < 16 || size[1] < 16 {
                return Err(HelixError::ConfigError(format!(
                    "{label} must be at least 16x16, got {}x{}",
                    size[0], size[1]
                )));
            }
        }
        for (label, dpi) in [
            ("render.static_dpi", r.static_dpi),
            ("render.frame_dpi", r.frame_dpi),
        ] {
            if !dpi.is_finite() || dpi <= 0.0 {
                return Err(HelixError::ConfigError(format!(
                    "{label} must be finite and > 0, got {dpi}"
                )));
            }
        }
        if r.num_frames == 0 || r.num_frames > i.steps {
            return Err(HelixError::ConfigError(format!(
                "render.num_frames must be in [1, {}], got {}",
                i.steps, r.num_frames
            )));
        }
        if !r.elevation_deg.is_finite() || !r.azimuth_deg.is_finite() {
            return Err(HelixError::ConfigError(
                "render camera angles must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
