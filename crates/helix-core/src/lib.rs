//! Field setup and trajectory integration for electrons in a Helmholtz coil.
//!
//! `field` builds the uniform axial field, `pusher` advances particles,
//! `scenario` runs the scattered/collimated beam pair and `diagnostics`
//! measures integrator drift.

pub mod diagnostics;
pub mod field;
pub mod pusher;
pub mod scenario;
