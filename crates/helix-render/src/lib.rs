// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Rendering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Headless rendering of beam trajectories.
//!
//! `camera` maps data coordinates to pixels, `canvas` rasterises strokes and
//! markers, `figure` composes the static plot and animation frames, and
//! `animation` streams frames into a looping GIF.

pub mod animation;
pub mod camera;
pub mod canvas;
pub mod figure;
