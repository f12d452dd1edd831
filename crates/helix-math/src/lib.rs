//! Mathematical primitives for the SCPN Helix Tracker.

pub mod vector;
