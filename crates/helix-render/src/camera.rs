//! Orthographic 3D axes: data limits, view rotation and pixel mapping.
//!
//! Data is normalised into a box with aspect 4:4:3, rotated by azimuth about z
//! and tilted by elevation, then scaled to fit a pixel viewport.

use helix_core::diagnostics::trajectory_extent;
use helix_core::scenario::ScenarioResult;
use helix_types::state::Vec3;
use tracing::warn;

/// Relative size of the x, y and z box edges.
pub const BOX_ASPECT: Vec3 = [1.0, 1.0, 0.75];

/// Padding of the x range beyond the final scattered position.
const X_PADDING: f64 = 1.1;
/// Padding of the transverse range beyond the widest helix excursion.
const TRANSVERSE_PADDING: f64 = 1.5;
/// Half-width used when a transverse range would be empty.
const FALLBACK_HALF_SPAN_M: f64 = 1.0;

/// Inclusive data range per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl AxisLimits {
    /// `x ∈ [0, 1.1·x_final]`, `y, z ∈ [−M, M]` with `M = 1.5·max(|y|, |z|)`
    /// taken over the scattered beam.
    pub fn for_scenario(result: &ScenarioResult) -> Self {
        let extent = trajectory_extent(&result.scattered);
        let x_end = extent.final_position_m[0] * X_PADDING;
        let mut x = (x_end.min(0.0), x_end.max(0.0));
        if x.1 - x.0 <= 0.0 {
            warn!("scattered beam has no axial extent, using unit x range");
            x = (-FALLBACK_HALF_SPAN_M, FALLBACK_HALF_SPAN_M);
        }
        let mut m = extent.max_abs_transverse_m * TRANSVERSE_PADDING;
        if m <= 0.0 {
            warn!("scattered beam has no transverse extent, using unit y/z range");
            m = FALLBACK_HALF_SPAN_M;
        }
        AxisLimits {
            x,
            y: (-m, m),
            z: (-m, m),
        }
    }

    pub fn ranges(&self) -> [(f64, f64); 3] {
        [self.x, self.y, self.z]
    }

    /// Map a data point into the centred, aspect-scaled box.
    pub fn normalize(&self, p: Vec3) -> Vec3 {
        let r = self.ranges();
        let mut out = [0.0; 3];
        for k in 0..3 {
            let (lo, hi) = r[k];
            out[k] = ((p[k] - lo) / (hi - lo) - 0.5) * BOX_ASPECT[k];
        }
        out
    }

    /// The eight box corners in data coordinates.
    pub fn corners(&self) -> [Vec3; 8] {
        let [x, y, z] = self.ranges();
        let mut out = [[0.0; 3]; 8];
        for (i, c) in out.iter_mut().enumerate() {
            *c = [
                if i & 1 == 0 { x.0 } else { x.1 },
                if i & 2 == 0 { y.0 } else { y.1 },
                if i & 4 == 0 { z.0 } else { z.1 },
            ];
        }
        out
    }
}

/// Elevation/azimuth view, degrees in the constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    pub elevation_rad: f64,
    pub azimuth_rad: f64,
}

impl ViewCamera {
    pub fn from_degrees(elevation_deg: f64, azimuth_deg: f64) -> Self {
        ViewCamera {
            elevation_rad: elevation_deg.to_radians(),
            azimuth_rad: azimuth_deg.to_radians(),
        }
    }

    /// Unit vector from the scene towards the viewer.
    pub fn view_direction(&self) -> Vec3 {
        let (se, ce) = self.elevation_rad.sin_cos();
        let (sa, ca) = self.azimuth_rad.sin_cos();
        [ce * ca, ce * sa, se]
    }

    /// Rotate a normalised point into screen axes (right, up).
    pub fn rotate(&self, n: Vec3) -> (f64, f64) {
        let (se, ce) = self.elevation_rad.sin_cos();
        let (sa, ca) = self.azimuth_rad.sin_cos();
        let right = -sa * n[0] + ca * n[1];
        let up = -se * ca * n[0] - se * sa * n[1] + ce * n[2];
        (right, up)
    }
}

/// Pixel rectangle the axes box is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

/// Data → pixel mapping for one figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub limits: AxisLimits,
    pub camera: ViewCamera,
    scale: f64,
    center_px: (f64, f64),
    center_screen: (f64, f64),
}

impl Projector {
    /// Fit the projected axes box into `viewport`, preserving aspect.
    pub fn fit(limits: AxisLimits, camera: ViewCamera, viewport: Viewport) -> Self {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in limits.corners() {
            let (u, v) = camera.rotate(limits.normalize(c));
            min = (min.0.min(u), min.1.min(v));
            max = (max.0.max(u), max.1.max(v));
        }
        let span_u = (max.0 - min.0).max(f64::EPSILON);
        let span_v = (max.1 - min.1).max(f64::EPSILON);
        let scale = (viewport.width / span_u).min(viewport.height / span_v);
        Projector {
            limits,
            camera,
            scale,
            center_px: (
                viewport.x0 + 0.5 * viewport.width,
                viewport.y0 + 0.5 * viewport.height,
            ),
            center_screen: (0.5 * (min.0 + max.0), 0.5 * (min.1 + max.1)),
        }
    }

    /// Pixel coordinates of a data point; y grows downwards.
    pub fn project(&self, p: Vec3) -> (f64, f64) {
        let (u, v) = self.camera.rotate(self.limits.normalize(p));
        (
            self.center_px.0 + (u - self.center_screen.0) * self.scale,
            self.center_px.1 - (v - self.center_screen.1) * self.scale,
        )
    }
}
