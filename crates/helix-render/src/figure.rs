// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — Figure Composition
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Static trajectory figure and single animation frames.
//!
//! Widths are given in points and converted with the figure's dpi.
//! Scattered beam: blue, solid. Collimated beam: purple, dashed.
//! Titles and labels use the bundled DejaVu Sans.

use crate::camera::{AxisLimits, Projector, ViewCamera, Viewport};
use crate::canvas::{text_width, Canvas, Color, Point, StrokeStyle};
use ab_glyph::FontRef;
use helix_core::field::UniformField;
use helix_core::scenario::ScenarioResult;
use helix_math::vector::{add, scale};
use helix_types::config::RenderConfig;
use helix_types::error::{HelixError, HelixResult};
use helix_types::state::{Trajectory, Vec3};
use image::{ImageFormat, RgbaImage};
use ndarray::{Array1, ArrayView2};
use std::path::Path;
use tracing::info;

/// Glow passes under the static lines, widest first.
pub const GLOW_WIDTHS_PT: [f64; 4] = [4.0, 2.5, 1.5, 1.0];
const STATIC_GLOW_ALPHA: f64 = 0.3;
const STATIC_SCATTERED_WIDTH_PT: f64 = 1.2;
const STATIC_COLLIMATED_WIDTH_PT: f64 = 1.3;
const STATIC_MARKER_AREA_PT2: f64 = 80.0;

const FRAME_GLOW_WIDTH_PT: f64 = 2.0;
const FRAME_SCATTERED_GLOW_ALPHA: f64 = 0.35;
const FRAME_COLLIMATED_GLOW_ALPHA: f64 = 0.30;
const FRAME_LINE_WIDTH_PT: f64 = 1.2;
const FRAME_MARKER_AREA_PT2: f64 = 60.0;

/// Field arrows: 8 stations along x, 3×3 across the inner 60 % of y/z.
const ARROW_STATIONS_X: usize = 8;
const ARROW_STATIONS_YZ: usize = 3;
const ARROW_SPREAD: f64 = 0.6;
const ARROW_LENGTH_FRACTION: f64 = 0.02;
const ARROW_HEAD_RATIO: f64 = 0.05;
const ARROW_ALPHA: f64 = 0.6;
const ARROW_WIDTH_PT: f64 = 1.0;
const LEGEND_FIELD_WIDTH_PT: f64 = 1.5;

const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const STATIC_TITLE: &str = "Trayectorias de Electrones colimados";
const FRAME_TITLE: &str = "Evolución temporal de las trayectorias";
const AXIS_LABELS: [&str; 3] = ["Eje x (B)", "Eje y", "Eje z"];
const FIELD_LABEL: &str = "Campo magnético paralelo al eje x";

const TITLE_SIZE_PT: f64 = 15.0;
const TITLE_BASELINE_PT: f64 = 20.0;
const AXIS_LABEL_SIZE_PT: f64 = 10.0;
const AXIS_LABEL_OFFSET_PT: f64 = 18.0;

const LEGEND_TOP_PT: f64 = 30.0;
const LEGEND_ROW_PT: f64 = 16.0;
const LEGEND_PAD_PT: f64 = 6.0;
const LEGEND_SWATCH_PT: f64 = 28.0;
const LEGEND_GAP_PT: f64 = 6.0;
const LEGEND_TEXT_PT: f64 = 9.0;

const TICKS_PER_AXIS: usize = 5;
const GRID_WIDTH_PT: f64 = 0.8;

/// Dash pattern of a dashed line, in multiples of its width.
const DASH_ON: f64 = 3.7;
const DASH_OFF: f64 = 1.6;

/// Shared projection and unit scale of one figure.
pub struct Scene {
    pub projector: Projector,
    pub px_per_pt: f64,
    width: u32,
    height: u32,
    font: FontRef<'static>,
}

impl Scene {
    pub fn new(limits: AxisLimits, camera: ViewCamera, size_px: [u32; 2], dpi: f64) -> HelixResult<Self> {
        let font = FontRef::try_from_slice(FONT_BYTES)
            .map_err(|e| HelixError::Render(format!("bundled font: {e}")))?;
        let (w, h) = (size_px[0] as f64, size_px[1] as f64);
        let viewport = Viewport {
            x0: 0.08 * w,
            y0: 0.10 * h,
            width: 0.84 * w,
            height: 0.82 * h,
        };
        Ok(Scene {
            projector: Projector::fit(limits, camera, viewport),
            px_per_pt: dpi / 72.0,
            width: size_px[0],
            height: size_px[1],
            font,
        })
    }

    fn pt(&self, points: f64) -> f64 {
        points * self.px_per_pt
    }

    fn project_rows(&self, rows: ArrayView2<'_, f64>) -> Vec<Point> {
        rows.outer_iter()
            .map(|r| self.projector.project([r[0], r[1], r[2]]))
            .collect()
    }

    fn marker_radius(&self, area_pt2: f64) -> f64 {
        0.5 * self.pt(area_pt2.sqrt())
    }

    fn solid(&self, color: Color, width_pt: f64, alpha: f64) -> StrokeStyle {
        StrokeStyle::solid(color, self.pt(width_pt), alpha)
    }

    fn dashed(&self, color: Color, width_pt: f64, alpha: f64) -> StrokeStyle {
        let w = self.pt(width_pt);
        StrokeStyle::dashed(color, w, alpha, DASH_ON * w, DASH_OFF * w)
    }

    /// Back panes with tick grid lines and pane edges.
    fn draw_axes(&self, canvas: &mut Canvas) {
        let limits = self.projector.limits;
        let view = self.projector.camera.view_direction();
        let ranges = limits.ranges();
        let grid = self.solid(Color::GRID, GRID_WIDTH_PT, 1.0);
        let edge = self.solid(Color::EDGE, GRID_WIDTH_PT, 1.0);

        for axis in 0..3 {
            // Back pane: the side of the box away from the viewer.
            let fixed = if view[axis] > 0.0 {
                ranges[axis].0
            } else {
                ranges[axis].1
            };
            let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
            let corner = |ua: f64, ub: f64| {
                let mut p: Vec3 = [0.0; 3];
                p[axis] = fixed;
                p[a] = ua;
                p[b] = ub;
                self.projector.project(p)
            };
            let (ra, rb) = (ranges[a], ranges[b]);
            let quad = [
                corner(ra.0, rb.0),
                corner(ra.1, rb.0),
                corner(ra.1, rb.1),
                corner(ra.0, rb.1),
            ];
            canvas.fill_convex_polygon(&quad, Color::PANE, 1.0);

            for t in Array1::linspace(ra.0, ra.1, TICKS_PER_AXIS).iter() {
                canvas.draw_polyline(&[corner(*t, rb.0), corner(*t, rb.1)], &grid);
            }
            for t in Array1::linspace(rb.0, rb.1, TICKS_PER_AXIS).iter() {
                canvas.draw_polyline(&[corner(ra.0, *t), corner(ra.1, *t)], &grid);
            }
            let mut outline = quad.to_vec();
            outline.push(quad[0]);
            canvas.draw_polyline(&outline, &edge);
        }
    }

    /// Centred title along the top edge.
    fn draw_title(&self, canvas: &mut Canvas, title: &str) {
        let size = self.pt(TITLE_SIZE_PT);
        let x = 0.5 * (self.width as f64 - text_width(&self.font, title, size));
        canvas.draw_text(&self.font, title, (x, self.pt(TITLE_BASELINE_PT)), size, Color::BLACK);
    }

    /// Axis names beside the box edge that runs along each axis: the lowest
    /// on screen for x and y, the leftmost for z.
    fn draw_axis_labels(&self, canvas: &mut Canvas) {
        let ranges = self.projector.limits.ranges();
        let centre = self.projector.project(ranges.map(|(lo, hi)| 0.5 * (lo + hi)));
        let size = self.pt(AXIS_LABEL_SIZE_PT);
        for (axis, label) in AXIS_LABELS.iter().enumerate() {
            let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
            let mut best: Option<Point> = None;
            for ua in [ranges[a].0, ranges[a].1] {
                for ub in [ranges[b].0, ranges[b].1] {
                    let mut p: Vec3 = [0.0; 3];
                    p[axis] = 0.5 * (ranges[axis].0 + ranges[axis].1);
                    p[a] = ua;
                    p[b] = ub;
                    let m = self.projector.project(p);
                    let better = match best {
                        None => true,
                        Some(q) if axis == 2 => m.0 < q.0,
                        Some(q) => m.1 > q.1,
                    };
                    if better {
                        best = Some(m);
                    }
                }
            }
            let Some(mid) = best else {
                continue;
            };
            let (dx, dy) = (mid.0 - centre.0, mid.1 - centre.1);
            let len = dx.hypot(dy);
            let (ux, uy) = if len > 0.0 { (dx / len, dy / len) } else { (0.0, 1.0) };
            let off = self.pt(AXIS_LABEL_OFFSET_PT);
            let (cx, cy) = (mid.0 + ux * off, mid.1 + uy * off);
            let x = cx - 0.5 * text_width(&self.font, label, size);
            canvas.draw_text(&self.font, label, (x, cy + 0.35 * size), size, Color::BLACK);
        }
    }

    /// 8×3×3 grid of arrows along the field direction.
    fn draw_field_arrows(&self, canvas: &mut Canvas, field: &UniformField, x_end: f64) {
        let Some(dir) = field.direction() else {
            return;
        };
        let m = self.projector.limits.y.1;
        let step = scale(dir, x_end.abs() * ARROW_LENGTH_FRACTION);
        let style = self.solid(Color::DARK_GREEN, ARROW_WIDTH_PT, ARROW_ALPHA);
        let xs = Array1::linspace(0.0, x_end, ARROW_STATIONS_X);
        let ts = Array1::linspace(-m * ARROW_SPREAD, m * ARROW_SPREAD, ARROW_STATIONS_YZ);
        for &x in xs.iter() {
            for &y in ts.iter() {
                for &z in ts.iter() {
                    let base = [x, y, z];
                    let tail = self.projector.project(base);
                    let tip = self.projector.project(add(base, step));
                    let shaft = (tip.0 - tail.0).hypot(tip.1 - tail.1);
                    let head = (shaft * ARROW_HEAD_RATIO).max(self.pt(1.5));
                    canvas.draw_arrow(tail, tip, head, &style);
                }
            }
        }
    }

    /// Top-left corner of the legend box, just under the title.
    fn legend_corner(&self) -> Point {
        (0.04 * self.width as f64, self.pt(LEGEND_TOP_PT))
    }

    /// Upper-left legend box: a swatch and a label per entry.
    fn draw_legend(&self, canvas: &mut Canvas, entries: &[(LegendEntry, &str)]) {
        let row = self.pt(LEGEND_ROW_PT);
        let pad = self.pt(LEGEND_PAD_PT);
        let swatch = self.pt(LEGEND_SWATCH_PT);
        let gap = self.pt(LEGEND_GAP_PT);
        let text = self.pt(LEGEND_TEXT_PT);
        let label_w = entries
            .iter()
            .map(|(_, label)| text_width(&self.font, label, text))
            .fold(0.0, f64::max);
        let (x0, y0) = self.legend_corner();
        let x1 = x0 + 2.0 * pad + swatch + gap + label_w;
        let y1 = y0 + 2.0 * pad + row * entries.len() as f64;
        let frame = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        canvas.fill_convex_polygon(&frame, Color::WHITE, 0.8);
        canvas.draw_polyline(
            &[frame[0], frame[1], frame[2], frame[3], frame[0]],
            &self.solid(Color::GRID, 1.0, 1.0),
        );
        for (i, (entry, label)) in entries.iter().enumerate() {
            let cy = y0 + pad + row * (i as f64 + 0.5);
            let (sx0, sx1) = (x0 + pad, x0 + pad + swatch);
            match *entry {
                LegendEntry::Line(style) => canvas.draw_polyline(&[(sx0, cy), (sx1, cy)], &style),
                LegendEntry::Marker(color, radius) => {
                    canvas.fill_circle((0.5 * (sx0 + sx1), cy), radius, color, 1.0)
                }
            }
            canvas.draw_text(&self.font, label, (sx1 + gap, cy + 0.35 * text), text, Color::BLACK);
        }
    }

    fn draw_marker(&self, canvas: &mut Canvas, traj: &Trajectory, index: usize, color: Color, area_pt2: f64) {
        if let Ok(p) = traj.position(index) {
            canvas.fill_circle(self.projector.project(p), self.marker_radius(area_pt2), color, 1.0);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LegendEntry {
    Line(StrokeStyle),
    Marker(Color, f64),
}

fn scene_for(
    result: &ScenarioResult,
    render: &RenderConfig,
    size_px: [u32; 2],
    dpi: f64,
) -> HelixResult<Scene> {
    Scene::new(
        AxisLimits::for_scenario(result),
        ViewCamera::from_degrees(render.elevation_deg, render.azimuth_deg),
        size_px,
        dpi,
    )
}

/// Full-length trajectories with glow, end markers, field arrows, labels and legend.
pub fn render_static_figure(result: &ScenarioResult, render: &RenderConfig) -> HelixResult<RgbaImage> {
    let scene = scene_for(result, render, render.static_size_px, render.static_dpi)?;
    let mut canvas = Canvas::new(render.static_size_px[0], render.static_size_px[1], Color::WHITE);
    scene.draw_axes(&mut canvas);
    scene.draw_axis_labels(&mut canvas);

    scene.draw_field_arrows(&mut canvas, &result.field, result.scattered.last().position_m[0]);

    let scattered = scene.project_rows(result.scattered.positions());
    for w in GLOW_WIDTHS_PT {
        canvas.draw_polyline(&scattered, &scene.solid(Color::BLUE, w, STATIC_GLOW_ALPHA));
    }
    let scattered_line = scene.solid(Color::BLUE, STATIC_SCATTERED_WIDTH_PT, 1.0);
    canvas.draw_polyline(&scattered, &scattered_line);

    let collimated = scene.project_rows(result.collimated.positions());
    for w in GLOW_WIDTHS_PT {
        canvas.draw_polyline(&collimated, &scene.solid(Color::PURPLE, w, STATIC_GLOW_ALPHA));
    }
    let collimated_line = scene.dashed(Color::PURPLE, STATIC_COLLIMATED_WIDTH_PT, 1.0);
    canvas.draw_polyline(&collimated, &collimated_line);

    let last = result.scattered.len() - 1;
    scene.draw_marker(&mut canvas, &result.scattered, last, Color::RED, STATIC_MARKER_AREA_PT2);
    let last = result.collimated.len() - 1;
    scene.draw_marker(&mut canvas, &result.collimated, last, Color::YELLOW, STATIC_MARKER_AREA_PT2);

    scene.draw_legend(
        &mut canvas,
        &[
            (LegendEntry::Line(scattered_line), "Electrón disperso en varias direcciones"),
            (LegendEntry::Line(collimated_line), "Electrón que no se dispersa"),
            (
                LegendEntry::Line(scene.solid(Color::DARK_GREEN, LEGEND_FIELD_WIDTH_PT, 1.0)),
                FIELD_LABEL,
            ),
        ],
    );
    scene.draw_title(&mut canvas, STATIC_TITLE);
    Ok(canvas.into_image())
}

/// One animation frame showing both beams up to `k` samples.
pub fn render_frame(scene: &Scene, result: &ScenarioResult, k: usize) -> RgbaImage {
    let mut canvas = Canvas::new(scene.width, scene.height, Color::WHITE);
    scene.draw_axes(&mut canvas);
    scene.draw_axis_labels(&mut canvas);

    let scattered = scene.project_rows(result.scattered.position_prefix(k));
    canvas.draw_polyline(
        &scattered,
        &scene.solid(Color::BLUE, FRAME_GLOW_WIDTH_PT, FRAME_SCATTERED_GLOW_ALPHA),
    );
    canvas.draw_polyline(&scattered, &scene.solid(Color::BLUE, FRAME_LINE_WIDTH_PT, 1.0));

    let collimated = scene.project_rows(result.collimated.position_prefix(k));
    canvas.draw_polyline(
        &collimated,
        &scene.solid(Color::PURPLE, FRAME_GLOW_WIDTH_PT, FRAME_COLLIMATED_GLOW_ALPHA),
    );
    canvas.draw_polyline(&collimated, &scene.dashed(Color::PURPLE, FRAME_LINE_WIDTH_PT, 1.0));

    let head = k.max(1) - 1;
    scene.draw_marker(&mut canvas, &result.scattered, head, Color::RED, FRAME_MARKER_AREA_PT2);
    scene.draw_marker(&mut canvas, &result.collimated, head, Color::YELLOW, FRAME_MARKER_AREA_PT2);

    let marker = scene.marker_radius(FRAME_MARKER_AREA_PT2);
    scene.draw_legend(
        &mut canvas,
        &[
            (LegendEntry::Marker(Color::RED, marker), "Electrón disperso"),
            (LegendEntry::Marker(Color::YELLOW, marker), "Electrón no disperso"),
            (
                LegendEntry::Line(scene.solid(Color::DARK_GREEN, LEGEND_FIELD_WIDTH_PT, 1.0)),
                FIELD_LABEL,
            ),
        ],
    );
    scene.draw_title(&mut canvas, FRAME_TITLE);
    canvas.into_image()
}

/// Scene for animation frames of `result`.
pub fn frame_scene(result: &ScenarioResult, render: &RenderConfig) -> HelixResult<Scene> {
    scene_for(result, render, render.frame_size_px, render.frame_dpi)
}

/// Render the static figure and save it as PNG.
pub fn write_static_figure(
    result: &ScenarioResult,
    render: &RenderConfig,
    path: &Path,
) -> HelixResult<()> {
    let image = render_static_figure(result, render)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| HelixError::Render(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), "static figure written");
    Ok(())
}
