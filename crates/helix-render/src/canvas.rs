//! Anti-aliased stroke and fill rasteriser over an RGBA image.
//!
//! Each drawing call accumulates coverage into a scratch mask (max, not sum)
//! and composites it once, so a translucent stroke keeps a uniform opacity
//! where its own segments overlap. Glyph coverage from `ab_glyph` goes
//! through the same mask.

use ab_glyph::{point, Font, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

/// Opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
    pub const PANE: Color = Color::rgb(242, 242, 242);
    pub const GRID: Color = Color::rgb(204, 204, 204);
    pub const EDGE: Color = Color::rgb(128, 128, 128);
}

/// Line appearance in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width_px: f64,
    pub alpha: f64,
    /// `(on, off)` dash lengths; `None` draws a solid line.
    pub dash_px: Option<(f64, f64)>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width_px: f64, alpha: f64) -> Self {
        StrokeStyle {
            color,
            width_px,
            alpha,
            dash_px: None,
        }
    }

    pub fn dashed(color: Color, width_px: f64, alpha: f64, on_px: f64, off_px: f64) -> Self {
        StrokeStyle {
            color,
            width_px,
            alpha,
            dash_px: Some((on_px, off_px)),
        }
    }
}

pub type Point = (f64, f64);

/// Points closer than this to the previous kept point are dropped.
const MIN_POINT_SPACING_PX: f64 = 0.35;

#[derive(Debug, Clone, Copy)]
struct PixelBox {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

pub struct Canvas {
    image: RgbaImage,
    mask: Vec<f32>,
    dirty: Option<PixelBox>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let fill = Rgba([background.r, background.g, background.b, 255]);
        Canvas {
            image: RgbaImage::from_pixel(width, height, fill),
            mask: vec![0.0; (width as usize) * (height as usize)],
            dirty: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn draw_polyline(&mut self, points: &[Point], style: &StrokeStyle) {
        self.stroke_into_mask(points, style);
        self.composite(style.color, style.alpha);
    }

    /// Straight arrow from `tail` to `tip` with two barbs of `head_px`.
    pub fn draw_arrow(&mut self, tail: Point, tip: Point, head_px: f64, style: &StrokeStyle) {
        let dx = tip.0 - tail.0;
        let dy = tip.1 - tail.1;
        let len = (dx * dx + dy * dy).sqrt();
        self.stroke_into_mask(&[tail, tip], style);
        if len > 0.0 && head_px > 0.0 {
            let (ux, uy) = (-dx / len, -dy / len);
            let (s, c) = 25.0_f64.to_radians().sin_cos();
            for sign in [-1.0, 1.0] {
                let bx = ux * c - sign * uy * s;
                let by = sign * ux * s + uy * c;
                let barb = (tip.0 + bx * head_px, tip.1 + by * head_px);
                self.stroke_into_mask(&[tip, barb], style);
            }
        }
        self.composite(style.color, style.alpha);
    }

    pub fn fill_circle(&mut self, center: Point, radius_px: f64, color: Color, alpha: f64) {
        let Some(bbox) = self.clip_box(
            center.0 - radius_px - 1.0,
            center.1 - radius_px - 1.0,
            center.0 + radius_px + 1.0,
            center.1 + radius_px + 1.0,
        ) else {
            return;
        };
        for y in bbox.y0..=bbox.y1 {
            for x in bbox.x0..=bbox.x1 {
                let dx = x as f64 + 0.5 - center.0;
                let dy = y as f64 + 0.5 - center.1;
                let cov = (radius_px + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                self.cover(x, y, cov);
            }
        }
        self.mark_dirty(bbox);
        self.composite(color, alpha);
    }

    /// Fill a convex polygon given in either winding order.
    pub fn fill_convex_polygon(&mut self, points: &[Point], color: Color, alpha: f64) {
        if points.len() < 3 {
            return;
        }
        let (mut lo, mut hi) = ((f64::INFINITY, f64::INFINITY), (f64::NEG_INFINITY, f64::NEG_INFINITY));
        for p in points {
            lo = (lo.0.min(p.0), lo.1.min(p.1));
            hi = (hi.0.max(p.0), hi.1.max(p.1));
        }
        let Some(bbox) = self.clip_box(lo.0, lo.1, hi.0, hi.1) else {
            return;
        };
        for y in bbox.y0..=bbox.y1 {
            for x in bbox.x0..=bbox.x1 {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if inside_convex(points, p) {
                    self.cover(x, y, 1.0);
                }
            }
        }
        self.mark_dirty(bbox);
        self.composite(color, alpha);
    }

    /// Draw `text` with its baseline starting at `origin`; returns the advance width.
    pub fn draw_text<F: Font>(&mut self, font: &F, text: &str, origin: Point, size_px: f64, color: Color) -> f64 {
        let scale = PxScale::from(size_px.max(0.0) as f32);
        let scaled = font.as_scaled(scale);
        let (w, h) = (self.width() as i64, self.height() as i64);
        let mut caret = origin.0 as f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, origin.1 as f32));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (bx, by) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|gx, gy, c| {
                let (x, y) = (bx + gx as i64, by + gy as i64);
                if (0..w).contains(&x) && (0..h).contains(&y) {
                    self.cover(x as u32, y as u32, c as f64);
                }
            });
            if let Some(bbox) = self.clip_box(
                bounds.min.x as f64,
                bounds.min.y as f64,
                bounds.max.x as f64,
                bounds.max.y as f64,
            ) {
                self.mark_dirty(bbox);
            }
        }
        self.composite(color, 1.0);
        caret as f64 - origin.0
    }

    fn stroke_into_mask(&mut self, points: &[Point], style: &StrokeStyle) {
        let pts = simplify(points);
        let half = 0.5 * style.width_px.max(0.0);
        if pts.len() == 1 {
            self.stamp_segment(pts[0], pts[0], half);
            return;
        }
        match style.dash_px {
            None => {
                for w in pts.windows(2) {
                    self.stamp_segment(w[0], w[1], half);
                }
            }
            Some((on, off)) => self.stamp_dashed(&pts, half, on.max(0.5), off.max(0.0)),
        }
    }

    fn stamp_dashed(&mut self, pts: &[Point], half: f64, on: f64, off: f64) {
        let mut drawing = true;
        let mut remaining = on;
        for w in pts.windows(2) {
            let (a, b) = (w[0], w[1]);
            let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
            if len == 0.0 {
                continue;
            }
            let at = |t: f64| (a.0 + (b.0 - a.0) * t / len, a.1 + (b.1 - a.1) * t / len);
            let mut t = 0.0;
            while t < len {
                let step = remaining.min(len - t);
                if drawing {
                    self.stamp_segment(at(t), at(t + step), half);
                }
                t += step;
                remaining -= step;
                if remaining <= 0.0 {
                    drawing = !drawing;
                    remaining = if drawing { on } else { off };
                    if remaining <= 0.0 {
                        drawing = true;
                        remaining = on;
                    }
                }
            }
        }
    }

    fn stamp_segment(&mut self, a: Point, b: Point, half: f64) {
        let reach = half + 1.0;
        let Some(bbox) = self.clip_box(
            a.0.min(b.0) - reach,
            a.1.min(b.1) - reach,
            a.0.max(b.0) + reach,
            a.1.max(b.1) + reach,
        ) else {
            return;
        };
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = dx * dx + dy * dy;
        for y in bbox.y0..=bbox.y1 {
            for x in bbox.x0..=bbox.x1 {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;
                let t = if len2 > 0.0 {
                    (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let cx = a.0 + t * dx - px;
                let cy = a.1 + t * dy - py;
                let cov = (half + 0.5 - (cx * cx + cy * cy).sqrt()).clamp(0.0, 1.0);
                self.cover(x, y, cov);
            }
        }
        self.mark_dirty(bbox);
    }

    fn cover(&mut self, x: u32, y: u32, coverage: f64) {
        if coverage <= 0.0 {
            return;
        }
        let idx = (y as usize) * (self.image.width() as usize) + x as usize;
        let c = coverage as f32;
        if c > self.mask[idx] {
            self.mask[idx] = c;
        }
    }

    fn clip_box(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<PixelBox> {
        let w = self.image.width() as f64;
        let h = self.image.height() as f64;
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return None;
        }
        if x1 < 0.0 || y1 < 0.0 || x0 >= w || y0 >= h {
            return None;
        }
        Some(PixelBox {
            x0: x0.max(0.0).floor() as u32,
            y0: y0.max(0.0).floor() as u32,
            x1: x1.min(w - 1.0).floor() as u32,
            y1: y1.min(h - 1.0).floor() as u32,
        })
    }

    fn mark_dirty(&mut self, b: PixelBox) {
        self.dirty = Some(match self.dirty {
            None => b,
            Some(d) => PixelBox {
                x0: d.x0.min(b.x0),
                y0: d.y0.min(b.y0),
                x1: d.x1.max(b.x1),
                y1: d.y1.max(b.y1),
            },
        });
    }

    fn composite(&mut self, color: Color, alpha: f64) {
        let Some(b) = self.dirty.take() else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        let width = self.image.width() as usize;
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for y in b.y0..=b.y1 {
            for x in b.x0..=b.x1 {
                let idx = (y as usize) * width + x as usize;
                let cov = self.mask[idx];
                if cov <= 0.0 {
                    continue;
                }
                self.mask[idx] = 0.0;
                let a = alpha * cov;
                let px = self.image.get_pixel_mut(x, y);
                for k in 0..3 {
                    let dst = px.0[k] as f32;
                    px.0[k] = (dst + (src[k] - dst) * a).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

/// Advance width of `text` at `size_px`, kerning included.
pub fn text_width<F: Font>(font: &F, text: &str, size_px: f64) -> f64 {
    let scaled = font.as_scaled(PxScale::from(size_px.max(0.0) as f32));
    let mut width = 0.0_f32;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width as f64
}

fn simplify(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len().min(4096));
    for &p in points {
        if !(p.0.is_finite() && p.1.is_finite()) {
            continue;
        }
        match out.last() {
            Some(&q) if (p.0 - q.0).hypot(p.1 - q.1) < MIN_POINT_SPACING_PX => {}
            _ => out.push(p),
        }
    }
    if let (Some(&last), Some(&kept)) = (points.last(), out.last()) {
        if last != kept && last.0.is_finite() && last.1.is_finite() {
            out.push(last);
        }
    }
    out
}

fn inside_convex(poly: &[Point], p: Point) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
        if cross != 0.0 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::FontRef;

    fn font() -> FontRef<'static> {
        FontRef::try_from_slice(include_bytes!("../assets/DejaVuSans.ttf")).unwrap()
    }

    fn px(c: &Canvas, x: u32, y: u32) -> [u8; 3] {
        let p = c.image().get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    }

    #[test]
    fn test_new_canvas_is_background() {
        let c = Canvas::new(20, 10, Color::WHITE);
        assert_eq!((c.width(), c.height()), (20, 10));
        assert!(c.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_opaque_horizontal_line() {
        let mut c = Canvas::new(40, 20, Color::WHITE);
        c.draw_polyline(&[(2.0, 10.0), (38.0, 10.0)], &StrokeStyle::solid(Color::BLUE, 3.0, 1.0));
        assert_eq!(px(&c, 20, 10), [0, 0, 255]);
        assert_eq!(px(&c, 20, 2), [255, 255, 255]);
    }

    #[test]
    fn test_translucent_overlap_does_not_accumulate() {
        let mut c = Canvas::new(40, 40, Color::WHITE);
        let style = StrokeStyle::solid(Color::BLUE, 4.0, 0.5);
        // The path doubles back over itself.
        c.draw_polyline(&[(5.0, 20.5), (35.0, 20.5), (5.0, 20.5)], &style);
        let single = px(&c, 20, 20);
        assert_eq!(single, [128, 128, 255]);
        // A second stroke does accumulate.
        c.draw_polyline(&[(5.0, 20.5), (35.0, 20.5)], &style);
        assert_eq!(px(&c, 20, 20), [64, 64, 255]);
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut c = Canvas::new(60, 10, Color::WHITE);
        c.draw_polyline(
            &[(0.0, 5.0), (60.0, 5.0)],
            &StrokeStyle::dashed(Color::PURPLE, 2.0, 1.0, 6.0, 6.0),
        );
        let row: Vec<bool> = (0..60).map(|x| px(&c, x, 5) != [255, 255, 255]).collect();
        assert!(row[2], "first dash should be drawn");
        assert!(!row[9], "first gap should be empty");
        assert!(row[14], "second dash should be drawn");
    }

    #[test]
    fn test_fill_circle() {
        let mut c = Canvas::new(30, 30, Color::WHITE);
        c.fill_circle((15.0, 15.0), 5.0, Color::RED, 1.0);
        assert_eq!(px(&c, 15, 15), [255, 0, 0]);
        assert_eq!(px(&c, 2, 2), [255, 255, 255]);
    }

    #[test]
    fn test_fill_convex_polygon_either_winding() {
        let square = [(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)];
        let mut reversed = square;
        reversed.reverse();
        for poly in [square, reversed] {
            let mut c = Canvas::new(20, 20, Color::WHITE);
            c.fill_convex_polygon(&poly, Color::DARK_GREEN, 1.0);
            assert_eq!(px(&c, 10, 10), [0, 100, 0]);
            assert_eq!(px(&c, 1, 1), [255, 255, 255]);
        }
    }

    #[test]
    fn test_arrow_draws_shaft_and_barbs() {
        let mut c = Canvas::new(40, 40, Color::WHITE);
        c.draw_arrow((5.0, 20.0), (35.0, 20.0), 8.0, &StrokeStyle::solid(Color::DARK_GREEN, 1.5, 1.0));
        assert_ne!(px(&c, 20, 20), [255, 255, 255]);
        // Barbs reach back and sideways from the tip.
        let barb_touched = (22..34).any(|x| px(&c, x, 17) != [255, 255, 255]);
        assert!(barb_touched);
    }

    #[test]
    fn test_offscreen_and_non_finite_points_are_ignored() {
        let mut c = Canvas::new(10, 10, Color::WHITE);
        let style = StrokeStyle::solid(Color::BLUE, 2.0, 1.0);
        c.draw_polyline(&[(-100.0, -100.0), (-50.0, -80.0)], &style);
        c.draw_polyline(&[(f64::NAN, 1.0), (f64::INFINITY, 2.0)], &style);
        c.fill_circle((500.0, 500.0), 3.0, Color::RED, 1.0);
        assert!(c.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_simplify_keeps_endpoints() {
        let pts: Vec<Point> = (0..100).map(|i| (i as f64 * 0.01, 0.0)).collect();
        let s = simplify(&pts);
        assert_eq!(s.first(), Some(&(0.0, 0.0)));
        assert_eq!(s.last(), pts.last());
        assert!(s.len() < 10);
    }

    #[test]
    fn test_text_is_drawn_right_of_origin() {
        let font = font();
        let mut c = Canvas::new(120, 30, Color::WHITE);
        let advance = c.draw_text(&font, "Eje x (B)", (10.0, 20.0), 14.0, Color::BLACK);
        assert!((advance - text_width(&font, "Eje x (B)", 14.0)).abs() < 1e-3);
        let inked: Vec<(u32, u32)> = c
            .image()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] < 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(inked.len() > 20, "too few glyph pixels: {}", inked.len());
        assert!(inked.iter().all(|&(x, y)| x >= 9 && (x as f64) <= 11.0 + advance && y <= 25));
    }

    #[test]
    fn test_text_width_grows_with_length_and_size() {
        let font = font();
        let short = text_width(&font, "Eje", 12.0);
        assert!(short > 0.0);
        assert!(text_width(&font, "Eje x", 12.0) > short);
        assert!((text_width(&font, "Eje", 24.0) - 2.0 * short).abs() < 0.5);
        assert_eq!(text_width(&font, "", 12.0), 0.0);
    }

    #[test]
    fn test_offscreen_text_is_clipped() {
        let font = font();
        let mut c = Canvas::new(20, 20, Color::WHITE);
        c.draw_text(&font, "Campo", (-500.0, -500.0), 12.0, Color::BLACK);
        c.draw_text(&font, "Campo", (15.0, 18.0), 12.0, Color::BLACK);
        assert_eq!(c.image().dimensions(), (20, 20));
    }
}
