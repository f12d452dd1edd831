//! Fixed-size 3-vector arithmetic on `[f64; 3]`.
//!
//! Every operation is component-wise in a fixed order so results are
//! reproducible bit for bit across runs and platforms.

use helix_types::state::Vec3;

/// Standard cross product `a × b`.
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm |a|.
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Unit vector along `a`, or `None` for a zero or non-finite vector.
pub fn normalize(a: Vec3) -> Option<Vec3> {
    let n = norm(a);
    if !n.is_finite() || n == 0.0 {
        return None;
    }
    Some([a[0] / n, a[1] / n, a[2] / n])
}

/// Split `v` into components parallel and perpendicular to the unit vector `dir`.
///
/// `v = v_par + v_perp`, `v_par = (v·dir) dir`.
pub fn decompose(v: Vec3, dir: Vec3) -> (Vec3, Vec3) {
    let par = scale(dir, dot(v, dir));
    (par, sub(v, par))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_of_basis_vectors() {
        let ex = [1.0, 0.0, 0.0];
        let ey = [0.0, 1.0, 0.0];
        let ez = [0.0, 0.0, 1.0];
        assert_eq!(cross(ex, ey), ez);
        assert_eq!(cross(ey, ez), ex);
        assert_eq!(cross(ez, ex), ey);
    }

    #[test]
    fn test_cross_of_parallel_vectors_is_zero() {
        let v = [2e7, 0.0, 0.0];
        let b = [2.158e-3, 0.0, 0.0];
        let c = cross(v, b);
        assert!(c.iter().all(|&x| x == 0.0), "got {c:?}");
    }

    #[test]
    fn test_norm_and_normalize() {
        assert!((norm([3.0, 4.0, 0.0]) - 5.0).abs() < 1e-15);
        let u = normalize([0.0, 0.0, -7.0]).unwrap();
        assert_eq!(u, [0.0, 0.0, -1.0]);
        assert!(normalize([0.0, 0.0, 0.0]).is_none());
        assert!(normalize([f64::NAN, 1.0, 0.0]).is_none());
    }

    #[test]
    fn test_decompose_along_x() {
        let (par, perp) = decompose([2e7, 2e6, 1e6], [1.0, 0.0, 0.0]);
        assert_eq!(par, [2e7, 0.0, 0.0]);
        assert_eq!(perp, [0.0, 2e6, 1e6]);
    }
}
