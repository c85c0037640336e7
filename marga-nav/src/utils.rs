//! Shared planar geometry helpers

/// Euclidean distance between two points.
#[inline]
pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from point P to the segment AB, clamped to the segment ends.
///
/// A degenerate segment (A == B) reduces to the point distance |PA|.
pub fn point_to_segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let abx = bx - ax;
    let aby = by - ay;
    let apx = px - ax;
    let apy = py - ay;

    let ab_len2 = abx * abx + aby * aby;
    if ab_len2 == 0.0 {
        return (apx * apx + apy * apy).sqrt();
    }

    let t = ((apx * abx + apy * aby) / ab_len2).clamp(0.0, 1.0);
    distance(px, py, ax + t * abx, ay + t * aby)
}

/// Heading change in degrees when travelling A -> B -> C.
///
/// 0° means continuing straight, 180° means doubling back. Returns 0 if
/// either leg has zero length.
pub fn turn_angle_deg(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let v1 = (b.0 - a.0, b.1 - a.1);
    let v2 = (c.0 - b.0, c.1 - b.1);
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }
    let cos_a = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_a.acos().to_degrees()
}

/// Z component of (B - A) x (C - B). Positive means a left turn (x right, y up).
#[inline]
pub fn turn_cross(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let v1 = (b.0 - a.0, b.1 - a.1);
    let v2 = (c.0 - b.0, c.1 - b.1);
    v1.0 * v2.1 - v1.1 * v2.0
}
