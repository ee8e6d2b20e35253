//! Planar joint geometry.
//!
//! All inputs are normalized image coordinates with y growing downward.

/// Points closer than this are treated as coincident.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Returned for degenerate triples; reads as a straight joint.
pub const DEGENERATE_ANGLE: f64 = 180.0;

/// Interior angle at `b` between rays `b→a` and `b→c`, in degrees.
///
/// Computed from the difference of the two rays' `atan2` headings and
/// folded into `[0, 180]`. Returns [`DEGENERATE_ANGLE`] when `a` or `c`
/// coincides with `b`.
pub fn angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let ba = (a.0 - b.0, a.1 - b.1);
    let bc = (c.0 - b.0, c.1 - b.1);

    if ba.0.hypot(ba.1) < COINCIDENT_EPSILON || bc.0.hypot(bc.1) < COINCIDENT_EPSILON {
        return DEGENERATE_ANGLE;
    }

    let radians = bc.1.atan2(bc.0) - ba.1.atan2(ba.0);
    let degrees = radians.to_degrees().abs();

    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Angle of the segment `bottom→top` away from straight up, in degrees.
///
/// 0 means `top` is directly above `bottom`, 90 means level with it.
pub fn lean_from_vertical(top: (f64, f64), bottom: (f64, f64)) -> f64 {
    let dx = (top.0 - bottom.0).abs();
    let dy = bottom.1 - top.1;
    if dx.hypot(dy) < COINCIDENT_EPSILON {
        return 0.0;
    }
    dx.atan2(dy).to_degrees()
}

/// Perpendicular distance of `p` from the line through `a` and `b`,
/// positive when `p` sits above the line (smaller y) and negative below.
///
/// Returns 0 when `a` and `b` coincide or the line is vertical.
pub fn height_above_line(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len = vx.hypot(vy);
    if len < COINCIDENT_EPSILON || vx.abs() < COINCIDENT_EPSILON {
        return 0.0;
    }

    let cross = vx * (p.1 - a.1) - vy * (p.0 - a.0);
    let distance = cross.abs() / len;

    let line_y = a.1 + vy * (p.0 - a.0) / vx;
    if p.1 < line_y {
        distance
    } else {
        -distance
    }
}
