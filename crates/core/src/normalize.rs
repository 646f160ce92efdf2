//! Corrections for legacy numeric conventions, applied as each object is built.

use crate::model::{Curve, CurveControl};

/// Stream volumes above 1 were written as percentages.
pub fn normalize_stream_volume(volume: f32) -> f32 {
    if volume > 1.0 {
        volume / 100.0
    } else {
        volume
    }
}

/// Variable2 curves whose x axis tops out at 1 were stored pre-scaled to
/// 0..1; restore the 0..100 axis. Every other control is left as written.
pub fn rescale_legacy_curve(curve: &mut Curve) {
    if curve.control != CurveControl::Variable2 {
        return;
    }
    let Some(last) = curve.points.last() else {
        return;
    };
    if last.x <= 1.0 {
        for point in &mut curve.points {
            point.x *= 100.0;
        }
    }
}
