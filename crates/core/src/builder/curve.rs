//! Volume and frequency curves. Both share one shape and one builder.

use once_cell::sync::Lazy;

use super::{fold_keyword, parse_block_body, KeywordTable};
use crate::error::StfError;
use crate::model::{Curve, CurveControl, CurvePoint};
use crate::normalize::rescale_legacy_curve;
use crate::reader::Reader;
use crate::units::Units;

static CURVE_KEYWORDS: Lazy<KeywordTable<Curve>> = Lazy::new(|| {
    KeywordTable::<Curve>::new()
        .on("curvepoints", |r, c| {
            c.points = read_points(r)?;
            Ok(())
        })
        .on("granularity", |r, c| {
            c.granularity = r.read_float_block(Units::None)?;
            Ok(())
        })
});

fn control_for(keyword: &str) -> Option<CurveControl> {
    let control = match keyword {
        "distancecontrolled" | "distance" => CurveControl::Distance,
        "speedcontrolled" | "speed" => CurveControl::Speed,
        "variable1controlled" | "variable1" => CurveControl::Variable1,
        "variable2controlled" | "variable2" => CurveControl::Variable2,
        "variable3controlled" | "variable3" => CurveControl::Variable3,
        "none" => CurveControl::None,
        _ => return None,
    };
    Some(control)
}

/// `( count x y x y ... )`. A negative count reads no points.
///
/// The count only bounds the loop; points are pushed as they are read, so an
/// inflated count fails at end of input rather than reserving memory.
fn read_points(r: &mut dyn Reader) -> Result<Vec<CurvePoint>, StfError> {
    r.must_match("(")?;
    let count = r.read_int(Units::None)?.max(0);
    let mut points = Vec::new();
    for _ in 0..count {
        let x = r.read_float(Units::None)?;
        let y = r.read_float(Units::None)?;
        points.push(CurvePoint { x, y });
    }
    r.skip_rest_of_block()?;
    Ok(points)
}

/// `VolumeCurve ( SpeedControlled CurvePoints ( ... ) Granularity ( g ) )`,
/// positioned after the keyword.
pub(crate) fn build_curve(r: &mut dyn Reader) -> Result<Curve, StfError> {
    r.must_match("(")?;
    let mut curve = Curve::default();
    if r.at_end_of_block() {
        return Ok(curve);
    }

    let first = r.read_token()?;
    if first == "(" {
        r.skip_rest_of_block()?;
    } else if let Some(control) = control_for(&fold_keyword(&first)) {
        curve.control = control;
    }

    parse_block_body(r, &mut curve, &CURVE_KEYWORDS)?;
    rescale_legacy_curve(&mut curve);
    Ok(curve)
}
