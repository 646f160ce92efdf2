//! Unit hints for numeric literals.
//!
//! STF numbers may carry a unit suffix (`2km`, `300ft`). The reader strips
//! the suffix and converts to the base unit of the requested quantity.

/// Quantity a numeric literal is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Plain number, no suffix allowed.
    #[default]
    None,
    /// Length, base unit metres.
    Distance,
}

impl Units {
    /// Multiplier that converts `suffix` into this quantity's base unit, or
    /// `None` when the suffix is not valid here. An empty suffix is always 1.
    pub fn scale_for(self, suffix: &str) -> Option<f32> {
        if suffix.is_empty() {
            return Some(1.0);
        }
        match self {
            Units::None => None,
            Units::Distance => match suffix.to_ascii_lowercase().as_str() {
                "m" => Some(1.0),
                "cm" => Some(0.01),
                "mm" => Some(0.001),
                "km" => Some(1000.0),
                "ft" => Some(0.3048),
                "in" => Some(0.0254),
                "yd" => Some(0.9144),
                "mi" => Some(1609.344),
                _ => None,
            },
        }
    }
}

/// Split a literal into its numeric part and its unit suffix.
pub fn split_suffix(literal: &str) -> (&str, &str) {
    let end = literal
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit()
                || c == '.'
                || ((c == '-' || c == '+') && i == 0)
                || ((c == 'e' || c == 'E') && is_exponent(literal, i)))
        })
        .map(|(i, _)| i)
        .unwrap_or(literal.len());
    literal.split_at(end)
}

// 'e' only counts as an exponent when digits (optionally signed) follow it,
// so `1e3` parses but `1em` does not swallow the suffix.
fn is_exponent(literal: &str, at: usize) -> bool {
    let rest = &literal[at + 1..];
    let rest = rest.strip_prefix(['-', '+']).unwrap_or(rest);
    rest.starts_with(|c: char| c.is_ascii_digit()) && at > 0
}

/// Parse a float literal with an optional unit suffix.
pub fn parse_float(literal: &str, units: Units) -> Option<f32> {
    let (number, suffix) = split_suffix(literal);
    let scale = units.scale_for(suffix)?;
    number.parse::<f32>().ok().map(|v| v * scale)
}

/// Parse an integer literal with an optional unit suffix. A scaled value is
/// rounded to the nearest base unit and must still fit in an `i32`.
pub fn parse_int(literal: &str, units: Units) -> Option<i32> {
    let (number, suffix) = split_suffix(literal);
    let scale = units.scale_for(suffix)?;
    let value = number.parse::<i32>().ok()?;
    if suffix.is_empty() {
        return Some(value);
    }
    let scaled = (f64::from(value) * f64::from(scale)).round();
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return None;
    }
    Some(scaled as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_float("0.5", Units::None), Some(0.5));
        assert_eq!(parse_float("-3", Units::None), Some(-3.0));
        assert_eq!(parse_int("42", Units::None), Some(42));
        assert_eq!(parse_int("-1", Units::None), Some(-1));
    }

    #[test]
    fn distance_suffixes_convert_to_metres() {
        assert_eq!(parse_float("2km", Units::Distance), Some(2000.0));
        assert_eq!(parse_float("150m", Units::Distance), Some(150.0));
        let ft = parse_float("100ft", Units::Distance).unwrap();
        assert!((ft - 30.48).abs() < 1e-4);
    }

    #[test]
    fn integer_suffixes_apply_scale() {
        assert_eq!(parse_int("2km", Units::Distance), Some(2000));
        assert_eq!(parse_int("150m", Units::Distance), Some(150));
        assert_eq!(parse_int("300cm", Units::Distance), Some(3));
        assert_eq!(parse_int("10ft", Units::Distance), Some(3));
        assert_eq!(parse_int("3000000km", Units::Distance), None, "overflows i32");
    }

    #[test]
    fn suffix_rejected_for_plain_numbers() {
        assert_eq!(parse_float("2km", Units::None), None);
        assert_eq!(parse_int("2km", Units::None), None);
        assert_eq!(parse_float("2parsecs", Units::Distance), None);
    }

    #[test]
    fn exponent_is_not_a_suffix() {
        assert_eq!(parse_float("1e3", Units::None), Some(1000.0));
        assert_eq!(split_suffix("5em"), ("5", "em"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_float("abc", Units::None), None);
        assert_eq!(parse_float("", Units::None), None);
        assert_eq!(parse_int("1.5", Units::None), None);
    }
}
