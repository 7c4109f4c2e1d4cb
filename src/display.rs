//! Display formatting for numeric results
//!
//! Values stay full f64 internally; precision is applied only here, when a
//! number is turned into text.

/// Integers up to this magnitude print without a fractional part
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// Format a number for display
///
/// Integral values print without a trailing `.0`. With `precision`, the value
/// is rounded to that many decimal places and trailing zeros are trimmed:
/// `40/3` at precision 2 prints `13.33`.
pub fn format_number(value: f64, precision: Option<usize>) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if let Some(places) = precision {
        let fixed = format!("{:.*}", places, value);
        let trimmed = if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.')
        } else {
            fixed.as_str()
        };
        return match trimmed {
            "-0" => "0".to_string(),
            other => other.to_string(),
        };
    }

    if value == 0.0 && value.is_sign_negative() {
        "-0".to_string()
    } else if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        // Cast is exact below the limit
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(format_number(7.0, None), "7");
        assert_eq!(format_number(-25.0, None), "-25");
    }

    #[test]
    fn negative_zero_keeps_sign() {
        assert_eq!(format_number(-0.0, None), "-0");
        assert_eq!(format_number(0.0, None), "0");
        assert_eq!(format_number(-0.0, Some(2)), "0");
    }

    #[test]
    fn fractions_use_shortest_form() {
        assert_eq!(format_number(2.5, None), "2.5");
        assert_eq!(format_number(0.1 + 0.2, None), "0.30000000000000004");
    }

    #[test]
    fn precision_rounds_and_trims() {
        assert_eq!(format_number(40.0 / 3.0, Some(2)), "13.33");
        assert_eq!(format_number(2.5, Some(3)), "2.5");
        assert_eq!(format_number(2.0, Some(4)), "2");
        assert_eq!(format_number(-0.0001, Some(2)), "0");
        assert_eq!(format_number(1234.4, Some(0)), "1234");
    }

    #[test]
    fn non_finite() {
        assert_eq!(format_number(f64::INFINITY, None), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY, Some(2)), "-inf");
        assert_eq!(format_number(f64::NAN, None), "NaN");
    }
}
