//! Weight text handling
//!
//! Weights stay free-form strings end to end. The two places a number is
//! needed (deriving net weight, sizing a chart slice) read the leading
//! numeric prefix of the text, the way a browser's `parseFloat` does, and
//! print it back in the same number format.

/// Unit marker appended to derived net weights
pub const WEIGHT_UNIT: &str = " KG";

/// Parse the longest leading decimal literal of `text`
///
/// Leading whitespace is skipped and trailing garbage is ignored, so
/// `"100.5 kg"` reads as `100.5`. Returns `NaN` when no digits lead the text.
pub fn parse_float_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let rest = &trimmed[end..];
    if rest.starts_with("Infinity") {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Format a number the way it prints in a browser template string
///
/// Integral values print without a fractional part (`100`, not `100.0`),
/// very large or very small magnitudes use exponent notation (`1e+21`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Append the weight unit to a numeric value: `100.0` -> `"100 KG"`
pub fn with_unit(value: f64) -> String {
    format!("{}{}", format_number(value), WEIGHT_UNIT)
}

/// Read the numeric value of a weight string, dropping the first unit marker
pub fn strip_unit(text: &str) -> f64 {
    parse_float_prefix(&text.replacen(WEIGHT_UNIT, "", 1))
}
