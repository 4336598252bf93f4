//! Length parsing. Every length in the config is normalised to inches.

use crate::error::{Result, StitchError};

/// Unit suffixes and their size in inches. Longest suffixes first.
const UNITS: &[(&str, f64)] = &[
    ("inch", 1.0),
    ("in", 1.0),
    ("mm", 1.0 / 25.4),
    ("cm", 1.0 / 2.54),
    ("pt", 1.0 / 72.0),
    // printer's point
    ("pp", 1.0 / 72.27),
    ("pc", 12.0 / 72.0),
    ("px", 1.0 / 96.0),
    ("\"", 1.0),
];

/// Parse a human length such as `"210mm"`, `"0.25pp"` or `"1.5 in"` into
/// inches. A bare number is taken as inches.
pub fn parse_length(value: &str) -> Result<f64> {
    let s = value.trim();
    if s.is_empty() {
        return Err(invalid(value, "empty value"));
    }

    let (number, scale) = UNITS
        .iter()
        .find_map(|(suffix, scale)| {
            s.strip_suffix(suffix)
                .map(|rest| (rest.trim_end(), *scale))
        })
        .unwrap_or((s, 1.0));

    let magnitude: f64 = number
        .parse()
        .map_err(|_| invalid(value, "not a number with a known unit (in, mm, cm, pt, pp, pc, px)"))?;
    if !magnitude.is_finite() {
        return Err(invalid(value, "not finite"));
    }
    if magnitude < 0.0 {
        return Err(invalid(value, "negative lengths are not allowed"));
    }

    Ok(magnitude * scale)
}

fn invalid(value: &str, reason: &str) -> StitchError {
    StitchError::InvalidLength {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn metric_lengths() {
        assert!(close(parse_length("25.4mm").unwrap(), 1.0));
        assert!(close(parse_length("2.54cm").unwrap(), 1.0));
        assert!(close(parse_length("210mm").unwrap(), 8.267_716_535_433_07));
    }

    #[test]
    fn typographic_lengths() {
        assert!(close(parse_length("72pt").unwrap(), 1.0));
        assert!(close(parse_length("72.27pp").unwrap(), 1.0));
        assert!(close(parse_length("6pc").unwrap(), 1.0));
        assert!(close(parse_length("96px").unwrap(), 1.0));
    }

    #[test]
    fn bare_number_and_whitespace() {
        assert_eq!(parse_length("0").unwrap(), 0.0);
        assert_eq!(parse_length(" 1.5 in ").unwrap(), 1.5);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_length("").is_err());
        assert!(parse_length("12furlongs").is_err());
        assert!(parse_length("-3mm").is_err());
    }
}
