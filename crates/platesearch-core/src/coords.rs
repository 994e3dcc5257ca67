//! Coordinate normalization.
//!
//! Right ascension and declination arrive either as decimal degrees
//! (`"83.633"`) or colon-delimited sexagesimal strings. Sexagesimal RA is an
//! hour angle (`"05:34:31.9"`, 1h = 15 deg); sexagesimal Dec is already in
//! degrees (`"+22:00:52"`). A leading sign applies to the whole value.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::CoordinateError;
use crate::traits::NameResolver;
use crate::types::{Axis, SkyPosition};

const DEGREES_PER_HOUR: f64 = 15.0;

static SEXAGESIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        ([+-])?                       # sign
        (\d{1,3})                     # hours or degrees
        :(\d{1,2}(?:\.\d+)?)          # minutes
        (?::(\d{1,2}(?:\.\d+)?))?     # seconds
        \s*$",
    )
    .expect("sexagesimal pattern is valid")
});

/// Convert an RA or Dec string into decimal degrees.
///
/// # Errors
///
/// [`CoordinateError::Unparsable`] when the string is neither a finite
/// decimal nor well-formed sexagesimal, [`CoordinateError::OutOfRange`] when
/// a sexagesimal declination lies beyond the poles.
pub fn normalize(value: &str, axis: Axis) -> Result<f64, CoordinateError> {
    if value.contains(':') {
        return parse_sexagesimal(value, axis);
    }
    parse_decimal(value, axis)
}

/// Resolve an object name to a position through the injected resolver.
///
/// # Errors
///
/// [`CoordinateError::Unresolved`] when the name is blank or the resolver
/// rejects it.
pub fn resolve(resolver: &dyn NameResolver, name: &str) -> Result<SkyPosition, CoordinateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoordinateError::Unresolved { name: String::new(), reason: "empty object name".to_string() });
    }
    let position = resolver.resolve(name)?;
    debug!(object = name, ra = position.ra_deg, dec = position.dec_deg, "resolved object name");
    Ok(position)
}

fn parse_decimal(value: &str, axis: Axis) -> Result<f64, CoordinateError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoordinateError::Unparsable { axis, value: value.to_string() }),
    }
}

fn parse_sexagesimal(value: &str, axis: Axis) -> Result<f64, CoordinateError> {
    let unparsable = || CoordinateError::Unparsable { axis, value: value.to_string() };
    let caps = SEXAGESIMAL.captures(value).ok_or_else(unparsable)?;

    let field = |i: usize| -> Result<f64, CoordinateError> {
        caps.get(i).map_or(Ok(0.0), |m| m.as_str().parse::<f64>().map_err(|_| unparsable()))
    };
    let whole = field(2)?;
    let minutes = field(3)?;
    let seconds = field(4)?;
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(CoordinateError::OutOfRange { axis, value: value.to_string() });
    }

    let sign = if caps.get(1).is_some_and(|m| m.as_str() == "-") { -1.0 } else { 1.0 };
    let magnitude = whole + minutes / 60.0 + seconds / 3600.0;

    match axis {
        Axis::Ra => Ok((sign * magnitude * DEGREES_PER_HOUR).rem_euclid(360.0)),
        Axis::Dec => {
            if magnitude > 90.0 {
                return Err(CoordinateError::OutOfRange { axis, value: value.to_string() });
            }
            Ok(sign * magnitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_degrees_keeps_sign() {
        let dec = normalize("-00:30:00", Axis::Dec).unwrap();
        assert!((dec + 0.5).abs() < 1e-9);
    }

    #[test]
    fn minutes_only_form() {
        let ra = normalize("12:30", Axis::Ra).unwrap();
        assert!((ra - 187.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_minutes_over_sixty() {
        assert!(matches!(normalize("10:75:00", Axis::Dec), Err(CoordinateError::OutOfRange { .. })));
    }
}
