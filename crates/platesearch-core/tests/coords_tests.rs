use platesearch_core::coords::{normalize, resolve};
use platesearch_core::error::CoordinateError;
use platesearch_core::traits::NameResolver;
use platesearch_core::types::{Axis, SkyPosition};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-4, "{a} != {b}");
}

#[test]
fn sexagesimal_and_decimal_ra_agree() {
    // 05:34:31.94 h = 83.63308 deg
    assert_close(normalize("05:34:31.94", Axis::Ra).unwrap(), normalize("83.63308", Axis::Ra).unwrap());
    assert_close(normalize("12:00:00", Axis::Ra).unwrap(), 180.0);
    assert_close(normalize("0:0:0", Axis::Ra).unwrap(), 0.0);
    assert_close(normalize("23:59:59.9", Axis::Ra).unwrap(), 359.9996);
}

#[test]
fn sexagesimal_and_decimal_dec_agree() {
    assert_close(normalize("+22:00:52.2", Axis::Dec).unwrap(), normalize("22.0145", Axis::Dec).unwrap());
    assert_close(normalize("-45:30:00", Axis::Dec).unwrap(), -45.5);
    assert_close(normalize(" 89:59:59.0 ", Axis::Dec).unwrap(), 89.99972);
}

#[test]
fn decimal_passes_through() {
    assert_close(normalize("  -12.25 ", Axis::Dec).unwrap(), -12.25);
    assert_close(normalize("+301.5", Axis::Ra).unwrap(), 301.5);
}

#[test]
fn garbage_is_unparsable() {
    for bad in ["", "abc", "12h30m", "1:2:3:4", "NaN", "inf", "12::30"] {
        let axis = if bad.contains(':') { Axis::Dec } else { Axis::Ra };
        assert!(
            matches!(normalize(bad, axis), Err(CoordinateError::Unparsable { .. })),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn declination_beyond_pole_is_out_of_range() {
    assert!(matches!(normalize("91:00:00", Axis::Dec), Err(CoordinateError::OutOfRange { axis: Axis::Dec, .. })));
}

#[test]
fn hour_angle_wraps_into_circle() {
    assert_close(normalize("25:00:00", Axis::Ra).unwrap(), 15.0);
    assert_close(normalize("-01:00:00", Axis::Ra).unwrap(), 345.0);
}

struct Failing;

impl NameResolver for Failing {
    fn resolve(&self, name: &str) -> Result<SkyPosition, CoordinateError> {
        Err(CoordinateError::Unresolved { name: name.to_string(), reason: "network down".to_string() })
    }
}

#[test]
fn resolve_rejects_blank_names_without_calling_resolver() {
    let err = resolve(&Failing, "   ").unwrap_err();
    assert_eq!(err, CoordinateError::Unresolved { name: String::new(), reason: "empty object name".to_string() });

    let err = resolve(&Failing, " Vega ").unwrap_err();
    assert!(matches!(err, CoordinateError::Unresolved { ref name, .. } if name == "Vega"));
}
