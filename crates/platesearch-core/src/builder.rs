//! Translates a [`SearchFilter`] into a [`StructuredQuery`].

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::coords;
use crate::error::{FilterError, SearchError};
use crate::query::{Clause, ClauseKind, Predicate, StructuredQuery};
use crate::traits::NameResolver;
use crate::types::{Axis, BoundingBox, DegreeRange, SearchFilter, ALL_ARCHIVES};

pub const IDENTIFIER_FIELD: &str = "identifier";
pub const ARCHIVE_FIELD: &str = "archive";
pub const EXPOSURES_FIELD: &str = "exposure_info";
pub const RA_FIELD: &str = "ra_deg";
pub const DEC_FIELD: &str = "dec_deg";
pub const OBSERVER_FIELD: &str = "plate_info.observer";

/// Text-bearing fields searched by the free-text filter.
pub const FREE_TEXT_FIELDS: [&str; 10] = [
    "plate_info.availability_note",
    "plate_info.digitization_note",
    "plate_info.quality",
    "plate_info.notes",
    "plate_info.condition",
    "plate_info.observer",
    "obs_info.instrument",
    "obs_info.observatory",
    "exposure_info.target",
    "plate_info.emulsion",
];

const ARCMIN_PER_DEGREE: f64 = 60.0;
const DEGREES_PER_HOUR: f64 = 15.0;

/// How the RA half-width of the search box is derived from the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaScaling {
    /// `radius * 15` regardless of declination.
    #[default]
    HourAngle,
    /// `radius / cos(dec)`, capped at a half circle. Plain `radius` when no
    /// declination is known.
    CosDec,
}

/// What happens when both free-text and observer filters are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrGroupMerge {
    /// Both OR groups must match.
    #[default]
    Conjunctive,
    /// The observer group replaces the free-text group.
    LastWriterWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    pub ra_scaling: RaScaling,
    pub or_merge: OrGroupMerge,
}

pub struct QueryBuilder {
    resolver: Arc<dyn NameResolver>,
    options: BuilderOptions,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn range_around(center: f64, half_width: f64) -> DegreeRange {
    DegreeRange { min: round4(center - half_width), max: round4(center + half_width) }
}

/// Parse the radius in arcminutes and convert it to degrees.
///
/// # Errors
///
/// [`FilterError::InvalidNumber`] when the value is not a number,
/// [`FilterError::InvalidRadius`] when it is not finite and positive.
pub fn radius_degrees(radius_arcmin: &str) -> Result<f64, FilterError> {
    let arcmin = radius_arcmin
        .trim()
        .parse::<f64>()
        .map_err(|_| FilterError::InvalidNumber { field: "radius", value: radius_arcmin.to_string() })?;
    if !arcmin.is_finite() || arcmin <= 0.0 {
        return Err(FilterError::InvalidRadius(radius_arcmin.to_string()));
    }
    Ok(arcmin / ARCMIN_PER_DEGREE)
}

impl QueryBuilder {
    pub fn new(resolver: Arc<dyn NameResolver>, options: BuilderOptions) -> Self {
        Self { resolver, options }
    }

    /// Search window around `ra`/`dec` for a radius in degrees.
    pub fn bounding_box(&self, ra: Option<f64>, dec: Option<f64>, radius: f64) -> BoundingBox {
        let ra_half_width = match self.options.ra_scaling {
            RaScaling::HourAngle => radius * DEGREES_PER_HOUR,
            RaScaling::CosDec => match dec {
                Some(dec) => {
                    let cos = dec.to_radians().cos().abs();
                    if cos < 1e-9 { 180.0 } else { (radius / cos).min(180.0) }
                }
                None => radius,
            },
        };
        BoundingBox {
            ra: ra.map(|ra| range_around(ra, ra_half_width)),
            dec: dec.map(|dec| range_around(dec, radius)),
        }
    }

    /// Build the store query for `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Filter`] for a bad radius, including one so small
    /// that the rounded window is empty, and
    /// [`SearchError::Coordinate`] when a coordinate cannot be normalized or
    /// the object name cannot be resolved. Resolution happens before the
    /// explicit coordinates are looked at, and overrides them.
    pub fn build(&self, filter: &SearchFilter) -> Result<StructuredQuery, SearchError> {
        let radius = radius_degrees(&filter.radius_arcmin)?;
        let mut query = StructuredQuery::new();

        if let Some(identifier) = present(filter.identifier.as_ref()) {
            query.push(Clause::new(
                ClauseKind::Identifier,
                &[IDENTIFIER_FIELD],
                Predicate::contains(IDENTIFIER_FIELD, identifier),
            ));
        }

        if let Some(archive) = present(filter.archive.as_ref()).filter(|a| *a != ALL_ARCHIVES) {
            query.push(Clause::new(ClauseKind::Archive, &[ARCHIVE_FIELD], Predicate::contains(ARCHIVE_FIELD, archive)));
        }

        let (ra, dec) = match present(filter.object_name.as_ref()) {
            Some(name) => {
                let position = coords::resolve(self.resolver.as_ref(), name)?;
                (Some(position.ra_deg), Some(position.dec_deg))
            }
            None => (
                present(filter.ra.as_ref()).map(|v| coords::normalize(v, Axis::Ra)).transpose()?,
                present(filter.dec.as_ref()).map(|v| coords::normalize(v, Axis::Dec)).transpose()?,
            ),
        };
        let bbox = self.bounding_box(ra, dec, radius);
        if !is_open(bbox.ra) || !is_open(bbox.dec) {
            return Err(FilterError::InvalidRadius(filter.radius_arcmin.clone()).into());
        }
        if let Some(clause) = position_clause(&bbox) {
            query.push(clause);
        }

        if let Some(text) = present(filter.free_text.as_ref()) {
            let matches = FREE_TEXT_FIELDS.iter().map(|path| Predicate::contains(path, text)).collect();
            query.push(Clause::new(ClauseKind::FreeText, &FREE_TEXT_FIELDS, Predicate::Or(matches)));
        }

        if let Some(observer) = present(filter.observer.as_ref()) {
            if self.options.or_merge == OrGroupMerge::LastWriterWins && query.remove_kind(ClauseKind::FreeText) > 0 {
                debug!("observer filter replaced free-text filter");
            }
            query.push(Clause::new(
                ClauseKind::Observer,
                &[OBSERVER_FIELD],
                Predicate::Or(vec![Predicate::contains(OBSERVER_FIELD, observer)]),
            ));
        }

        debug!(query = %query.to_document(), "built plate query");
        Ok(query)
    }
}

/// A missing axis is unconstrained; a present one must still have room
/// between its bounds after rounding.
fn is_open(range: Option<DegreeRange>) -> bool {
    !matches!(range, Some(r) if r.min >= r.max)
}

fn position_clause(bbox: &BoundingBox) -> Option<Clause> {
    let ra_path = "exposure_info.ra_deg";
    let dec_path = "exposure_info.dec_deg";
    let ra = bbox.ra.map(|r| Predicate::elem_range(EXPOSURES_FIELD, RA_FIELD, r));
    let dec = bbox.dec.map(|r| Predicate::elem_range(EXPOSURES_FIELD, DEC_FIELD, r));
    match (ra, dec) {
        (Some(ra), Some(dec)) => {
            Some(Clause::new(ClauseKind::Position, &[ra_path, dec_path], Predicate::And(vec![ra, dec])))
        }
        (Some(ra), None) => Some(Clause::new(ClauseKind::Position, &[ra_path], ra)),
        (None, Some(dec)) => Some(Clause::new(ClauseKind::Position, &[dec_path], dec)),
        (None, None) => None,
    }
}
