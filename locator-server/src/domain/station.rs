//! Station labels and linear references.
//!
//! A station label is the textual distance-along-route notation:
//! `"120"` or `"120+50"`. The part before the first `+` is the station,
//! the part after it is a sub-station offset that is only ever displayed.

use std::fmt;

use serde::Serialize;

use super::TranslateError;

/// Parsed form of a station label such as `"120+50"`.
///
/// # Examples
///
/// ```
/// use locator_server::domain::StationLabel;
///
/// let label = StationLabel::parse("120+50").unwrap();
/// assert_eq!(label.station, 120.0);
/// assert_eq!(label.offset, 50.0);
/// assert_eq!(label.to_string(), "120+50");
///
/// // Offsets of zero are not written out
/// assert_eq!(StationLabel::parse("45+00").unwrap().to_string(), "45");
///
/// assert!(StationLabel::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationLabel {
    pub station: f64,
    pub offset: f64,
}

impl StationLabel {
    /// Parse station text.
    ///
    /// Splits on the first `+`; both segments must be non-negative finite
    /// numbers. A missing offset segment means an offset of zero.
    pub fn parse(text: &str) -> Result<Self, TranslateError> {
        let (left, right) = match text.split_once('+') {
            Some((left, right)) => (left, Some(right)),
            None => (text, None),
        };

        let station = parse_distance(left).ok_or_else(|| malformed(text))?;
        let offset = match right {
            Some(right) => parse_distance(right).ok_or_else(|| malformed(text))?,
            None => 0.0,
        };

        Ok(Self { station, offset })
    }

    /// Extract the primary station text, dropping any offset.
    ///
    /// Only the segment before the first `+` is checked, so
    /// `"120+junk"` still yields `"120"`.
    pub fn match_key(text: &str) -> Result<String, TranslateError> {
        let left = text.split_once('+').map_or(text, |(left, _)| left).trim();
        parse_distance(left).ok_or_else(|| malformed(text))?;
        Ok(left.to_string())
    }

    pub fn has_offset(&self) -> bool {
        self.offset != 0.0
    }
}

impl fmt::Display for StationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_offset() {
            write!(f, "{}+{}", self.station, self.offset)
        } else {
            write!(f, "{}", self.station)
        }
    }
}

/// Parse one segment of a label as a non-negative finite distance.
fn parse_distance(segment: &str) -> Option<f64> {
    let segment = segment.trim();
    // f64's parser also accepts signs, "inf" and "NaN"
    if !segment.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = segment.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn malformed(text: &str) -> TranslateError {
    TranslateError::MalformedStation(text.to_string())
}

/// A location on the route network: route id plus distance along it.
///
/// The offset is carried for display only. Two references that differ
/// only in offset compare equal.
#[derive(Debug, Clone, Serialize)]
pub struct StationReference {
    route_id: String,
    station: f64,
    offset: f64,
}

impl StationReference {
    /// Create a reference, checking the route id is non-empty and the
    /// distances are non-negative and finite.
    pub fn new(
        route_id: impl Into<String>,
        station: f64,
        offset: f64,
    ) -> Result<Self, TranslateError> {
        let route_id = route_id.into().trim().to_string();
        if route_id.is_empty() {
            return Err(TranslateError::EmptyRoute);
        }
        for value in [station, offset] {
            if !value.is_finite() || value < 0.0 {
                return Err(TranslateError::MalformedStation(value.to_string()));
            }
        }

        Ok(Self {
            route_id,
            station,
            offset,
        })
    }

    pub fn from_label(
        route_id: impl Into<String>,
        label: StationLabel,
    ) -> Result<Self, TranslateError> {
        Self::new(route_id, label.station, label.offset)
    }

    /// Parse a route id and station text pair, as typed into a form.
    pub fn parse(route_id: impl Into<String>, station_text: &str) -> Result<Self, TranslateError> {
        Self::from_label(route_id, StationLabel::parse(station_text)?)
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn station(&self) -> f64 {
        self.station
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn label(&self) -> StationLabel {
        StationLabel {
            station: self.station,
            offset: self.offset,
        }
    }
}

impl PartialEq for StationReference {
    fn eq(&self, other: &Self) -> bool {
        self.route_id == other.route_id && self.station == other.station
    }
}

impl fmt::Display for StationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.route_id, self.label())
    }
}
