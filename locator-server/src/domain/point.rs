//! Geographic and projected points.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TranslateError;

/// WGS84 geographic coordinates (latitude/longitude in degrees).
pub const WGS84_WKID: u32 = 4326;

/// NAD83 / UTM zone 12N, the projected system the route network uses.
pub const NAD83_UTM_12N_WKID: u32 = 26912;

/// A position in the geographic coordinate system, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that latitude is in [-90, 90] and longitude in [-180, 180].
    ///
    /// NaN fails both range checks.
    pub fn validate(&self) -> Result<(), TranslateError> {
        let lat_ok = (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(TranslateError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A position in the projected coordinate system, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ProjectedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ranges_include_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).validate().is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).validate().is_ok());
        assert!(GeoPoint::new(40.7608, -111.891).validate().is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = GeoPoint::new(90.5, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            TranslateError::InvalidCoordinate {
                latitude: 90.5,
                longitude: 0.0
            }
        );
        assert!(GeoPoint::new(0.0, -180.01).validate().is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(ProjectedPoint::new(500000.0, 4500000.0).to_string(), "(500000, 4500000)");
        assert_eq!(GeoPoint::new(40.5, -111.0).to_string(), "(40.5, -111)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn in_range_always_valid(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            prop_assert!(GeoPoint::new(lat, lon).validate().is_ok());
        }

        #[test]
        fn latitude_out_of_range_rejected(lat in prop_oneof![90.0001f64..1e6, -1e6f64..-90.0001], lon in -180.0f64..=180.0) {
            prop_assert!(GeoPoint::new(lat, lon).validate().is_err());
        }

        #[test]
        fn longitude_out_of_range_rejected(lat in -90.0f64..=90.0, lon in prop_oneof![180.0001f64..1e6, -1e6f64..-180.0001]) {
            prop_assert!(GeoPoint::new(lat, lon).validate().is_err());
        }
    }
}
