//! Projection configuration.

use crate::domain::{NAD83_UTM_12N_WKID, WGS84_WKID};

/// Which coordinate systems the projector converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// EPSG code of the geographic system (lat/lon in degrees)
    pub geographic_wkid: u32,
    /// EPSG code of the projected system the route network uses
    pub projected_wkid: u32,
}

impl ProjectionConfig {
    pub fn new(geographic_wkid: u32, projected_wkid: u32) -> Self {
        Self {
            geographic_wkid,
            projected_wkid,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::new(WGS84_WKID, NAD83_UTM_12N_WKID)
    }
}
