//! Projection engine backed by proj4rs.

use futures::FutureExt;
use futures::future::BoxFuture;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::domain::{GeoPoint, ProjectedPoint, TranslateError};

use super::config::ProjectionConfig;

/// A loaded pair of coordinate systems that can transform points both ways.
pub struct ProjectionEngine {
    geographic: Proj,
    projected: Proj,
}

impl std::fmt::Debug for ProjectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionEngine").finish_non_exhaustive()
    }
}

impl ProjectionEngine {
    /// Build the engine from the EPSG definitions of both systems.
    pub fn from_config(config: &ProjectionConfig) -> Result<Self, TranslateError> {
        let geographic_def = definition(config.geographic_wkid)?;
        if !geographic_def.contains("+proj=longlat") {
            return Err(unavailable(format!(
                "EPSG:{} is not a geographic system",
                config.geographic_wkid
            )));
        }
        let geographic = parse_proj(config.geographic_wkid, geographic_def)?;
        let projected = parse_proj(config.projected_wkid, definition(config.projected_wkid)?)?;

        Ok(Self {
            geographic,
            projected,
        })
    }

    /// Geographic (degrees) to projected (metres).
    pub fn forward(&self, point: GeoPoint) -> Result<ProjectedPoint, TranslateError> {
        // proj4rs takes geographic input in radians, x = longitude
        let mut xyz = (point.longitude.to_radians(), point.latitude.to_radians(), 0.0);
        transform(&self.geographic, &self.projected, &mut xyz)
            .map_err(|e| unavailable(format!("transform of {point} failed: {e:?}")))?;
        Ok(ProjectedPoint::new(xyz.0, xyz.1))
    }

    /// Projected (metres) to geographic (degrees).
    pub fn inverse(&self, point: ProjectedPoint) -> Result<GeoPoint, TranslateError> {
        let mut xyz = (point.x, point.y, 0.0);
        transform(&self.projected, &self.geographic, &mut xyz)
            .map_err(|e| unavailable(format!("transform of {point} failed: {e:?}")))?;
        Ok(GeoPoint::new(xyz.1.to_degrees(), xyz.0.to_degrees()))
    }
}

/// PROJ.4 string for an EPSG code.
fn definition(wkid: u32) -> Result<&'static str, TranslateError> {
    u16::try_from(wkid)
        .ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.proj4)
        .ok_or_else(|| unavailable(format!("EPSG:{wkid} has no known definition")))
}

fn parse_proj(wkid: u32, definition: &str) -> Result<Proj, TranslateError> {
    Proj::from_proj_string(definition)
        .map_err(|e| unavailable(format!("invalid definition for EPSG:{wkid}: {e:?}")))
}

fn unavailable(message: String) -> TranslateError {
    TranslateError::ProjectionUnavailable(message)
}

/// Loads a [`ProjectionEngine`].
///
/// Each call to `load` is one load operation. The projector guarantees it
/// only calls this when no other load is in flight.
pub trait EngineLoader: Send + Sync + 'static {
    fn load(&self) -> BoxFuture<'static, Result<ProjectionEngine, TranslateError>>;
}

/// Loads the engine from the bundled EPSG definitions.
#[derive(Debug, Clone, Default)]
pub struct Proj4Loader {
    config: ProjectionConfig,
}

impl Proj4Loader {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }
}

impl EngineLoader for Proj4Loader {
    fn load(&self) -> BoxFuture<'static, Result<ProjectionEngine, TranslateError>> {
        let config = self.config;
        async move { ProjectionEngine::from_config(&config) }.boxed()
    }
}
