//! Linear reference client.
//!
//! Issues translation requests through a [`LookupTransport`] and maps the
//! first candidate of each response into domain types. Geometries the
//! service reports in geographic coordinates are projected before they
//! are returned. Geometries with no reported spatial reference that are
//! not valid latitude/longitude are taken as already projected.

use tracing::{debug, warn};

use crate::domain::{
    GeoPoint, NAD83_UTM_12N_WKID, ProjectedPoint, Resolution, StationLabel, StationReference,
    TranslateError, TranslationResult, WGS84_WKID,
};
use crate::projection::SpatialProjector;

use super::transport::LookupTransport;
use super::types::{LocationEntry, LocationsEnvelope, LookupRequest, PointDto, StationValue};

/// Default endpoint paths, relative to the base URL.
const DEFAULT_GEOMETRY_TO_STATION: &str = "geometryToStation";
const DEFAULT_STATION_TO_GEOMETRY: &str = "stationToGeometry";

/// Configuration for the lookup service.
#[derive(Debug, Clone)]
pub struct LrsConfig {
    /// Base URL of the service, e.g. `.../MapServer/exts/LRSServer/networkLayers/1`
    pub base_url: String,
    /// Path of the point-to-station endpoint
    pub geometry_to_station_path: String,
    /// Path of the station-to-point endpoint
    pub station_to_geometry_path: String,
    /// Spatial reference of points sent to the service
    pub input_wkid: u32,
    /// Spatial reference requested for returned geometries
    pub output_wkid: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LrsConfig {
    /// Create a new config for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            geometry_to_station_path: DEFAULT_GEOMETRY_TO_STATION.to_string(),
            station_to_geometry_path: DEFAULT_STATION_TO_GEOMETRY.to_string(),
            input_wkid: NAD83_UTM_12N_WKID,
            output_wkid: WGS84_WKID,
            timeout_secs: 30,
        }
    }

    /// Set custom endpoint paths.
    pub fn with_paths(
        mut self,
        geometry_to_station: impl Into<String>,
        station_to_geometry: impl Into<String>,
    ) -> Self {
        self.geometry_to_station_path = geometry_to_station.into();
        self.station_to_geometry_path = station_to_geometry.into();
        self
    }

    /// Set the spatial reference requested for returned geometries.
    pub fn with_output_wkid(mut self, wkid: u32) -> Self {
        self.output_wkid = wkid;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client translating between points and station references.
///
/// Multi-candidate responses are not disambiguated: the first candidate
/// the service returns is the answer, and the rest are discarded.
#[derive(Debug)]
pub struct LinearReferenceClient<T> {
    transport: T,
    projector: SpatialProjector,
    input_wkid: u32,
    output_wkid: u32,
}

impl<T: LookupTransport> LinearReferenceClient<T> {
    pub fn new(transport: T, projector: SpatialProjector, config: &LrsConfig) -> Self {
        Self {
            transport,
            projector,
            input_wkid: config.input_wkid,
            output_wkid: config.output_wkid,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Find the route and station at a projected point.
    pub async fn coordinate_to_reference(&self, point: ProjectedPoint) -> TranslationResult {
        debug!(%point, "looking up station for point");
        let request = LookupRequest::geometry_to_station(point, self.input_wkid, self.output_wkid);
        let envelope = self.fetch(&request).await?;

        let entry = first_entry(&envelope)?;
        let Some(result) = entry.results.first() else {
            return Err(TranslateError::NoMatch);
        };
        if entry.results.len() > 1 {
            debug!(
                discarded = entry.results.len() - 1,
                "multiple candidates, using the first"
            );
        }

        let route_id = if result.route_id.trim().is_empty() {
            entry.route_id.clone().unwrap_or_default()
        } else {
            result.route_id.clone()
        };
        let label = match &result.station {
            StationValue::Text(text) => StationLabel::parse(text)?,
            StationValue::Number(station) => StationLabel {
                station: *station,
                offset: 0.0,
            },
        };
        let reference = StationReference::from_label(route_id, label)?;

        // Without a geometry the request point is the best answer we have
        let point = match result.geometry {
            Some(geometry) => self.normalize(geometry, envelope.wkid()).await?,
            None => point,
        };

        Ok(Resolution { point, reference })
    }

    /// Find the projected point of a station reference.
    ///
    /// Only the route id and station are sent; the offset is display-only.
    pub async fn reference_to_coordinate(&self, reference: &StationReference) -> TranslationResult {
        debug!(%reference, "looking up point for station");
        let request = LookupRequest::station_to_geometry(
            reference.route_id(),
            reference.station(),
            self.output_wkid,
        );
        let envelope = self.fetch(&request).await?;

        let entry = first_entry(&envelope)?;
        let Some(geometry) = entry.geometries.first() else {
            return Err(TranslateError::NoMatch);
        };
        if let Some(route_id) = &entry.route_id
            && route_id != reference.route_id()
        {
            debug!(
                requested = reference.route_id(),
                returned = %route_id,
                "service echoed a different route id"
            );
        }

        let point = self.normalize(*geometry, envelope.wkid()).await?;
        Ok(Resolution {
            point,
            reference: reference.clone(),
        })
    }

    async fn fetch(&self, request: &LookupRequest) -> Result<LocationsEnvelope, TranslateError> {
        let body = self.transport.fetch(request).await.map_err(|e| {
            warn!(operation = request.operation.endpoint(), error = %e, "lookup failed");
            TranslateError::from(e)
        })?;
        Ok(LocationsEnvelope::parse(&body)?)
    }

    /// Bring a returned geometry into the projected system.
    ///
    /// `reported` is the spatial reference from the response envelope.
    /// Without one, the requested output system is assumed unless the
    /// values cannot be latitude/longitude.
    async fn normalize(
        &self,
        geometry: PointDto,
        reported: Option<u32>,
    ) -> Result<ProjectedPoint, TranslateError> {
        let config = self.projector.config();
        let geo = GeoPoint::new(geometry.y, geometry.x);

        let wkid = match reported {
            Some(wkid) => wkid,
            None if geo.validate().is_err() => {
                debug!(x = geometry.x, y = geometry.y, "unlabelled geometry is projected");
                config.projected_wkid
            }
            None => self.output_wkid,
        };

        if wkid == config.projected_wkid {
            return Ok(ProjectedPoint::new(geometry.x, geometry.y));
        }
        if wkid != config.geographic_wkid {
            return Err(TranslateError::ServiceError(format!(
                "unsupported spatial reference EPSG:{wkid} in response"
            )));
        }

        self.projector.project(geo).await.map_err(|e| match e {
            TranslateError::InvalidCoordinate { .. } => {
                TranslateError::ServiceError(format!("service returned {e}"))
            }
            other => other,
        })
    }
}

/// The entry for the single location we asked about.
fn first_entry(envelope: &LocationsEnvelope) -> Result<&LocationEntry, TranslateError> {
    envelope.locations.first().ok_or(TranslateError::NoMatch)
}
