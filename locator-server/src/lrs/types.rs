//! Lookup service request and response DTOs.
//!
//! Response types map directly to the service JSON. Fields the service
//! sometimes omits are `Option` or default to empty.

use serde::Deserialize;
use serde_json::json;

use crate::domain::ProjectedPoint;

use super::error::LookupError;

/// Which lookup endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Point in, route and station out
    GeometryToStation,
    /// Route and station in, point out
    StationToGeometry,
}

impl Operation {
    /// Endpoint name, also used for mock fixture file names.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::GeometryToStation => "geometryToStation",
            Operation::StationToGeometry => "stationToGeometry",
        }
    }
}

/// One outbound lookup request.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub operation: Operation,
    /// JSON-encoded `locations` array
    pub locations: String,
    /// Spatial reference of the input geometry, if any
    pub in_wkid: Option<u32>,
    /// Spatial reference the response should use
    pub out_wkid: u32,
}

impl LookupRequest {
    /// Request the station nearest a projected point.
    pub fn geometry_to_station(point: ProjectedPoint, in_wkid: u32, out_wkid: u32) -> Self {
        let locations = json!([{
            "routeId": "",
            "geometry": { "x": point.x, "y": point.y },
        }]);

        Self {
            operation: Operation::GeometryToStation,
            locations: locations.to_string(),
            in_wkid: Some(in_wkid),
            out_wkid,
        }
    }

    /// Request the point at a station. The offset is never sent.
    pub fn station_to_geometry(route_id: &str, station: f64, out_wkid: u32) -> Self {
        let locations = json!([{
            "routeId": route_id,
            "station": station,
        }]);

        Self {
            operation: Operation::StationToGeometry,
            locations: locations.to_string(),
            in_wkid: None,
            out_wkid,
        }
    }

    /// Query string parameters, in the order the service documents them.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("locations", self.locations.clone())];
        if let Some(in_wkid) = self.in_wkid {
            query.push(("inSR", in_wkid.to_string()));
        }
        query.push(("outSR", self.out_wkid.to_string()));
        query.push(("f", "json".to_string()));
        query
    }

    /// Stable key identifying this request, for caching.
    pub fn cache_key(&self) -> String {
        let params = self
            .query()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.operation.endpoint(), params)
    }
}

/// Top-level response from either lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsEnvelope {
    /// One entry per requested location.
    #[serde(default)]
    pub locations: Vec<LocationEntry>,

    /// Spatial reference of returned geometries.
    pub spatial_reference: Option<SpatialReferenceDto>,

    /// Present when the service rejected the request.
    pub error: Option<ServiceErrorDto>,
}

impl LocationsEnvelope {
    /// Parse a response body, turning error envelopes into errors.
    pub fn parse(body: &str) -> Result<Self, LookupError> {
        let envelope: LocationsEnvelope =
            serde_json::from_str(body).map_err(|e| LookupError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if let Some(error) = envelope.error {
            let mut message = error.message;
            if !error.details.is_empty() {
                message = format!("{message} ({})", error.details.join("; "));
            }
            return Err(LookupError::Service {
                code: error.code.unwrap_or(0),
                message,
            });
        }

        Ok(envelope)
    }

    /// Spatial reference the geometries are expressed in, if reported.
    pub fn wkid(&self) -> Option<u32> {
        self.spatial_reference
            .as_ref()
            .and_then(|sr| sr.latest_wkid.or(sr.wkid))
    }
}

/// Result set for one requested location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    /// Route id echoed back by `stationToGeometry`.
    #[serde(alias = "routeID")]
    pub route_id: Option<String>,

    /// Candidates from `geometryToStation`.
    #[serde(default)]
    pub results: Vec<StationResultDto>,

    /// Geometries from `stationToGeometry`.
    #[serde(default)]
    pub geometries: Vec<PointDto>,
}

/// A route/station candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResultDto {
    pub station: StationValue,

    /// Empty when the service only reports the route on the entry.
    #[serde(default, alias = "routeID")]
    pub route_id: String,

    pub geometry: Option<PointDto>,
}

/// Stations come back either as label text ("45+00") or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StationValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReferenceDto {
    pub wkid: Option<u32>,
    pub latest_wkid: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorDto {
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}
