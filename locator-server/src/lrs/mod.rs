//! Linear referencing service client.
//!
//! Talks to an external route lookup service (ArcGIS-style
//! `geometryToStation` / `stationToGeometry` endpoints) and maps its
//! responses into domain types.
//!
//! Key characteristics of the service:
//! - Requests carry a JSON-encoded `locations` array as a query parameter
//! - A response may hold several candidates; only the first is used
//! - Errors may arrive as an `{"error": {...}}` envelope with HTTP 200

mod client;
mod error;
mod mock;
mod transport;
mod types;

pub use client::{LinearReferenceClient, LrsConfig};
pub use error::LookupError;
pub use mock::MockTransport;
pub use transport::{AnyTransport, HttpTransport, LookupTransport};
pub use types::{
    LocationEntry, LocationsEnvelope, LookupRequest, Operation, PointDto, ServiceErrorDto,
    SpatialReferenceDto, StationResultDto, StationValue,
};
