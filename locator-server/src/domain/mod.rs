//! Domain types for the locator.
//!
//! Points, station references and the error taxonomy shared by every
//! layer. Types validate at construction, so code holding a
//! `StationReference` can trust its route id and station.

mod error;
mod point;
mod request;
mod station;

pub use error::{ErrorKind, TranslateError};
pub use point::{GeoPoint, NAD83_UTM_12N_WKID, ProjectedPoint, WGS84_WKID};
pub use request::{Resolution, TranslationRequest, TranslationResult};
pub use station::{StationLabel, StationReference};
