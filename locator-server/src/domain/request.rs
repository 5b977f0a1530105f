//! Translation requests and results.

use serde::Serialize;

use super::{ProjectedPoint, StationReference, TranslateError};

/// What the user asked to translate.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationRequest {
    /// Find the route and station nearest a projected point.
    CoordinateToReference { point: ProjectedPoint },
    /// Find the projected point of a route and station.
    ReferenceToCoordinate { reference: StationReference },
}

/// A fully resolved location: both representations of the same place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub point: ProjectedPoint,
    pub reference: StationReference,
}

/// Outcome of a translation: `Ok` is resolved, `Err` carries the reason.
pub type TranslationResult = Result<Resolution, TranslateError>;
