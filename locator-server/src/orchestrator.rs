//! Translation orchestrator.
//!
//! Entry point for user actions. A map click is projected straight into
//! the route network's coordinate system; a form submission goes through
//! the lookup service, and a successful result becomes the new highlight.
//!
//! Highlight updates happen at the moment each lookup settles, so with
//! several submissions in flight the one that settles last owns the
//! final highlight. A failed lookup leaves the previous highlight alone.

use tracing::{debug, warn};

use crate::domain::{
    GeoPoint, ProjectedPoint, Resolution, TranslateError, TranslationRequest, TranslationResult,
};
use crate::highlight::{HighlightCoordinator, HighlightState};
use crate::lrs::{LinearReferenceClient, LookupTransport};
use crate::projection::SpatialProjector;

/// A resolved form submission and the highlight it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub resolution: Resolution,
    pub highlight: HighlightState,
}

/// Coordinates projection, lookups and highlight state.
#[derive(Debug)]
pub struct TranslationOrchestrator<T> {
    projector: SpatialProjector,
    client: LinearReferenceClient<T>,
    highlight: HighlightCoordinator,
}

impl<T: LookupTransport> TranslationOrchestrator<T> {
    pub fn new(projector: SpatialProjector, client: LinearReferenceClient<T>) -> Self {
        Self {
            projector,
            client,
            highlight: HighlightCoordinator::new(),
        }
    }

    pub fn projector(&self) -> &SpatialProjector {
        &self.projector
    }

    pub fn client(&self) -> &LinearReferenceClient<T> {
        &self.client
    }

    pub fn highlight(&self) -> &HighlightCoordinator {
        &self.highlight
    }

    /// Map click: project the clicked point. No lookup is made.
    pub async fn resolve_from_coordinate(
        &self,
        point: GeoPoint,
    ) -> Result<ProjectedPoint, TranslateError> {
        self.projector.project(point).await
    }

    /// Form submission: translate via the lookup service.
    pub async fn resolve_from_form(&self, request: TranslationRequest) -> TranslationResult {
        self.translate(request).await.map(|t| t.resolution)
    }

    /// Like [`resolve_from_form`](Self::resolve_from_form), also returning
    /// the highlight this request installed.
    pub async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<Translation, TranslateError> {
        let result = match &request {
            TranslationRequest::CoordinateToReference { point } => {
                self.client.coordinate_to_reference(*point).await
            }
            TranslationRequest::ReferenceToCoordinate { reference } => {
                self.client.reference_to_coordinate(reference).await
            }
        };

        let resolution = result.inspect_err(|e| {
            warn!(?request, error = %e, "translation failed");
        })?;
        let highlight = self.highlight.compute_predicate(&resolution.reference)?;
        debug!(
            reference = %resolution.reference,
            point = %resolution.point,
            ?highlight,
            "resolved"
        );

        Ok(Translation {
            resolution,
            highlight,
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
