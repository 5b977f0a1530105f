//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::domain::{ErrorKind, GeoPoint, TranslateError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/project", get(project))
        .route("/translate", post(translate))
        .route("/highlight", get(current_highlight).delete(clear_highlight))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        projection_loaded: state.locator.projector().is_loaded(),
    })
}

/// Project a map click into the route network's coordinate system.
async fn project(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<PointResponse>, AppError> {
    let point = state
        .locator
        .resolve_from_coordinate(GeoPoint::new(query.latitude, query.longitude))
        .await?;
    Ok(Json(point.into()))
}

/// Translate a stationing form submission.
async fn translate(
    State(state): State<AppState>,
    Json(form): Json<TranslateForm>,
) -> Result<Json<TranslateResponse>, AppError> {
    let request = form.into_request()?;
    let translation = state.locator.translate(request).await?;
    let geo = state
        .locator
        .projector()
        .unproject(translation.resolution.point)
        .await?;
    let highlight = HighlightView::from(&translation.highlight);
    Ok(Json(TranslateResponse::new(
        &translation.resolution,
        geo,
        highlight,
    )))
}

/// Current highlight.
async fn current_highlight(State(state): State<AppState>) -> Json<HighlightView> {
    Json(HighlightView::from(&state.locator.highlight().current()))
}

/// Clear the highlight.
async fn clear_highlight(State(state): State<AppState>) -> StatusCode {
    state.locator.highlight().clear();
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Translate(TranslateError),
}

impl From<TranslateError> for AppError {
    fn from(e: TranslateError) -> Self {
        AppError::Translate(e)
    }
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Translate(e) => AppError::Translate(e),
            other => AppError::BadRequest {
                message: other.to_string(),
            },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Translate(e) => match e.kind() {
                ErrorKind::InvalidCoordinate
                | ErrorKind::MalformedStation
                | ErrorKind::EmptyRoute => StatusCode::BAD_REQUEST,
                ErrorKind::NoMatch => StatusCode::NOT_FOUND,
                ErrorKind::ServiceError => StatusCode::BAD_GATEWAY,
                ErrorKind::ProjectionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Aborted => StatusCode::NO_CONTENT,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if let AppError::Translate(e) = &self
            && !e.is_reportable()
        {
            debug!(error = %e, "suppressed");
            return StatusCode::NO_CONTENT.into_response();
        }

        let status = self.status();
        let (message, kind) = match &self {
            AppError::BadRequest { message } => (message.clone(), None),
            AppError::Translate(e) => (e.to_string(), Some(e.kind())),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            kind,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedTransport};
    use crate::lrs::{AnyTransport, LinearReferenceClient, LrsConfig, MockTransport};
    use crate::orchestrator::TranslationOrchestrator;
    use crate::projection::{ProjectionConfig, SpatialProjector};

    fn state() -> AppState {
        let mock = MockTransport::from_dir("data/mock_lrs").unwrap();
        let transport = CachedTransport::new(AnyTransport::Mock(mock), &CacheConfig::default());
        let projector = SpatialProjector::new(ProjectionConfig::default());
        let config = LrsConfig::new("http://localhost");
        let client = LinearReferenceClient::new(transport, projector.clone(), &config);
        AppState::new(TranslationOrchestrator::new(projector, client))
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (TranslateError::MalformedStation("x".into()), StatusCode::BAD_REQUEST),
            (TranslateError::EmptyRoute, StatusCode::BAD_REQUEST),
            (
                TranslateError::InvalidCoordinate {
                    latitude: 91.0,
                    longitude: 0.0,
                },
                StatusCode::BAD_REQUEST,
            ),
            (TranslateError::NoMatch, StatusCode::NOT_FOUND),
            (TranslateError::ServiceError("x".into()), StatusCode::BAD_GATEWAY),
            (
                TranslateError::ProjectionUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn aborted_is_not_reported() {
        let response = AppError::from(TranslateError::Aborted).into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn form_errors_are_bad_requests() {
        let err = AppError::from(FormError::InvalidNumber {
            field: "y",
            value: "north".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn translate_station_sets_highlight() {
        let state = state();
        let form: TranslateForm =
            serde_json::from_str(r#"{"route_id": "0015PM", "station": "2450+35"}"#).unwrap();

        let Json(response) = translate(State(state.clone()), Json(form)).await.unwrap();
        assert_eq!(response.route_id, "0015PM");
        assert_eq!(response.station, "2450+35");
        assert!(response.x > 420_000.0 && response.x < 430_000.0);
        assert!((response.latitude - 40.7608).abs() < 1e-6);
        assert!((response.longitude + 111.891).abs() < 1e-6);
        assert!(response.highlight.active);
        assert_eq!(response.highlight.revision, 1);
        assert_eq!(
            response.highlight.where_clause.as_deref(),
            Some("STATION_LABEL = '0015PM_2450'")
        );

        assert_eq!(clear_highlight(State(state.clone())).await, StatusCode::NO_CONTENT);
        let Json(view) = current_highlight(State(state)).await;
        assert!(!view.active);
    }

    #[tokio::test]
    async fn translate_coordinates() {
        let form: TranslateForm =
            serde_json::from_str(r#"{"x": "424700", "y": "4512500"}"#).unwrap();
        let Json(response) = translate(State(state()), Json(form)).await.unwrap();
        assert_eq!(response.route_id, "0015PM");
        assert_eq!(response.station, "2450+35");
    }

    #[tokio::test]
    async fn project_click() {
        let state = state();
        let Json(health_before) = health(State(state.clone())).await;
        assert!(!health_before.projection_loaded);

        let query = ProjectQuery {
            latitude: 40.0,
            longitude: -111.0,
        };
        let Json(point) = project(State(state.clone()), Query(query)).await.unwrap();
        assert!((point.x - 500_000.0).abs() < 0.01);

        let Json(health_after) = health(State(state)).await;
        assert!(health_after.projection_loaded);
    }
}
