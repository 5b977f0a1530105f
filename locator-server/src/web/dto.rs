//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ErrorKind, GeoPoint, ProjectedPoint, Resolution, StationReference, TranslateError,
    TranslationRequest,
};
use crate::highlight::{EXCLUDED_EFFECT, HighlightState};

/// Query for projecting a map click.
#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// A point in the projected system.
#[derive(Debug, Serialize, PartialEq)]
pub struct PointResponse {
    pub x: f64,
    pub y: f64,
}

impl From<ProjectedPoint> for PointResponse {
    fn from(point: ProjectedPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

/// A form field, sent either as typed text or as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    fn as_text(&self) -> String {
        match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.trim().to_string(),
        }
    }
}

/// Stationing form submission: either coordinates or a route and station.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TranslateForm {
    Coordinates { x: FormValue, y: FormValue },
    Station { route_id: String, station: FormValue },
}

impl TranslateForm {
    /// Parse the raw form fields into a request.
    pub fn into_request(self) -> Result<TranslationRequest, FormError> {
        match self {
            TranslateForm::Coordinates { x, y } => {
                let x = parse_coordinate("x", &x)?;
                let y = parse_coordinate("y", &y)?;
                Ok(TranslationRequest::CoordinateToReference {
                    point: ProjectedPoint::new(x, y),
                })
            }
            TranslateForm::Station { route_id, station } => {
                let reference = StationReference::parse(route_id, &station.as_text())?;
                Ok(TranslationRequest::ReferenceToCoordinate { reference })
            }
        }
    }
}

fn parse_coordinate(field: &'static str, value: &FormValue) -> Result<f64, FormError> {
    let text = value.as_text();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FormError::InvalidNumber { field, value: text })
}

/// Form fields that failed to parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Result of a successful translation.
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub route_id: String,
    /// Station label, e.g. "120+50"
    pub station: String,
    pub x: f64,
    pub y: f64,
    /// Geographic position of the same point, for centring the map
    pub latitude: f64,
    pub longitude: f64,
    pub highlight: HighlightView,
}

impl TranslateResponse {
    pub fn new(resolution: &Resolution, geo: GeoPoint, highlight: HighlightView) -> Self {
        Self {
            route_id: resolution.reference.route_id().to_string(),
            station: resolution.reference.label().to_string(),
            x: resolution.point.x,
            y: resolution.point.y,
            latitude: geo.latitude,
            longitude: geo.longitude,
            highlight,
        }
    }
}

/// Highlight as the map layer needs it.
#[derive(Debug, Serialize, PartialEq)]
pub struct HighlightView {
    pub active: bool,
    pub route_id: Option<String>,
    pub station: Option<String>,
    /// Feature filter for the station layer
    pub where_clause: Option<String>,
    /// Effect for features the filter excludes
    pub excluded_effect: Option<&'static str>,
    pub revision: u64,
}

impl From<&HighlightState> for HighlightView {
    fn from(state: &HighlightState) -> Self {
        match state {
            HighlightState::Idle => Self {
                active: false,
                route_id: None,
                station: None,
                where_clause: None,
                excluded_effect: None,
                revision: 0,
            },
            HighlightState::Active {
                predicate,
                revision,
            } => Self {
                active: true,
                route_id: Some(predicate.route_id.clone()),
                station: Some(predicate.station.clone()),
                where_clause: Some(predicate.where_clause()),
                excluded_effect: Some(EXCLUDED_EFFECT),
                revision: *revision,
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub projection_loaded: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: Option<ErrorKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightPredicate;

    fn form(json: &str) -> TranslateForm {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn coordinate_form_from_text() {
        let request = form(r#"{"x": " 500000 ", "y": "4500000.5"}"#)
            .into_request()
            .unwrap();
        assert_eq!(
            request,
            TranslationRequest::CoordinateToReference {
                point: ProjectedPoint::new(500000.0, 4500000.5)
            }
        );
    }

    #[test]
    fn coordinate_form_from_numbers() {
        let request = form(r#"{"x": 1.5, "y": 2}"#).into_request().unwrap();
        assert_eq!(
            request,
            TranslationRequest::CoordinateToReference {
                point: ProjectedPoint::new(1.5, 2.0)
            }
        );
    }

    #[test]
    fn coordinate_form_rejects_text() {
        let err = form(r#"{"x": "east", "y": "1"}"#).into_request().unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidNumber {
                field: "x",
                value: "east".into()
            }
        );
        assert_eq!(err.to_string(), "x must be a number, got \"east\"");
    }

    #[test]
    fn station_form() {
        let request = form(r#"{"route_id": "SR-15", "station": "120+50"}"#)
            .into_request()
            .unwrap();
        match request {
            TranslationRequest::ReferenceToCoordinate { reference } => {
                assert_eq!(reference.route_id(), "SR-15");
                assert_eq!(reference.station(), 120.0);
                assert_eq!(reference.offset(), 50.0);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn station_form_errors() {
        let err = form(r#"{"route_id": "SR-15", "station": "abc"}"#)
            .into_request()
            .unwrap_err();
        assert_eq!(
            err,
            FormError::Translate(TranslateError::MalformedStation("abc".into()))
        );

        let err = form(r#"{"route_id": "", "station": "1"}"#)
            .into_request()
            .unwrap_err();
        assert_eq!(err, FormError::Translate(TranslateError::EmptyRoute));
    }

    #[test]
    fn translate_response_uses_label() {
        let resolution = Resolution {
            point: ProjectedPoint::new(1.0, 2.0),
            reference: StationReference::new("SR-15", 120.0, 50.0).unwrap(),
        };
        let idle = HighlightView::from(&HighlightState::Idle);
        let response = TranslateResponse::new(&resolution, GeoPoint::new(40.0, -111.0), idle);
        assert_eq!(response.route_id, "SR-15");
        assert_eq!(response.station, "120+50");
        assert_eq!((response.x, response.y), (1.0, 2.0));
        assert_eq!((response.latitude, response.longitude), (40.0, -111.0));
    }

    #[test]
    fn highlight_view_active() {
        let state = HighlightState::Active {
            predicate: HighlightPredicate {
                route_id: "SR-15".into(),
                station: "45".into(),
            },
            revision: 3,
        };
        let view = HighlightView::from(&state);
        assert!(view.active);
        assert_eq!(view.station.as_deref(), Some("45"));
        assert_eq!(view.where_clause.as_deref(), Some("STATION_LABEL = 'SR-15_45'"));
        assert_eq!(view.excluded_effect, Some("grayscale(100%) opacity(30%)"));
        assert_eq!(view.revision, 3);

        let idle = HighlightView::from(&HighlightState::Idle);
        assert!(!idle.active);
        assert_eq!(idle.where_clause, None);
    }
}
