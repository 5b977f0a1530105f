//! Translation error taxonomy.
//!
//! These errors are returned to whoever asked for a translation. Only
//! `Aborted` is meant to be hidden from the user.

use serde::Serialize;

/// Errors produced while translating between coordinates and stations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    /// Latitude or longitude outside the valid geographic range
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The projection engine could not be loaded or failed to transform
    #[error("projection unavailable: {0}")]
    ProjectionUnavailable(String),

    /// Station text could not be parsed
    #[error("malformed station: {0}")]
    MalformedStation(String),

    /// A station reference was built without a route id
    #[error("route id must not be empty")]
    EmptyRoute,

    /// The lookup service returned zero results
    #[error("no matching location found")]
    NoMatch,

    /// Transport or protocol failure talking to the lookup service
    #[error("lookup service error: {0}")]
    ServiceError(String),

    /// Superseded by a newer request
    #[error("superseded by a newer request")]
    Aborted,
}

/// Fieldless discriminant of [`TranslateError`], for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCoordinate,
    ProjectionUnavailable,
    MalformedStation,
    EmptyRoute,
    NoMatch,
    ServiceError,
    Aborted,
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
            TranslateError::ProjectionUnavailable(_) => ErrorKind::ProjectionUnavailable,
            TranslateError::MalformedStation(_) => ErrorKind::MalformedStation,
            TranslateError::EmptyRoute => ErrorKind::EmptyRoute,
            TranslateError::NoMatch => ErrorKind::NoMatch,
            TranslateError::ServiceError(_) => ErrorKind::ServiceError,
            TranslateError::Aborted => ErrorKind::Aborted,
        }
    }

    /// Whether this error should be shown to the user.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, TranslateError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TranslateError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "coordinate out of range: latitude 91, longitude 0"
        );

        let err = TranslateError::MalformedStation("abc".into());
        assert_eq!(err.to_string(), "malformed station: abc");

        let err = TranslateError::NoMatch;
        assert_eq!(err.to_string(), "no matching location found");

        let err = TranslateError::ServiceError("HTTP error: timeout".into());
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn only_aborted_is_hidden() {
        assert!(!TranslateError::Aborted.is_reportable());
        assert!(TranslateError::NoMatch.is_reportable());
        assert!(TranslateError::EmptyRoute.is_reportable());
        assert!(TranslateError::ProjectionUnavailable("x".into()).is_reportable());
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(TranslateError::NoMatch.kind(), ErrorKind::NoMatch);
        assert_eq!(
            TranslateError::ServiceError("x".into()).kind(),
            ErrorKind::ServiceError
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::MalformedStation).unwrap(),
            "\"malformed_station\""
        );
    }
}
