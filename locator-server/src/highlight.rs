//! Station highlight state.
//!
//! Holds the predicate that picks out the one station feature matching the
//! last resolved location. The map layer applies it as a feature effect:
//! matching features render normally, everything else is greyed out.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::trace;

use crate::domain::{StationLabel, StationReference, TranslateError};

/// Attribute on the station layer holding `{route}_{station}`.
pub const STATION_LABEL_FIELD: &str = "STATION_LABEL";

/// Effect applied to every feature the predicate excludes.
pub const EXCLUDED_EFFECT: &str = "grayscale(100%) opacity(30%)";

/// Route and station a feature must match to stay highlighted.
///
/// `station` is the label's primary station text; the offset is absent,
/// so `120+50` and `120+99` share a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightPredicate {
    pub route_id: String,
    pub station: String,
}

impl HighlightPredicate {
    pub fn from_reference(reference: &StationReference) -> Result<Self, TranslateError> {
        let station = StationLabel::match_key(&reference.label().to_string())?;
        Ok(Self {
            route_id: reference.route_id().to_string(),
            station,
        })
    }

    /// Attribute filter selecting the matching feature(s).
    pub fn where_clause(&self) -> String {
        let value = format!("{}_{}", self.route_id, self.station).replace('\'', "''");
        format!("{STATION_LABEL_FIELD} = '{value}'")
    }
}

/// Current highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HighlightState {
    Idle,
    /// `revision` increases every time a predicate is set.
    Active {
        predicate: HighlightPredicate,
        revision: u64,
    },
}

impl HighlightState {
    pub fn predicate(&self) -> Option<&HighlightPredicate> {
        match self {
            HighlightState::Idle => None,
            HighlightState::Active { predicate, .. } => Some(predicate),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: HighlightState,
    revision: u64,
}

/// Owns the highlight predicate.
///
/// Each `compute_predicate` replaces the previous predicate; the latest
/// call to reach the coordinator wins.
#[derive(Debug)]
pub struct HighlightCoordinator {
    inner: Mutex<Inner>,
}

impl Default for HighlightCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: HighlightState::Idle,
                revision: 0,
            }),
        }
    }

    /// Derive the predicate for `reference` and make it current.
    ///
    /// Returns the state installed by this call, which later calls may
    /// already have replaced by the time the caller looks.
    pub fn compute_predicate(
        &self,
        reference: &StationReference,
    ) -> Result<HighlightState, TranslateError> {
        let predicate = HighlightPredicate::from_reference(reference)?;
        let mut inner = self.lock();
        inner.revision += 1;
        trace!(
            revision = inner.revision,
            where_clause = %predicate.where_clause(),
            "highlight set"
        );
        inner.state = HighlightState::Active {
            predicate,
            revision: inner.revision,
        };
        Ok(inner.state.clone())
    }

    /// Drop the current predicate.
    pub fn clear(&self) {
        trace!("highlight cleared");
        self.lock().state = HighlightState::Idle;
    }

    pub fn current(&self) -> HighlightState {
        self.lock().state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(route: &str, station: f64, offset: f64) -> StationReference {
        StationReference::new(route, station, offset).unwrap()
    }

    fn predicate(route: &str, station: &str) -> HighlightPredicate {
        HighlightPredicate {
            route_id: route.into(),
            station: station.into(),
        }
    }

    #[test]
    fn predicate_drops_offset() {
        let coordinator = HighlightCoordinator::new();
        let state = coordinator
            .compute_predicate(&reference("SR-15", 120.0, 50.0))
            .unwrap();
        assert_eq!(state.predicate(), Some(&predicate("SR-15", "120")));

        let other = HighlightPredicate::from_reference(&reference("SR-15", 120.0, 99.0)).unwrap();
        assert_eq!(state.predicate(), Some(&other));
    }

    #[test]
    fn predicate_station_matches_label_key() {
        let r = StationReference::parse("SR-15", "12.5+3").unwrap();
        let key = StationLabel::match_key("12.5+3").unwrap();
        assert_eq!(HighlightPredicate::from_reference(&r).unwrap().station, key);
    }

    #[test]
    fn clear_returns_to_idle() {
        let coordinator = HighlightCoordinator::new();
        assert_eq!(coordinator.current(), HighlightState::Idle);

        coordinator
            .compute_predicate(&reference("SR-15", 120.0, 50.0))
            .unwrap();
        assert!(coordinator.current().predicate().is_some());

        coordinator.clear();
        assert_eq!(coordinator.current(), HighlightState::Idle);
    }

    #[test]
    fn new_predicate_replaces_old() {
        let coordinator = HighlightCoordinator::new();
        let first = coordinator
            .compute_predicate(&reference("SR-15", 1.0, 0.0))
            .unwrap();
        coordinator
            .compute_predicate(&reference("I-80", 2.0, 0.0))
            .unwrap();

        // The returned state belongs to its own call
        assert_eq!(first.predicate(), Some(&predicate("SR-15", "1")));
        assert_eq!(
            coordinator.current(),
            HighlightState::Active {
                predicate: predicate("I-80", "2"),
                revision: 2,
            }
        );
    }

    #[test]
    fn where_clause_format() {
        let p = HighlightPredicate::from_reference(&reference("0015PM", 2450.0, 35.0)).unwrap();
        assert_eq!(p.where_clause(), "STATION_LABEL = '0015PM_2450'");

        let p = HighlightPredicate::from_reference(&reference("O'Brien", 12.5, 0.0)).unwrap();
        assert_eq!(p.where_clause(), "STATION_LABEL = 'O''Brien_12.5'");
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(HighlightState::Idle).unwrap();
        assert_eq!(json["state"], "idle");

        let active = HighlightState::Active {
            predicate: predicate("SR-15", "45"),
            revision: 1,
        };
        let json = serde_json::to_value(active).unwrap();
        assert_eq!(json["state"], "active");
        assert_eq!(json["predicate"]["station"], "45");
    }
}
