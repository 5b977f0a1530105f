//! Coordinate projection between geographic and projected systems.
//!
//! The projection engine is loaded lazily on first use. Concurrent
//! callers during the load share one in-flight load; a failed load is
//! retried by the next caller.

mod config;
mod engine;
mod projector;

pub use config::ProjectionConfig;
pub use engine::{EngineLoader, Proj4Loader, ProjectionEngine};
pub use projector::SpatialProjector;
