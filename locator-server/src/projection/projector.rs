//! Lazily-loaded spatial projector.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{info, warn};

use crate::domain::{GeoPoint, ProjectedPoint, TranslateError};

use super::config::ProjectionConfig;
use super::engine::{EngineLoader, Proj4Loader, ProjectionEngine};

type EngineResult = Result<Arc<ProjectionEngine>, TranslateError>;
type SharedLoad = Shared<BoxFuture<'static, EngineResult>>;

/// Lifecycle of the projection engine.
enum LoadState {
    Uninitialized,
    /// Every caller arriving during the load awaits this same future.
    Loading(SharedLoad),
    Ready(Arc<ProjectionEngine>),
    /// The last load failed; the next caller starts a new one.
    Failed(TranslateError),
}

/// Converts points between the geographic and projected systems.
///
/// Cloning is cheap and clones share the same engine.
#[derive(Clone)]
pub struct SpatialProjector {
    config: ProjectionConfig,
    loader: Arc<dyn EngineLoader>,
    state: Arc<Mutex<LoadState>>,
}

impl SpatialProjector {
    /// Create a projector that loads proj4rs definitions for `config`.
    pub fn new(config: ProjectionConfig) -> Self {
        Self::with_loader(config, Proj4Loader::new(config))
    }

    /// Create a projector with a custom engine loader.
    pub fn with_loader(config: ProjectionConfig, loader: impl EngineLoader) -> Self {
        Self {
            config,
            loader: Arc::new(loader),
            state: Arc::new(Mutex::new(LoadState::Uninitialized)),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Whether the engine has finished loading.
    pub fn is_loaded(&self) -> bool {
        matches!(*lock(&self.state), LoadState::Ready(_))
    }

    /// Project a geographic point into the projected system.
    pub async fn project(&self, point: GeoPoint) -> Result<ProjectedPoint, TranslateError> {
        point.validate()?;
        self.engine().await?.forward(point)
    }

    /// Convert a projected point back to geographic coordinates.
    pub async fn unproject(&self, point: ProjectedPoint) -> Result<GeoPoint, TranslateError> {
        self.engine().await?.inverse(point)
    }

    async fn engine(&self) -> EngineResult {
        let load = {
            let mut state = lock(&self.state);
            match &*state {
                LoadState::Ready(engine) => return Ok(Arc::clone(engine)),
                LoadState::Loading(load) => load.clone(),
                LoadState::Uninitialized | LoadState::Failed(_) => {
                    let load = self.start_load();
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };

        load.await
    }

    /// Begin one load operation. Must be called with the state locked.
    fn start_load(&self) -> SharedLoad {
        let state = Arc::clone(&self.state);
        let load = self.loader.load();
        let config = self.config;

        async move {
            let result = match load.await {
                Ok(engine) => Ok(Arc::new(engine)),
                Err(TranslateError::ProjectionUnavailable(reason)) => {
                    Err(TranslateError::ProjectionUnavailable(reason))
                }
                Err(other) => Err(TranslateError::ProjectionUnavailable(other.to_string())),
            };

            let mut state = lock(&state);
            match &result {
                Ok(engine) => {
                    info!(
                        geographic = config.geographic_wkid,
                        projected = config.projected_wkid,
                        "projection engine loaded"
                    );
                    *state = LoadState::Ready(Arc::clone(engine));
                }
                Err(e) => {
                    warn!(error = %e, "projection engine failed to load");
                    *state = LoadState::Failed(e.clone());
                }
            }

            result
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for SpatialProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*lock(&self.state) {
            LoadState::Uninitialized => "uninitialized",
            LoadState::Loading(_) => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        };
        f.debug_struct("SpatialProjector")
            .field("config", &self.config)
            .field("state", &state)
            .finish()
    }
}

fn lock(state: &Mutex<LoadState>) -> MutexGuard<'_, LoadState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
