use tracing::info;
use tracing_subscriber::EnvFilter;

use locator_server::cache::{CacheConfig, CachedTransport};
use locator_server::config::ServerConfig;
use locator_server::lrs::{AnyTransport, HttpTransport, LinearReferenceClient, MockTransport};
use locator_server::orchestrator::TranslationOrchestrator;
use locator_server::projection::{ProjectionConfig, SpatialProjector};
use locator_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("locator_server=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Lookup transport: canned responses if a mock directory is configured
    let transport = match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving mock lookup responses");
            AnyTransport::Mock(MockTransport::from_dir(dir).expect("Failed to load mock responses"))
        }
        None => {
            info!(base_url = %config.lrs.base_url, "using lookup service");
            AnyTransport::Http(
                HttpTransport::new(&config.lrs).expect("Failed to create lookup client"),
            )
        }
    };
    let transport = CachedTransport::new(transport, &CacheConfig::default());

    // The projection engine loads on first use
    let projector = SpatialProjector::new(ProjectionConfig::default());
    let client = LinearReferenceClient::new(transport, projector.clone(), &config.lrs);
    let locator = TranslationOrchestrator::new(projector, client);

    let app = create_router(AppState::new(locator));

    info!(addr = %config.addr, "locator listening");
    info!("  GET    /health     - Health check");
    info!("  GET    /project    - Project a map click (latitude, longitude)");
    info!("  POST   /translate  - Translate coordinates or route/station");
    info!("  GET    /highlight  - Current station highlight");
    info!("  DELETE /highlight  - Clear the highlight");

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
