use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripgate_api::auth::{SessionAuth, TokenVerifier};
use tripgate_api::submit::SubmitClient;
use tripgate_api::{app, AppState};
use tripgate_core::{AccessGuard, SessionCache};
use tripgate_store::app_config::Config;
use tripgate_store::PgRecordStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripgate_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting tripgate API on port {}", config.server.port);

    let store = Arc::new(
        PgRecordStore::connect(&config.database.url)
            .await
            .expect("Failed to connect to reservation store"),
    );

    let auth = Arc::new(SessionAuth::new());
    let cache = Arc::new(SessionCache::new());
    let guard = Arc::new(AccessGuard::new(auth.clone(), store, cache.clone()));

    let state = AppState {
        auth,
        cache,
        guard,
        verifier: TokenVerifier::new(config.auth.jwt_secret.clone()),
        submit: SubmitClient::new(config.submission.clone()),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}
