//! Application state, routing and the serve loop shared by the binary and the tests.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::JwtKeys;
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, UniversityStore, UserStore};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{UniversityService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub universities: UniversityService,
    pub users: UserService,
    pub jwt: JwtKeys,
    database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        universities: Arc<dyn UniversityStore>,
        users: Arc<dyn UserStore>,
    ) -> anyhow::Result<Self> {
        let jwt = JwtKeys::from_config(&config.security).context("invalid JWT configuration")?;
        Ok(Self {
            config: Arc::new(config),
            universities: UniversityService::new(universities),
            users: UserService::new(users, jwt.clone()),
            jwt,
            database: None,
        })
    }

    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// Builds the storage collaborator selected in the configuration
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Self::in_memory(config)
            }
            StorageBackend::Postgres => {
                let manager = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to postgres")?;
                manager.migrate().await.context("failed to bootstrap schema")?;

                let store = Arc::new(PgStore::new(manager.pool()));
                tracing::info!("Using postgres storage");
                let mut state = Self::new(config, store.clone(), store)?;
                state.database = Some(manager);
                Ok(state)
            }
        }
    }

    /// Releases the postgres pool, if any
    pub async fn close(&self) {
        if let Some(manager) = &self.database {
            manager.close().await;
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    let mut app = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
                .layer(cors),
        );

    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/auth/register", post(public::register_post))
        .route("/api/auth/login", post(public::login_post))
        .route("/university", get(public::university_list))
        .route("/university/:id", get(public::university_show))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/university", post(protected::university_create))
        .route(
            "/university/:id",
            axum::routing::put(protected::university_update).delete(protected::university_delete),
        )
        .route("/university/bookmark/:id", post(protected::university_bookmark))
        .route("/university/restore/:id", post(protected::university_restore))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Serves until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "University API listening");

    let served = axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error");

    state.close().await;
    tracing::info!("University API stopped");
    served
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
