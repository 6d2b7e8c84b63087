use std::{net::SocketAddr, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, DatabaseConfig, DatabaseKind};
use migration::MigratorTrait;
use service::store::{memory::MemoryDocumentStore, seaorm::SeaOrmDocumentStore, DocumentStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Open the document store named by `database.url`, running migrations for Postgres.
pub async fn connect_store(cfg: &DatabaseConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match cfg.kind()? {
        DatabaseKind::Memory => {
            warn!(event = "memory_store", "using in-memory document store; data is lost on exit");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        DatabaseKind::Postgres => {
            let db = models::db::connect(cfg).await?;
            migration::Migrator::up(&db, None).await?;
            info!(event = "migrations_applied", "document schema is up to date");
            Ok(Arc::new(SeaOrmDocumentStore::new(db)))
        }
    }
}

/// Credentialed CORS for the configured front-end origins.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o.trim())
                .map_err(|_| StartupError::InvalidConfig(format!("invalid cors origin: {o}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}

/// Assemble the router over an already opened store.
pub fn build_app_with_store(cfg: &AppConfig, store: Arc<dyn DocumentStore>) -> Result<Router, StartupError> {
    let state = AppState::new(store, &cfg.auth)?;
    let cors = build_cors(&cfg.server.cors_origins)?;
    Ok(routes::build_router(state, cors))
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = connect_store(&cfg.database).await?;
    Ok(build_app_with_store(cfg, store)?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, event = "listening", "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_unparseable_origin() {
        assert!(build_cors(&["http://localhost:5173".into()]).is_ok());
        assert!(build_cors(&["bad\norigin".into()]).is_err());
    }

    #[tokio::test]
    async fn memory_url_opens_memory_store() {
        let cfg = DatabaseConfig { url: configs::MEMORY_DATABASE_URL.into(), ..Default::default() };
        assert!(connect_store(&cfg).await.is_ok());
    }
}
