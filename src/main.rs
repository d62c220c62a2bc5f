mod models;
mod service;
mod config;
mod dtos;
mod error;
mod db;
mod middleware;
mod handler;
mod routes;

use std::sync::Arc;

use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use chrono::Utc;
use config::Config;
use crate::db::{
    db::DBClient,
    session::{FileSessionStorage, MemorySessionStorage, SessionStorage},
};
use dotenv::dotenv;
use routes::create_router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use service::{auth_service::AuthService, ticket_service::TicketService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub auth_service: Arc<AuthService>,
    pub ticket_service: Arc<TicketService>,
}

impl AppState {
    pub fn new(config: Config, db_client: DBClient, storage: Arc<dyn SessionStorage>) -> Self {
        let db_client_arc = Arc::new(db_client);
        let latency = config.simulated_latency;

        let auth_service = Arc::new(AuthService::new(db_client_arc.clone(), storage, latency));
        let ticket_service = Arc::new(TicketService::new(db_client_arc.clone(), latency));

        Self {
            env: config,
            db_client: db_client_arc,
            auth_service,
            ticket_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // An empty SESSION_FILE keeps the session in memory only.
    let storage: Arc<dyn SessionStorage> = if config.session_file.as_os_str().is_empty() {
        Arc::new(MemorySessionStorage::new())
    } else {
        Arc::new(FileSessionStorage::new(config.session_file.clone()))
    };
    let app_state = Arc::new(AppState::new(
        config.clone(),
        DBClient::seeded(Utc::now()),
        storage,
    ));

    match app_state.auth_service.rehydrate().await {
        Some(user) => tracing::info!("Signed in as {} ({})", user.email, user.role.to_str()),
        None => tracing::info!("No stored session, starting signed out"),
    }

    let (users, tickets, knowledge) = app_state.db_client.stats().await;
    tracing::info!(
        "Loaded {} users, {} tickets, {} knowledge items",
        users,
        tickets,
        knowledge
    );

    let mut allowed_origins = Vec::new();
    for origin in [config.app_url.as_str(), "http://localhost:8080"] {
        match origin.parse::<HeaderValue>() {
            Ok(value) => allowed_origins.push(value),
            Err(e) => tracing::warn!("Ignoring CORS origin '{}': {}", origin, e),
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let app = create_router(app_state.clone()).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
