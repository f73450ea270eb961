pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::classify::ClassificationService;
use crate::tickets::TicketStore;

pub use error::ApiError;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TicketStore>,
    pub classifier: Arc<ClassificationService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>, classifier: Arc<ClassificationService>) -> Self {
        Self { store, classifier }
    }
}

/// Ticket API router. Every ticket route answers with and without a trailing slash.
pub fn router(state: AppState) -> Router {
    use handlers::*;

    Router::new()
        .route("/health", get(health))
        // Collection
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route("/api/tickets/", get(list_tickets).post(create_ticket))
        // Aggregates and classification
        .route("/api/tickets/stats", get(ticket_stats))
        .route("/api/tickets/stats/", get(ticket_stats))
        .route("/api/tickets/classify", post(classify_ticket))
        .route("/api/tickets/classify/", post(classify_ticket))
        // Single ticket
        .route("/api/tickets/{id}", get(get_ticket).patch(update_ticket))
        .route("/api/tickets/{id}/", get(get_ticket).patch(update_ticket))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the API until Ctrl-C
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Ticket API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
