use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::{error::ApiError, AppState};
use crate::classify::{ClassificationRequest, ClassificationResult, MIN_DESCRIPTION_CHARS};
use crate::tickets::{NewTicket, Ticket, TicketFilter, TicketStats, TicketUpdate};

pub const CLASSIFICATION_UNAVAILABLE: &str =
    "Classification unavailable. Please select category and priority manually.";

type ApiResult<T> = Result<T, ApiError>;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let Json(new_ticket) = payload?;
    let ticket = state.store.create(new_ticket).await?;
    info!("Created ticket {}", ticket.id);
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store.list(&filter).await?))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Ticket>> {
    let Path(id) = id.map_err(|_| ApiError::not_found("Ticket not found"))?;
    Ok(Json(state.store.get(id).await?))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<TicketUpdate>, JsonRejection>,
) -> ApiResult<Json<Ticket>> {
    let Path(id) = id.map_err(|_| ApiError::not_found("Ticket not found"))?;
    let Json(update) = payload?;
    let ticket = state.store.update(id, update).await?;
    info!("Updated ticket {}", ticket.id);
    Ok(Json(ticket))
}

pub async fn ticket_stats(State(state): State<AppState>) -> ApiResult<Json<TicketStats>> {
    Ok(Json(state.store.stats().await?))
}

/// Suggest a category and priority for a description.
///
/// Answers 503 when classification is unavailable so the client can fall
/// back to manual selection.
pub async fn classify_ticket(
    State(state): State<AppState>,
    payload: Result<Json<ClassificationRequest>, JsonRejection>,
) -> ApiResult<Json<ClassificationResult>> {
    let Json(request) = payload?;
    let description = request.description.trim();

    if description.is_empty() {
        return Err(ApiError::invalid_field(
            "description",
            "Description is required for classification.",
        ));
    }
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ApiError::invalid_field(
            "description",
            format!(
                "Description is too short for meaningful classification (minimum {} characters).",
                MIN_DESCRIPTION_CHARS
            ),
        ));
    }

    state
        .classifier
        .classify(description)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::service_unavailable(CLASSIFICATION_UNAVAILABLE))
}
