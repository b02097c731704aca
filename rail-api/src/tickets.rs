use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rail_core::{PurchaseRequest, Receipt};
use rail_store::events;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PurchaseTicketRequest {
    pub from: String,
    pub to: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

impl From<PurchaseTicketRequest> for PurchaseRequest {
    fn from(req: PurchaseTicketRequest) -> Self {
        Self {
            origin: req.from,
            destination: req.to,
            first_name: req.user_first_name,
            last_name: req.user_last_name,
            email: req.user_email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub from: String,
    pub to: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    pub seat_section: String,
    pub seat_number: u32,
    pub price_paid: f64,
    pub issued_at: DateTime<Utc>,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            from: receipt.origin,
            to: receipt.destination,
            user_first_name: receipt.first_name,
            user_last_name: receipt.last_name,
            user_email: receipt.email,
            seat_section: receipt.seat.section,
            seat_number: receipt.seat.number,
            price_paid: receipt.price_paid,
            issued_at: receipt.issued_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveUserResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModifySeatRequest {
    pub new_section: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifySeatResponse {
    pub success: bool,
    pub seat_section: String,
    pub seat_number: u32,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", post(purchase_ticket))
        .route("/v1/tickets/{email}", get(view_receipt).delete(remove_user))
        .route("/v1/tickets/{email}/seat", put(modify_seat))
}

/// POST /v1/tickets
async fn purchase_ticket(
    State(state): State<AppState>,
    Json(req): Json<PurchaseTicketRequest>,
) -> Result<(StatusCode, Json<ReceiptResponse>), AppError> {
    let receipt = state.store.purchase(req.into()).await?;
    state.events.publish(events::ticket_purchased(&receipt));

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// GET /v1/tickets/{email}
async fn view_receipt(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ReceiptResponse>, AppError> {
    let receipt = state.store.view_receipt(&email).await?;
    Ok(Json(receipt.into()))
}

/// DELETE /v1/tickets/{email}
async fn remove_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<RemoveUserResponse>, AppError> {
    let receipt = state.store.remove_user(&email).await?;
    state.events.publish(events::ticket_cancelled(&receipt));

    Ok(Json(RemoveUserResponse { success: true }))
}

/// PUT /v1/tickets/{email}/seat
/// Move an existing reservation to another section
async fn modify_seat(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<ModifySeatRequest>,
) -> Result<Json<ModifySeatResponse>, AppError> {
    let (previous, receipt) = state.store.modify_seat(&email, &req.new_section).await?;
    state.events.publish(events::seat_changed(&previous, &receipt));

    Ok(Json(ModifySeatResponse {
        success: true,
        seat_section: receipt.seat.section,
        seat_number: receipt.seat.number,
    }))
}
