use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_util::stream::Stream;
use rail_core::{SectionAvailability, UserSeat};
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSeatResponse {
    pub user_email: String,
    pub seat_section: String,
    pub seat_number: u32,
}

impl From<UserSeat> for UserSeatResponse {
    fn from(seat: UserSeat) -> Self {
        Self {
            user_email: seat.email,
            seat_section: seat.section,
            seat_number: seat.seat_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersBySectionResponse {
    pub user_seats: Vec<UserSeatResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub sections: Vec<SectionAvailability>,
    pub total_available: u32,
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub section: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sections/{section}/users", get(users_by_section))
        .route("/v1/availability", get(availability))
        .route("/v1/events", get(stream_events))
}

/// GET /v1/sections/{section}/users
async fn users_by_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Json<UsersBySectionResponse> {
    let user_seats = state
        .store
        .users_by_section(&section)
        .await
        .into_iter()
        .map(UserSeatResponse::from)
        .collect();

    Json(UsersBySectionResponse { user_seats })
}

/// GET /v1/availability
async fn availability(State(state): State<AppState>) -> Json<AvailabilityResponse> {
    let sections = state.store.availability().await;
    let total_available = sections.iter().map(|s| s.available).sum();

    Json(AvailabilityResponse { sections, total_available })
}

/// GET /v1/events?section=A
/// Server-sent reservation events, optionally limited to one section
async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        // Lagged receivers skip what they missed
        let event = result.ok()?;
        if let Some(section) = &query.section {
            if !event.touches_section(section) {
                return None;
            }
        }
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().event(event.kind()).data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
