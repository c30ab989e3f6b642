//! Server-Sent Events endpoint

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /api/events
///
/// Streams domain events (including cache invalidations) to connected
/// clients, with heartbeat keep-alives.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    scout_common::sse::event_stream("scout-api", &state.bus)
}
