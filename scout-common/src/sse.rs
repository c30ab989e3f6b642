//! Server-Sent Events (SSE) utilities
//!
//! Bridges the [`EventBus`](crate::events::EventBus) onto an axum SSE
//! response, with a heartbeat comment so idle connections stay alive.

use crate::events::EventBus;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream forwarding bus events to one client.
///
/// Each domain event is sent under its variant name with a JSON payload;
/// a heartbeat comment goes out whenever the bus has been quiet for the
/// heartbeat interval. A lagging client simply skips the dropped events
/// and refetches on the next invalidation it does see.
pub fn event_stream(
    service_name: &'static str,
    bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);
    let mut rx = bus.subscribe();

    let stream = async_stream::stream! {
        // Initial connected status so the client can reflect it immediately
        yield Ok(Event::default().event("ConnectionStatus").data("connected"));

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(event) => {
                        let payload = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                debug!("SSE: failed to serialize event: {}", e);
                                continue;
                            }
                        };
                        yield Ok(Event::default().event(event.name()).data(payload));
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("SSE: client lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
                _ = tokio::time::sleep(HEARTBEAT_INTERVAL) => {
                    debug!("SSE: sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
