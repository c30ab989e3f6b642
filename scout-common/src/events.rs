//! Event types for the Scoutline event system
//!
//! Domain events are broadcast via [`EventBus`] and serialized for SSE
//! transmission so connected clients can drop stale cached queries and
//! refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Entity kinds used as cache-invalidation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Athlete,
    Metrics,
    Prediction,
    Matches,
    Feed,
    Checklist,
    Injuries,
    Dashboard,
}

/// Scoutline event types
///
/// Shared across the service and any future sibling modules. Events carry
/// entity ids and a UTC timestamp; payload bodies are refetched over the
/// REST API rather than embedded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScoutEvent {
    /// A new combine testing session was recorded for an athlete
    MetricRecorded {
        athlete_id: Uuid,
        metric_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A height prediction snapshot was saved to an athlete profile
    PredictionSaved {
        athlete_id: Uuid,
        prediction_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A post was added to the social feed
    PostCreated {
        post_id: Uuid,
        author_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A post like was toggled
    PostLiked {
        post_id: Uuid,
        athlete_id: Uuid,
        liked: bool,
        timestamp: DateTime<Utc>,
    },

    /// A checklist item was created, edited, or removed
    ChecklistChanged {
        athlete_id: Uuid,
        item_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// An injury record was created, edited, or removed
    InjuryChanged {
        athlete_id: Uuid,
        injury_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// The upstream matcher pushed a fresh set of college matches
    MatchesRefreshed {
        athlete_id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A cached query was invalidated; clients holding it should refetch
    CacheInvalidated {
        entity: EntityKind,
        id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl ScoutEvent {
    /// SSE event name for this variant
    pub fn name(&self) -> &'static str {
        match self {
            ScoutEvent::MetricRecorded { .. } => "MetricRecorded",
            ScoutEvent::PredictionSaved { .. } => "PredictionSaved",
            ScoutEvent::PostCreated { .. } => "PostCreated",
            ScoutEvent::PostLiked { .. } => "PostLiked",
            ScoutEvent::ChecklistChanged { .. } => "ChecklistChanged",
            ScoutEvent::InjuryChanged { .. } => "InjuryChanged",
            ScoutEvent::MatchesRefreshed { .. } => "MatchesRefreshed",
            ScoutEvent::CacheInvalidated { .. } => "CacheInvalidated",
        }
    }
}

/// Broadcast bus distributing [`ScoutEvent`]s to SSE streams and internal
/// listeners. Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScoutEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events before dropping the
    /// oldest for lagging subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events. Events emitted before subscription
    /// are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoutEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the subscriber count, or an error when nobody is listening.
    pub fn emit(
        &self,
        event: ScoutEvent,
    ) -> Result<usize, broadcast::error::SendError<ScoutEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, logging instead of failing when no subscriber exists.
    pub fn emit_or_log(&self, event: ScoutEvent) {
        if self.tx.send(event).is_err() {
            debug!("event dropped: no subscribers");
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
