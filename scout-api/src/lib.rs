//! scout-api library - Scoutline recruiting API service
//!
//! Owns the athlete/metrics/prediction entity store and exposes the REST
//! endpoints the recruiting front-end consumes, plus an SSE event stream.

use axum::Router;
use chrono::Utc;
use scout_common::events::{EntityKind, EventBus, ScoutEvent};
use sqlx::SqlitePool;
use uuid::Uuid;

pub mod api;
pub mod cache;
pub mod db;
pub mod error;

use cache::QueryCache;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Domain event bus feeding the SSE stream
    pub bus: EventBus,
    /// Explicit response cache with entity-keyed invalidation
    pub cache: QueryCache,
    /// Shared secret for API authentication (0 disables auth)
    pub shared_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, bus: EventBus, shared_secret: i64) -> Self {
        Self {
            db,
            bus,
            cache: QueryCache::new(),
            shared_secret,
        }
    }

    /// Invalidate a cached entry and announce it so connected clients
    /// holding the stale query refetch.
    pub async fn invalidate(&self, kind: EntityKind, id: Uuid) {
        self.cache.invalidate(kind, id).await;
        self.bus.emit_or_log(ScoutEvent::CacheInvalidated {
            entity: kind,
            id,
            timestamp: Utc::now(),
        });
    }
}

/// Build application router
///
/// Protected routes pass through the shared-secret auth middleware; the
/// health endpoint and event stream do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    let protected = Router::new()
        .route("/api/athletes", get(api::athletes::list_athletes))
        .route("/api/athlete", post(api::athletes::create_athlete))
        .route(
            "/api/athlete/:id",
            get(api::athletes::get_athlete)
                .patch(api::athletes::update_athlete)
                .delete(api::athletes::delete_athlete),
        )
        .route(
            "/api/athlete/:id/metrics",
            get(api::metrics::list_metrics).post(api::metrics::create_metric),
        )
        .route("/api/athlete/:id/metrics/progress", get(api::metrics::metric_progress))
        .route("/api/athlete/:id/benchmarks", get(api::metrics::benchmark_comparison))
        .route(
            "/api/athlete/:id/height-prediction",
            get(api::height::list_predictions).post(api::height::predict_height),
        )
        .route("/api/athlete/:id/height-prediction/save", post(api::height::save_prediction))
        .route(
            "/api/athlete/:id/college-matches",
            get(api::colleges::list_matches).put(api::colleges::put_matches),
        )
        .route("/api/colleges", get(api::colleges::list_colleges))
        .route(
            "/api/social/posts",
            get(api::social::list_posts).post(api::social::create_post),
        )
        .route("/api/social/posts/:id", delete(api::social::delete_post))
        .route("/api/social/posts/:id/like", post(api::social::toggle_like))
        .route(
            "/api/athlete/:id/checklist",
            get(api::checklist::list_items).post(api::checklist::create_item),
        )
        .route(
            "/api/checklist/:id",
            axum::routing::patch(api::checklist::update_item).delete(api::checklist::delete_item),
        )
        .route(
            "/api/athlete/:id/injuries",
            get(api::injuries::list_injuries).post(api::injuries::create_injury),
        )
        .route(
            "/api/injuries/:id",
            axum::routing::patch(api::injuries::update_injury).delete(api::injuries::delete_injury),
        )
        .route("/api/parent", post(api::parents::create_parent))
        .route("/api/parent/:id/link/:athlete_id", post(api::parents::link_athlete))
        .route("/api/parent/:id/dashboard", get(api::parents::dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/events", get(api::sse::event_stream))
        .merge(api::health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
