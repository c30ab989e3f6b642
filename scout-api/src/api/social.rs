//! Social feed endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use scout_common::db::models::SocialPost;
use scout_common::events::{EntityKind, ScoutEvent};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_FEED_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// GET /api/social/posts
///
/// Latest-first feed page. The default page is cached under the shared
/// feed key; explicit limits bypass the cache.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, 200);
    let default_page = query.limit.is_none();

    if default_page {
        if let Some(cached) = state.cache.get(EntityKind::Feed, Uuid::nil()).await {
            return Ok(Json(cached));
        }
    }

    let posts = db::posts::list_posts(&state.db, limit).await?;
    let value = serde_json::to_value(&posts).map_err(|e| ApiError::Internal(e.to_string()))?;
    if default_page {
        state.cache.put(EntityKind::Feed, Uuid::nil(), value.clone()).await;
    }
    Ok(Json(value))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: Uuid,
    pub body: String,
    pub media_url: Option<String>,
}

/// POST /api/social/posts
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Json<SocialPost>> {
    if request.body.trim().is_empty() {
        return Err(ApiError::BadRequest("post body cannot be empty".to_string()));
    }
    db::athletes::load_athlete(&state.db, request.author_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", request.author_id)))?;

    let post = SocialPost {
        guid: Uuid::new_v4(),
        author_id: request.author_id,
        body: request.body,
        media_url: request.media_url,
        like_count: 0,
        created_at: Utc::now(),
    };
    db::posts::insert_post(&state.db, &post).await?;

    state.invalidate(EntityKind::Feed, Uuid::nil()).await;
    state.bus.emit_or_log(ScoutEvent::PostCreated {
        post_id: post.guid,
        author_id: post.author_id,
        timestamp: Utc::now(),
    });

    Ok(Json(post))
}

/// DELETE /api/social/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let deleted = db::posts::delete_post(&state.db, post_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("post {}", post_id)));
    }

    state.invalidate(EntityKind::Feed, Uuid::nil()).await;
    Ok(Json(json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub athlete_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub post_id: Uuid,
    pub liked: bool,
    pub like_count: i64,
}

/// POST /api/social/posts/:id/like
///
/// Toggles the (post, athlete) like and reports the new state.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<LikeRequest>,
) -> ApiResult<Json<LikeResponse>> {
    let (liked, like_count) = db::posts::toggle_like(&state.db, post_id, request.athlete_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("post {}", post_id)))?;

    state.invalidate(EntityKind::Feed, Uuid::nil()).await;
    state.bus.emit_or_log(ScoutEvent::PostLiked {
        post_id,
        athlete_id: request.athlete_id,
        liked,
        timestamp: Utc::now(),
    });

    Ok(Json(LikeResponse {
        post_id,
        liked,
        like_count,
    }))
}
