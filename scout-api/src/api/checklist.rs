//! Application checklist endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use scout_common::db::models::ChecklistItem;
use scout_common::events::{EntityKind, ScoutEvent};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

async fn require_athlete(state: &AppState, id: Uuid) -> ApiResult<()> {
    db::athletes::load_athlete(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// GET /api/athlete/:id/checklist
pub async fn list_items(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Checklist, athlete_id).await {
        return Ok(Json(cached));
    }

    require_athlete(&state, athlete_id).await?;
    let items = db::checklist::list_items(&state.db, athlete_id).await?;

    let value = serde_json::to_value(&items).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Checklist, athlete_id, value.clone()).await;
    Ok(Json(value))
}

/// POST /api/athlete/:id/checklist
pub async fn create_item(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> ApiResult<Json<ChecklistItem>> {
    require_athlete(&state, athlete_id).await?;
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let now = Utc::now();
    let item = ChecklistItem {
        guid: Uuid::new_v4(),
        athlete_id,
        title: request.title,
        category: request.category,
        due_date: request.due_date,
        completed: false,
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    db::checklist::insert_item(&state.db, &item).await?;

    state.invalidate(EntityKind::Checklist, athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::ChecklistChanged {
        athlete_id,
        item_id: item.guid,
        timestamp: Utc::now(),
    });

    Ok(Json(item))
}

/// PATCH /api/checklist/:id
///
/// Marking an item complete stamps `completed_at`; unmarking clears it.
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> ApiResult<Json<ChecklistItem>> {
    let mut item = db::checklist::load_item(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("checklist item {}", item_id)))?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title cannot be empty".to_string()));
        }
        item.title = title;
    }
    if let Some(category) = request.category {
        item.category = Some(category);
    }
    if let Some(due_date) = request.due_date {
        item.due_date = Some(due_date);
    }
    if let Some(completed) = request.completed {
        if completed && !item.completed {
            item.completed_at = Some(Utc::now());
        } else if !completed {
            item.completed_at = None;
        }
        item.completed = completed;
    }

    let updated_at = Utc::now();
    db::checklist::update_item(&state.db, &item, updated_at).await?;
    item.updated_at = updated_at;

    state.invalidate(EntityKind::Checklist, item.athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::ChecklistChanged {
        athlete_id: item.athlete_id,
        item_id,
        timestamp: Utc::now(),
    });

    Ok(Json(item))
}

/// DELETE /api/checklist/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let item = db::checklist::load_item(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("checklist item {}", item_id)))?;

    db::checklist::delete_item(&state.db, item_id).await?;
    state.invalidate(EntityKind::Checklist, item.athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::ChecklistChanged {
        athlete_id: item.athlete_id,
        item_id,
        timestamp: Utc::now(),
    });

    Ok(Json(json!({ "deleted": true })))
}
