//! Injury tracking endpoints
//!
//! Create and update bodies are dedicated transient draft structs, kept
//! separate from the persisted `Injury` row so unrelated field lifecycles
//! never share one form object.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use scout_common::db::models::{Injury, InjuryStatus};
use scout_common::events::{EntityKind, ScoutEvent};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Transient draft for a new injury record
#[derive(Debug, Deserialize)]
pub struct InjuryDraft {
    pub injury_type: String,
    pub body_part: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub status: Option<InjuryStatus>,
    pub notes: Option<String>,
}

/// Transient partial edit of an existing record
#[derive(Debug, Deserialize)]
pub struct InjuryPatch {
    pub injury_type: Option<String>,
    pub body_part: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub status: Option<InjuryStatus>,
    pub notes: Option<String>,
}

async fn require_athlete(state: &AppState, id: Uuid) -> ApiResult<()> {
    db::athletes::load_athlete(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// GET /api/athlete/:id/injuries
pub async fn list_injuries(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Injuries, athlete_id).await {
        return Ok(Json(cached));
    }

    require_athlete(&state, athlete_id).await?;
    let injuries = db::injuries::list_injuries(&state.db, athlete_id).await?;

    let value = serde_json::to_value(&injuries).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Injuries, athlete_id, value.clone()).await;
    Ok(Json(value))
}

/// POST /api/athlete/:id/injuries
pub async fn create_injury(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(draft): Json<InjuryDraft>,
) -> ApiResult<Json<Injury>> {
    require_athlete(&state, athlete_id).await?;
    if draft.injury_type.trim().is_empty() {
        return Err(ApiError::BadRequest("injury_type is required".to_string()));
    }

    let now = Utc::now();
    let injury = Injury {
        guid: Uuid::new_v4(),
        athlete_id,
        injury_type: draft.injury_type,
        body_part: draft.body_part,
        occurred_on: draft.occurred_on,
        status: draft.status.unwrap_or(InjuryStatus::Active),
        notes: draft.notes,
        created_at: now,
        updated_at: now,
    };
    db::injuries::insert_injury(&state.db, &injury).await?;

    state.invalidate(EntityKind::Injuries, athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::InjuryChanged {
        athlete_id,
        injury_id: injury.guid,
        timestamp: Utc::now(),
    });

    Ok(Json(injury))
}

/// PATCH /api/injuries/:id
pub async fn update_injury(
    State(state): State<AppState>,
    Path(injury_id): Path<Uuid>,
    Json(patch): Json<InjuryPatch>,
) -> ApiResult<Json<Injury>> {
    let mut injury = db::injuries::load_injury(&state.db, injury_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("injury {}", injury_id)))?;

    if let Some(injury_type) = patch.injury_type {
        if injury_type.trim().is_empty() {
            return Err(ApiError::BadRequest("injury_type cannot be empty".to_string()));
        }
        injury.injury_type = injury_type;
    }
    if let Some(body_part) = patch.body_part {
        injury.body_part = Some(body_part);
    }
    if let Some(occurred_on) = patch.occurred_on {
        injury.occurred_on = Some(occurred_on);
    }
    if let Some(status) = patch.status {
        injury.status = status;
    }
    if let Some(notes) = patch.notes {
        injury.notes = Some(notes);
    }

    let updated_at = Utc::now();
    db::injuries::update_injury(&state.db, &injury, updated_at).await?;
    injury.updated_at = updated_at;

    state.invalidate(EntityKind::Injuries, injury.athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::InjuryChanged {
        athlete_id: injury.athlete_id,
        injury_id,
        timestamp: Utc::now(),
    });

    Ok(Json(injury))
}

/// DELETE /api/injuries/:id
pub async fn delete_injury(
    State(state): State<AppState>,
    Path(injury_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let injury = db::injuries::load_injury(&state.db, injury_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("injury {}", injury_id)))?;

    db::injuries::delete_injury(&state.db, injury_id).await?;
    state.invalidate(EntityKind::Injuries, injury.athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::InjuryChanged {
        athlete_id: injury.athlete_id,
        injury_id,
        timestamp: Utc::now(),
    });

    Ok(Json(json!({ "deleted": true })))
}
