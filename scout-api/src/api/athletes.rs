//! Athlete profile endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use scout_common::db::models::Athlete;
use scout_common::events::EntityKind;
use scout_common::growth::Sex;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAthleteRequest {
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub position: Option<String>,
    pub grad_year: Option<i64>,
    pub school: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAthleteRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<Sex>,
    pub birth_date: Option<NaiveDate>,
    pub position: Option<String>,
    pub grad_year: Option<i64>,
    pub school: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// POST /api/athlete
pub async fn create_athlete(
    State(state): State<AppState>,
    Json(request): Json<CreateAthleteRequest>,
) -> ApiResult<Json<Athlete>> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("first_name and last_name are required".to_string()));
    }

    let now = Utc::now();
    let athlete = Athlete {
        guid: Uuid::new_v4(),
        first_name: request.first_name,
        last_name: request.last_name,
        sex: request.sex,
        birth_date: request.birth_date,
        position: request.position,
        grad_year: request.grad_year,
        school: request.school,
        city: request.city,
        state: request.state,
        created_at: now,
        updated_at: now,
    };
    db::athletes::insert_athlete(&state.db, &athlete).await?;

    Ok(Json(athlete))
}

/// GET /api/athlete/:id
pub async fn get_athlete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Athlete, id).await {
        return Ok(Json(cached));
    }

    let athlete = db::athletes::load_athlete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))?;

    let value = serde_json::to_value(&athlete).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Athlete, id, value.clone()).await;
    Ok(Json(value))
}

/// GET /api/athletes
pub async fn list_athletes(State(state): State<AppState>) -> ApiResult<Json<Vec<Athlete>>> {
    Ok(Json(db::athletes::list_athletes(&state.db).await?))
}

/// PATCH /api/athlete/:id
pub async fn update_athlete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAthleteRequest>,
) -> ApiResult<Json<Athlete>> {
    let mut athlete = db::athletes::load_athlete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))?;

    if let Some(first_name) = request.first_name {
        if first_name.trim().is_empty() {
            return Err(ApiError::BadRequest("first_name cannot be empty".to_string()));
        }
        athlete.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
        if last_name.trim().is_empty() {
            return Err(ApiError::BadRequest("last_name cannot be empty".to_string()));
        }
        athlete.last_name = last_name;
    }
    if let Some(sex) = request.sex {
        athlete.sex = sex;
    }
    if let Some(birth_date) = request.birth_date {
        athlete.birth_date = birth_date;
    }
    if let Some(position) = request.position {
        athlete.position = Some(position);
    }
    if let Some(grad_year) = request.grad_year {
        athlete.grad_year = Some(grad_year);
    }
    if let Some(school) = request.school {
        athlete.school = Some(school);
    }
    if let Some(city) = request.city {
        athlete.city = Some(city);
    }
    if let Some(st) = request.state {
        athlete.state = Some(st);
    }

    let updated_at = Utc::now();
    db::athletes::update_athlete(&state.db, &athlete, updated_at).await?;
    athlete.updated_at = updated_at;

    state.invalidate(EntityKind::Athlete, id).await;
    Ok(Json(athlete))
}

/// DELETE /api/athlete/:id
pub async fn delete_athlete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let deleted = db::athletes::delete_athlete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("athlete {}", id)));
    }

    // Dependent rows cascade in the database; drop their cached queries too
    for kind in [
        EntityKind::Athlete,
        EntityKind::Metrics,
        EntityKind::Prediction,
        EntityKind::Matches,
        EntityKind::Checklist,
        EntityKind::Injuries,
    ] {
        state.invalidate(kind, id).await;
    }
    state.invalidate(EntityKind::Feed, Uuid::nil()).await;

    Ok(Json(json!({ "deleted": true })))
}
