//! Parent account and dashboard endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use scout_common::db::models::{Athlete, Parent};
use scout_common::events::EntityKind;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    pub name: String,
    pub email: String,
}

/// POST /api/parent
pub async fn create_parent(
    State(state): State<AppState>,
    Json(request): Json<CreateParentRequest>,
) -> ApiResult<Json<Parent>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(ApiError::BadRequest("email is invalid".to_string()));
    }
    if db::parents::email_exists(&state.db, &request.email).await? {
        return Err(ApiError::BadRequest("email is already registered".to_string()));
    }

    let parent = Parent {
        guid: Uuid::new_v4(),
        name: request.name,
        email: request.email,
    };
    db::parents::insert_parent(&state.db, &parent).await?;

    Ok(Json(parent))
}

/// POST /api/parent/:id/link/:athlete_id
pub async fn link_athlete(
    State(state): State<AppState>,
    Path((parent_id, athlete_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    db::parents::load_parent(&state.db, parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("parent {}", parent_id)))?;
    db::athletes::load_athlete(&state.db, athlete_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", athlete_id)))?;

    db::parents::link_athlete(&state.db, parent_id, athlete_id).await?;
    state.invalidate(EntityKind::Dashboard, parent_id).await;

    Ok(Json(json!({ "linked": true })))
}

/// Latest saved prediction summary shown on the dashboard
#[derive(Debug, Serialize)]
pub struct PredictionSummary {
    pub predicted_height_in: f64,
    pub percent_complete: f64,
    pub created_at: DateTime<Utc>,
}

/// Per-athlete dashboard card
#[derive(Debug, Serialize)]
pub struct AthleteSummary {
    pub athlete: Athlete,
    pub latest_metric_date: Option<NaiveDate>,
    pub checklist_total: i64,
    pub checklist_completed: i64,
    pub latest_prediction: Option<PredictionSummary>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub parent: Parent,
    pub athletes: Vec<AthleteSummary>,
}

/// GET /api/parent/:id/dashboard
///
/// One card per linked athlete: latest testing date, checklist completion,
/// and the most recent saved height prediction.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Dashboard, parent_id).await {
        return Ok(Json(cached));
    }

    let parent = db::parents::load_parent(&state.db, parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("parent {}", parent_id)))?;

    let linked = db::parents::linked_athletes(&state.db, parent_id).await?;
    let mut athletes = Vec::with_capacity(linked.len());
    for athlete in linked {
        let latest_metric_date = db::parents::latest_metric_date(&state.db, athlete.guid).await?;
        let (checklist_total, checklist_completed) =
            db::checklist::completion_counts(&state.db, athlete.guid).await?;
        let latest_prediction = db::predictions::latest_prediction(&state.db, athlete.guid)
            .await?
            .map(|p| PredictionSummary {
                predicted_height_in: p.predicted_height_in,
                percent_complete: p.percent_complete,
                created_at: p.created_at,
            });

        athletes.push(AthleteSummary {
            athlete,
            latest_metric_date,
            checklist_total,
            checklist_completed,
            latest_prediction,
        });
    }

    let response = DashboardResponse { parent, athletes };
    let value = serde_json::to_value(&response).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Dashboard, parent_id, value.clone()).await;
    Ok(Json(value))
}
