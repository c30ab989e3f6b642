//! Adult height prediction endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use scout_common::db::models::HeightPrediction;
use scout_common::events::{EntityKind, ScoutEvent};
use scout_common::growth::{
    predict, PredictionInput, PredictionResult, AGE_YEARS, HEIGHT_IN, PARENT_HEIGHT_IN, WEIGHT_LB,
};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Range-check prediction inputs, reporting every offending field inline
fn validate_input(input: &PredictionInput) -> Result<(), ApiError> {
    let mut fields = HashMap::new();

    let checks = [
        ("age_years", input.age_years, AGE_YEARS),
        ("height_in", input.height_in, HEIGHT_IN),
        ("weight_lb", input.weight_lb, WEIGHT_LB),
        ("mother_height_in", input.mother_height_in, PARENT_HEIGHT_IN),
        ("father_height_in", input.father_height_in, PARENT_HEIGHT_IN),
    ];
    for (name, value, range) in checks {
        if !range.contains(&value) {
            fields.insert(
                name.to_string(),
                format!("must be between {} and {}", range.start(), range.end()),
            );
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation {
            message: "prediction inputs out of range".to_string(),
            fields,
        })
    }
}

async fn require_athlete(state: &AppState, id: Uuid) -> ApiResult<()> {
    db::athletes::load_athlete(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// POST /api/athlete/:id/height-prediction
///
/// Computes and returns a prediction without persisting anything.
pub async fn predict_height(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(input): Json<PredictionInput>,
) -> ApiResult<Json<PredictionResult>> {
    require_athlete(&state, athlete_id).await?;
    validate_input(&input)?;

    Ok(Json(predict(&input)))
}

/// POST /api/athlete/:id/height-prediction/save
///
/// Computes a prediction and appends it to the athlete's saved snapshots.
pub async fn save_prediction(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(input): Json<PredictionInput>,
) -> ApiResult<Json<HeightPrediction>> {
    require_athlete(&state, athlete_id).await?;
    validate_input(&input)?;

    let result = predict(&input);
    let snapshot = HeightPrediction {
        guid: Uuid::new_v4(),
        athlete_id,
        sex: input.sex,
        age_years: input.age_years,
        height_in: input.height_in,
        weight_lb: input.weight_lb,
        mother_height_in: input.mother_height_in,
        father_height_in: input.father_height_in,
        predicted_height_in: result.predicted_height_in,
        predicted_height_cm: result.predicted_height_cm,
        margin_in: result.margin_in,
        percent_complete: result.percent_complete,
        remaining_in: result.remaining_in,
        remaining_cm: result.remaining_cm,
        interpretation: result.interpretation,
        recommended_positions: result.recommended_positions,
        created_at: Utc::now(),
    };
    db::predictions::insert_prediction(&state.db, &snapshot).await?;

    state.invalidate(EntityKind::Prediction, athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::PredictionSaved {
        athlete_id,
        prediction_id: snapshot.guid,
        timestamp: Utc::now(),
    });

    Ok(Json(snapshot))
}

/// GET /api/athlete/:id/height-prediction
///
/// Saved prediction snapshots, latest first.
pub async fn list_predictions(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Prediction, athlete_id).await {
        return Ok(Json(cached));
    }

    require_athlete(&state, athlete_id).await?;
    let predictions = db::predictions::list_predictions(&state.db, athlete_id).await?;

    let value = serde_json::to_value(&predictions).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Prediction, athlete_id, value.clone()).await;
    Ok(Json(value))
}
