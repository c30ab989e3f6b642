//! College and match-score endpoints
//!
//! Match scores are opaque: the upstream matching service computes them and
//! pushes batches here; this service stores, badges, and serves them.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use scout_common::benchmarks::{Division, DivisionBadge};
use scout_common::db::models::{College, CollegeMatch};
use scout_common::events::{EntityKind, ScoutEvent};

use crate::db;
use crate::db::colleges::CollegeUpsert;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/colleges
pub async fn list_colleges(State(state): State<AppState>) -> ApiResult<Json<Vec<College>>> {
    Ok(Json(db::colleges::list_colleges(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub division: Option<String>,
}

/// Stored match row joined with its college and division badge
#[derive(Debug, Serialize)]
pub struct MatchView {
    pub college: College,
    pub badge: Option<DivisionBadge>,
    pub academic_fit: i64,
    pub athletic_fit: i64,
    pub financial_fit: i64,
    pub overall: i64,
    pub computed_at: DateTime<Utc>,
}

fn match_view((m, college): (CollegeMatch, College)) -> MatchView {
    let badge = Division::parse(&college.division).map(|d| d.badge());
    MatchView {
        badge,
        academic_fit: m.academic_fit,
        athletic_fit: m.athletic_fit,
        financial_fit: m.financial_fit,
        overall: m.overall,
        computed_at: m.computed_at,
        college,
    }
}

async fn require_athlete(state: &AppState, id: Uuid) -> ApiResult<()> {
    db::athletes::load_athlete(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// GET /api/athlete/:id/college-matches?division=d2
///
/// Best overall fit first. The unfiltered response is cached under the
/// athlete's match key; filtered views are recomputed per request.
pub async fn list_matches(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Query(query): Query<MatchQuery>,
) -> ApiResult<Json<Value>> {
    let division = match query.division.as_deref() {
        Some(s) => Some(
            Division::parse(s)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown division: {}", s)))?,
        ),
        None => None,
    };

    if division.is_none() {
        if let Some(cached) = state.cache.get(EntityKind::Matches, athlete_id).await {
            return Ok(Json(cached));
        }
    }

    require_athlete(&state, athlete_id).await?;
    let rows = db::colleges::list_matches(
        &state.db,
        athlete_id,
        division.map(|d| d.as_str()),
    )
    .await?;
    let views: Vec<MatchView> = rows.into_iter().map(match_view).collect();

    let value = serde_json::to_value(&views).map_err(|e| ApiError::Internal(e.to_string()))?;
    if division.is_none() {
        state.cache.put(EntityKind::Matches, athlete_id, value.clone()).await;
    }
    Ok(Json(value))
}

#[derive(Debug, Deserialize)]
pub struct CollegePayload {
    pub name: String,
    pub division: String,
    pub conference: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub enrollment: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchUpsert {
    pub college: CollegePayload,
    pub academic_fit: i64,
    pub athletic_fit: i64,
    pub financial_fit: i64,
    pub overall: i64,
    pub computed_at: Option<DateTime<Utc>>,
}

/// PUT /api/athlete/:id/college-matches
///
/// Bulk replace from the upstream matcher. The previous batch is dropped
/// wholesale; partial merges don't exist.
pub async fn put_matches(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(batch): Json<Vec<MatchUpsert>>,
) -> ApiResult<Json<Value>> {
    require_athlete(&state, athlete_id).await?;

    let mut fields = HashMap::new();
    for (index, entry) in batch.iter().enumerate() {
        if entry.college.name.trim().is_empty() {
            fields.insert(format!("{}.college.name", index), "required".to_string());
        }
        if Division::parse(&entry.college.division).is_none() {
            fields.insert(
                format!("{}.college.division", index),
                format!("unknown division: {}", entry.college.division),
            );
        }
        for (name, score) in [
            ("academic_fit", entry.academic_fit),
            ("athletic_fit", entry.athletic_fit),
            ("financial_fit", entry.financial_fit),
            ("overall", entry.overall),
        ] {
            if !(0..=100).contains(&score) {
                fields.insert(format!("{}.{}", index, name), "must be 0-100".to_string());
            }
        }
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation {
            message: "invalid match batch".to_string(),
            fields,
        });
    }

    let now = Utc::now();
    let mut matches = Vec::with_capacity(batch.len());
    for entry in &batch {
        let division = Division::parse(&entry.college.division)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown division: {}", entry.college.division)))?;
        let college_id = db::colleges::upsert_college(
            &state.db,
            &CollegeUpsert {
                name: entry.college.name.clone(),
                division: division.as_str().to_string(),
                conference: entry.college.conference.clone(),
                city: entry.college.city.clone(),
                state: entry.college.state.clone(),
                enrollment: entry.college.enrollment,
            },
        )
        .await?;

        matches.push((
            college_id,
            CollegeMatch {
                athlete_id,
                college_id,
                academic_fit: entry.academic_fit,
                athletic_fit: entry.athletic_fit,
                financial_fit: entry.financial_fit,
                overall: entry.overall,
                computed_at: entry.computed_at.unwrap_or(now),
            },
        ));
    }
    db::colleges::replace_matches(&state.db, athlete_id, &matches).await?;

    state.invalidate(EntityKind::Matches, athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::MatchesRefreshed {
        athlete_id,
        count: matches.len(),
        timestamp: Utc::now(),
    });

    Ok(Json(json!({ "updated": matches.len() })))
}
