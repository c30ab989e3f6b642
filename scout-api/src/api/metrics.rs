//! Combine metric endpoints: snapshots, progress, and benchmark comparison

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use scout_common::benchmarks::{benchmarks_for, Division, DivisionBadge, MetricKind, PositionGroup};
use scout_common::db::models::CombineMetric;
use scout_common::events::{EntityKind, ScoutEvent};
use scout_common::scoring::{benchmark_score, improvement};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMetricRequest {
    pub recorded_at: NaiveDate,
    pub forty_yard: Option<f64>,
    pub ten_yard_split: Option<f64>,
    pub shuttle: Option<f64>,
    pub three_cone: Option<f64>,
    pub vertical_jump: Option<f64>,
    pub broad_jump: Option<f64>,
    pub bench_press: Option<f64>,
    pub bench_press_reps: Option<i64>,
    pub squat_max: Option<f64>,
    pub power_clean: Option<f64>,
    pub deadlift: Option<f64>,
    pub pull_ups: Option<i64>,
}

impl CreateMetricRequest {
    fn validate(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        let positive = [
            ("forty_yard", self.forty_yard),
            ("ten_yard_split", self.ten_yard_split),
            ("shuttle", self.shuttle),
            ("three_cone", self.three_cone),
        ];
        for (name, value) in positive {
            if let Some(v) = value {
                if v <= 0.0 {
                    fields.insert(name.to_string(), "must be greater than zero".to_string());
                }
            }
        }
        let non_negative = [
            ("vertical_jump", self.vertical_jump),
            ("broad_jump", self.broad_jump),
            ("bench_press", self.bench_press),
            ("squat_max", self.squat_max),
            ("power_clean", self.power_clean),
            ("deadlift", self.deadlift),
        ];
        for (name, value) in non_negative {
            if let Some(v) = value {
                if v < 0.0 {
                    fields.insert(name.to_string(), "cannot be negative".to_string());
                }
            }
        }
        for (name, value) in [
            ("bench_press_reps", self.bench_press_reps),
            ("pull_ups", self.pull_ups),
        ] {
            if let Some(v) = value {
                if v < 0 {
                    fields.insert(name.to_string(), "cannot be negative".to_string());
                }
            }
        }
        fields
    }
}

async fn require_athlete(
    state: &AppState,
    id: Uuid,
) -> ApiResult<scout_common::db::models::Athlete> {
    db::athletes::load_athlete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// POST /api/athlete/:id/metrics
///
/// Records a new testing-session snapshot. Snapshots are append-only;
/// correcting a value means recording a new session.
pub async fn create_metric(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Json(request): Json<CreateMetricRequest>,
) -> ApiResult<Json<CombineMetric>> {
    require_athlete(&state, athlete_id).await?;

    let fields = request.validate();
    if !fields.is_empty() {
        return Err(ApiError::Validation {
            message: "invalid metric values".to_string(),
            fields,
        });
    }

    let metric = CombineMetric {
        guid: Uuid::new_v4(),
        athlete_id,
        recorded_at: request.recorded_at,
        forty_yard: request.forty_yard,
        ten_yard_split: request.ten_yard_split,
        shuttle: request.shuttle,
        three_cone: request.three_cone,
        vertical_jump: request.vertical_jump,
        broad_jump: request.broad_jump,
        bench_press: request.bench_press,
        bench_press_reps: request.bench_press_reps,
        squat_max: request.squat_max,
        power_clean: request.power_clean,
        deadlift: request.deadlift,
        pull_ups: request.pull_ups,
        created_at: Utc::now(),
    };
    db::metrics::insert_metric(&state.db, &metric).await?;

    state.invalidate(EntityKind::Metrics, athlete_id).await;
    state.bus.emit_or_log(ScoutEvent::MetricRecorded {
        athlete_id,
        metric_id: metric.guid,
        timestamp: Utc::now(),
    });

    Ok(Json(metric))
}

/// GET /api/athlete/:id/metrics
pub async fn list_metrics(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if let Some(cached) = state.cache.get(EntityKind::Metrics, athlete_id).await {
        return Ok(Json(cached));
    }

    require_athlete(&state, athlete_id).await?;
    let metrics = db::metrics::list_metrics(&state.db, athlete_id).await?;

    let value = serde_json::to_value(&metrics).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.cache.put(EntityKind::Metrics, athlete_id, value.clone()).await;
    Ok(Json(value))
}

/// One metric's first-to-latest movement
#[derive(Debug, Serialize)]
pub struct MetricProgress {
    pub metric: MetricKind,
    pub label: &'static str,
    pub lower_is_better: bool,
    pub first: Option<f64>,
    pub latest: Option<f64>,
    /// Signed percent change; `null` means no data for this metric
    pub percent_change: Option<f64>,
}

/// GET /api/athlete/:id/metrics/progress
///
/// Compares each metric's earliest recorded value against its most recent
/// one. Metrics with no baseline report `percent_change: null`.
pub async fn metric_progress(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MetricProgress>>> {
    require_athlete(&state, athlete_id).await?;

    // Latest-first from storage; walk oldest-first for baselines
    let snapshots = db::metrics::list_metrics(&state.db, athlete_id).await?;

    let progress = MetricKind::ALL
        .iter()
        .map(|&kind| {
            let first = snapshots.iter().rev().find_map(|s| s.value(kind));
            let latest = snapshots.iter().find_map(|s| s.value(kind));
            MetricProgress {
                metric: kind,
                label: kind.label(),
                lower_is_better: kind.lower_is_better(),
                first,
                latest,
                percent_change: improvement(latest, first, kind.lower_is_better()),
            }
        })
        .collect();

    Ok(Json(progress))
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkQuery {
    pub division: Option<String>,
}

/// One metric scored against its division benchmark
#[derive(Debug, Serialize)]
pub struct BenchmarkComparison {
    pub metric: MetricKind,
    pub label: &'static str,
    pub lower_is_better: bool,
    pub benchmark: f64,
    pub current: Option<f64>,
    /// 0-100 progress score; missing measurements score 0
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkResponse {
    pub athlete_id: Uuid,
    pub position_group: PositionGroup,
    pub position_label: &'static str,
    pub division: Division,
    pub badge: DivisionBadge,
    pub overall_score: u8,
    pub comparisons: Vec<BenchmarkComparison>,
}

/// GET /api/athlete/:id/benchmarks?division=d1
///
/// Scores the athlete's latest snapshot against the benchmark table for
/// their position group. Unrecognized positions use the default group.
pub async fn benchmark_comparison(
    State(state): State<AppState>,
    Path(athlete_id): Path<Uuid>,
    Query(query): Query<BenchmarkQuery>,
) -> ApiResult<Json<BenchmarkResponse>> {
    let division = match query.division.as_deref() {
        Some(s) => Division::parse(s)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown division: {}", s)))?,
        None => Division::D1,
    };

    let athlete = require_athlete(&state, athlete_id).await?;
    let group = PositionGroup::from_position(athlete.position.as_deref().unwrap_or(""));
    let latest = db::metrics::latest_metric(&state.db, athlete_id).await?;

    let comparisons: Vec<BenchmarkComparison> = benchmarks_for(group, division)
        .iter()
        .map(|&(kind, benchmark)| {
            let current = latest.as_ref().and_then(|snapshot| snapshot.value(kind));
            BenchmarkComparison {
                metric: kind,
                label: kind.label(),
                lower_is_better: kind.lower_is_better(),
                benchmark,
                current,
                score: benchmark_score(current, benchmark, kind.lower_is_better()),
            }
        })
        .collect();

    let overall_score = if comparisons.is_empty() {
        0
    } else {
        let sum: u32 = comparisons.iter().map(|c| c.score as u32).sum();
        (sum / comparisons.len() as u32) as u8
    };

    Ok(Json(BenchmarkResponse {
        athlete_id,
        position_group: group,
        position_label: group.label(),
        division,
        badge: division.badge(),
        overall_score,
        comparisons,
    }))
}
