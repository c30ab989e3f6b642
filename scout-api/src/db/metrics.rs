//! Combine metric snapshot persistence
//!
//! Snapshots are append-only: one row per testing session, never updated.

use anyhow::Result;
use scout_common::db::models::CombineMetric;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn metric_from_row(row: &SqliteRow) -> Result<CombineMetric> {
    let guid: String = row.get("guid");
    let athlete_id: String = row.get("athlete_id");

    Ok(CombineMetric {
        guid: Uuid::parse_str(&guid)?,
        athlete_id: Uuid::parse_str(&athlete_id)?,
        recorded_at: row.get("recorded_at"),
        forty_yard: row.get("forty_yard"),
        ten_yard_split: row.get("ten_yard_split"),
        shuttle: row.get("shuttle"),
        three_cone: row.get("three_cone"),
        vertical_jump: row.get("vertical_jump"),
        broad_jump: row.get("broad_jump"),
        bench_press: row.get("bench_press"),
        bench_press_reps: row.get("bench_press_reps"),
        squat_max: row.get("squat_max"),
        power_clean: row.get("power_clean"),
        deadlift: row.get("deadlift"),
        pull_ups: row.get("pull_ups"),
        created_at: row.get("created_at"),
    })
}

/// Append a new testing-session snapshot
pub async fn insert_metric(pool: &SqlitePool, metric: &CombineMetric) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO combine_metrics (
            guid, athlete_id, recorded_at, forty_yard, ten_yard_split,
            shuttle, three_cone, vertical_jump, broad_jump, bench_press,
            bench_press_reps, squat_max, power_clean, deadlift, pull_ups,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(metric.guid.to_string())
    .bind(metric.athlete_id.to_string())
    .bind(metric.recorded_at)
    .bind(metric.forty_yard)
    .bind(metric.ten_yard_split)
    .bind(metric.shuttle)
    .bind(metric.three_cone)
    .bind(metric.vertical_jump)
    .bind(metric.broad_jump)
    .bind(metric.bench_press)
    .bind(metric.bench_press_reps)
    .bind(metric.squat_max)
    .bind(metric.power_clean)
    .bind(metric.deadlift)
    .bind(metric.pull_ups)
    .bind(metric.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// All snapshots for an athlete, latest first
pub async fn list_metrics(pool: &SqlitePool, athlete_id: Uuid) -> Result<Vec<CombineMetric>> {
    let rows = sqlx::query(
        "SELECT * FROM combine_metrics WHERE athlete_id = ? ORDER BY recorded_at DESC, created_at DESC",
    )
    .bind(athlete_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(metric_from_row).collect()
}

/// Most recent snapshot for an athlete, if any
pub async fn latest_metric(pool: &SqlitePool, athlete_id: Uuid) -> Result<Option<CombineMetric>> {
    let row = sqlx::query(
        "SELECT * FROM combine_metrics WHERE athlete_id = ? ORDER BY recorded_at DESC, created_at DESC LIMIT 1",
    )
    .bind(athlete_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(|r| metric_from_row(&r)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use chrono::{NaiveDate, Utc};
    use scout_common::db::init_memory_database;

    fn snapshot(athlete_id: Uuid, recorded_at: NaiveDate, forty: f64) -> CombineMetric {
        CombineMetric {
            guid: Uuid::new_v4(),
            athlete_id,
            recorded_at,
            forty_yard: Some(forty),
            ten_yard_split: None,
            shuttle: Some(4.40),
            three_cone: None,
            vertical_jump: Some(31.0),
            broad_jump: None,
            bench_press: Some(185.0),
            bench_press_reps: Some(12),
            squat_max: None,
            power_clean: None,
            deadlift: None,
            pull_ups: Some(10),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_snapshots_listed_latest_first() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let older = snapshot(athlete.guid, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(), 5.0);
        let newer = snapshot(athlete.guid, NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(), 4.8);
        insert_metric(&pool, &older).await.unwrap();
        insert_metric(&pool, &newer).await.unwrap();

        let listed = list_metrics(&pool, athlete.guid).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].guid, newer.guid);
        assert_eq!(listed[1].guid, older.guid);

        let latest = latest_metric(&pool, athlete.guid).await.unwrap().unwrap();
        assert_eq!(latest.forty_yard, Some(4.8));
        assert_eq!(latest.pull_ups, Some(10));
    }

    #[tokio::test]
    async fn test_deleting_athlete_cascades_to_metrics() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let m = snapshot(athlete.guid, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(), 5.0);
        insert_metric(&pool, &m).await.unwrap();

        crate::db::athletes::delete_athlete(&pool, athlete.guid).await.unwrap();
        let listed = list_metrics(&pool, athlete.guid).await.unwrap();
        assert!(listed.is_empty());
    }
}
