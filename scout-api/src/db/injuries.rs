//! Injury record persistence

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use scout_common::db::models::{Injury, InjuryStatus};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn injury_from_row(row: &SqliteRow) -> Result<Injury> {
    let guid: String = row.get("guid");
    let athlete_id: String = row.get("athlete_id");
    let status: String = row.get("status");

    Ok(Injury {
        guid: Uuid::parse_str(&guid)?,
        athlete_id: Uuid::parse_str(&athlete_id)?,
        injury_type: row.get("injury_type"),
        body_part: row.get("body_part"),
        occurred_on: row.get("occurred_on"),
        status: InjuryStatus::parse(&status).ok_or_else(|| anyhow!("invalid status: {}", status))?,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Save a new injury record
pub async fn insert_injury(pool: &SqlitePool, injury: &Injury) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO injuries (
            guid, athlete_id, injury_type, body_part, occurred_on, status,
            notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(injury.guid.to_string())
    .bind(injury.athlete_id.to_string())
    .bind(&injury.injury_type)
    .bind(&injury.body_part)
    .bind(injury.occurred_on)
    .bind(injury.status.as_str())
    .bind(&injury.notes)
    .bind(injury.created_at)
    .bind(injury.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one injury record by id
pub async fn load_injury(pool: &SqlitePool, id: Uuid) -> Result<Option<Injury>> {
    let row = sqlx::query("SELECT * FROM injuries WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|r| injury_from_row(&r)).transpose()
}

/// Injury history for an athlete, newest first
pub async fn list_injuries(pool: &SqlitePool, athlete_id: Uuid) -> Result<Vec<Injury>> {
    let rows = sqlx::query(
        "SELECT * FROM injuries WHERE athlete_id = ? ORDER BY occurred_on DESC, created_at DESC",
    )
    .bind(athlete_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(injury_from_row).collect()
}

/// Persist an edited injury record (full row write)
pub async fn update_injury(pool: &SqlitePool, injury: &Injury, updated_at: DateTime<Utc>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE injuries SET
            injury_type = ?, body_part = ?, occurred_on = ?, status = ?,
            notes = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(&injury.injury_type)
    .bind(&injury.body_part)
    .bind(injury.occurred_on)
    .bind(injury.status.as_str())
    .bind(&injury.notes)
    .bind(updated_at)
    .bind(injury.guid.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an injury record. Returns whether a row was removed.
pub async fn delete_injury(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM injuries WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use chrono::NaiveDate;
    use scout_common::db::init_memory_database;

    #[tokio::test]
    async fn test_injury_lifecycle() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let now = Utc::now();
        let mut injury = Injury {
            guid: Uuid::new_v4(),
            athlete_id: athlete.guid,
            injury_type: "Ankle sprain".to_string(),
            body_part: Some("Left ankle".to_string()),
            occurred_on: NaiveDate::from_ymd_opt(2026, 5, 20),
            status: InjuryStatus::Active,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        insert_injury(&pool, &injury).await.unwrap();

        injury.status = InjuryStatus::Cleared;
        injury.notes = Some("Cleared by trainer".to_string());
        update_injury(&pool, &injury, Utc::now()).await.unwrap();

        let listed = list_injuries(&pool, athlete.guid).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, InjuryStatus::Cleared);
        assert_eq!(listed[0].notes.as_deref(), Some("Cleared by trainer"));

        assert!(delete_injury(&pool, injury.guid).await.unwrap());
        assert!(load_injury(&pool, injury.guid).await.unwrap().is_none());
    }
}
