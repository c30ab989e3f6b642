//! Athlete profile persistence

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use scout_common::db::models::Athlete;
use scout_common::growth::Sex;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn athlete_from_row(row: &SqliteRow) -> Result<Athlete> {
    let guid: String = row.get("guid");
    let sex: String = row.get("sex");

    Ok(Athlete {
        guid: Uuid::parse_str(&guid)?,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        sex: Sex::parse(&sex).ok_or_else(|| anyhow!("invalid sex value: {}", sex))?,
        birth_date: row.get("birth_date"),
        position: row.get("position"),
        grad_year: row.get("grad_year"),
        school: row.get("school"),
        city: row.get("city"),
        state: row.get("state"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Save a new athlete profile
pub async fn insert_athlete(pool: &SqlitePool, athlete: &Athlete) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO athletes (
            guid, first_name, last_name, sex, birth_date, position,
            grad_year, school, city, state, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(athlete.guid.to_string())
    .bind(&athlete.first_name)
    .bind(&athlete.last_name)
    .bind(athlete.sex.as_str())
    .bind(athlete.birth_date)
    .bind(&athlete.position)
    .bind(athlete.grad_year)
    .bind(&athlete.school)
    .bind(&athlete.city)
    .bind(&athlete.state)
    .bind(athlete.created_at)
    .bind(athlete.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an athlete by id
pub async fn load_athlete(pool: &SqlitePool, id: Uuid) -> Result<Option<Athlete>> {
    let row = sqlx::query("SELECT * FROM athletes WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|r| athlete_from_row(&r)).transpose()
}

/// List all athletes, ordered by name
pub async fn list_athletes(pool: &SqlitePool) -> Result<Vec<Athlete>> {
    let rows = sqlx::query("SELECT * FROM athletes ORDER BY last_name, first_name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(athlete_from_row).collect()
}

/// Persist an updated athlete profile (full row write)
pub async fn update_athlete(pool: &SqlitePool, athlete: &Athlete, updated_at: DateTime<Utc>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE athletes SET
            first_name = ?, last_name = ?, sex = ?, birth_date = ?,
            position = ?, grad_year = ?, school = ?, city = ?, state = ?,
            updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(&athlete.first_name)
    .bind(&athlete.last_name)
    .bind(athlete.sex.as_str())
    .bind(athlete.birth_date)
    .bind(&athlete.position)
    .bind(athlete.grad_year)
    .bind(&athlete.school)
    .bind(&athlete.city)
    .bind(&athlete.state)
    .bind(updated_at)
    .bind(athlete.guid.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an athlete (cascades to dependent rows). Returns whether a row
/// was removed.
pub async fn delete_athlete(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM athletes WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
