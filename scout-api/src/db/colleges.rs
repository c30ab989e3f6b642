//! College and match-score persistence
//!
//! Match scores are pushed by the upstream matching service and replaced
//! wholesale per athlete; this module never computes a score.

use anyhow::Result;
use chrono::{DateTime, Utc};
use scout_common::db::models::{College, CollegeMatch};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn college_from_row(row: &SqliteRow) -> Result<College> {
    let guid: String = row.get("guid");

    Ok(College {
        guid: Uuid::parse_str(&guid)?,
        name: row.get("name"),
        division: row.get("division"),
        conference: row.get("conference"),
        city: row.get("city"),
        state: row.get("state"),
        enrollment: row.get("enrollment"),
    })
}

/// Incoming college descriptor from the upstream matcher
#[derive(Debug, Clone)]
pub struct CollegeUpsert {
    pub name: String,
    pub division: String,
    pub conference: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub enrollment: Option<i64>,
}

/// Insert or update a college by name, returning its id
pub async fn upsert_college(pool: &SqlitePool, college: &CollegeUpsert) -> Result<Uuid> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT guid FROM colleges WHERE name = ?")
        .bind(&college.name)
        .fetch_optional(pool)
        .await?;

    if let Some((guid,)) = existing {
        sqlx::query(
            r#"
            UPDATE colleges SET
                division = ?, conference = ?, city = ?, state = ?,
                enrollment = ?, updated_at = CURRENT_TIMESTAMP
            WHERE guid = ?
            "#,
        )
        .bind(&college.division)
        .bind(&college.conference)
        .bind(&college.city)
        .bind(&college.state)
        .bind(college.enrollment)
        .bind(&guid)
        .execute(pool)
        .await?;

        return Ok(Uuid::parse_str(&guid)?);
    }

    let guid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO colleges (guid, name, division, conference, city, state, enrollment)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid.to_string())
    .bind(&college.name)
    .bind(&college.division)
    .bind(&college.conference)
    .bind(&college.city)
    .bind(&college.state)
    .bind(college.enrollment)
    .execute(pool)
    .await?;

    Ok(guid)
}

/// List all colleges, ordered by name
pub async fn list_colleges(pool: &SqlitePool) -> Result<Vec<College>> {
    let rows = sqlx::query("SELECT * FROM colleges ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(college_from_row).collect()
}

/// Replace the stored match set for an athlete with a fresh upstream batch
pub async fn replace_matches(
    pool: &SqlitePool,
    athlete_id: Uuid,
    matches: &[(Uuid, CollegeMatch)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM college_matches WHERE athlete_id = ?")
        .bind(athlete_id.to_string())
        .execute(&mut *tx)
        .await?;

    for (college_id, m) in matches {
        sqlx::query(
            r#"
            INSERT INTO college_matches (
                athlete_id, college_id, academic_fit, athletic_fit,
                financial_fit, overall, computed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(athlete_id.to_string())
        .bind(college_id.to_string())
        .bind(m.academic_fit)
        .bind(m.athletic_fit)
        .bind(m.financial_fit)
        .bind(m.overall)
        .bind(m.computed_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Stored matches for an athlete joined with their colleges, best overall
/// fit first, optionally filtered by division.
pub async fn list_matches(
    pool: &SqlitePool,
    athlete_id: Uuid,
    division: Option<&str>,
) -> Result<Vec<(CollegeMatch, College)>> {
    let sql = if division.is_some() {
        r#"
        SELECT m.athlete_id, m.college_id, m.academic_fit, m.athletic_fit,
               m.financial_fit, m.overall, m.computed_at,
               c.guid, c.name, c.division, c.conference, c.city, c.state, c.enrollment
        FROM college_matches m
        JOIN colleges c ON c.guid = m.college_id
        WHERE m.athlete_id = ? AND c.division = ?
        ORDER BY m.overall DESC
        "#
    } else {
        r#"
        SELECT m.athlete_id, m.college_id, m.academic_fit, m.athletic_fit,
               m.financial_fit, m.overall, m.computed_at,
               c.guid, c.name, c.division, c.conference, c.city, c.state, c.enrollment
        FROM college_matches m
        JOIN colleges c ON c.guid = m.college_id
        WHERE m.athlete_id = ?
        ORDER BY m.overall DESC
        "#
    };

    let mut query = sqlx::query(sql).bind(athlete_id.to_string());
    if let Some(division) = division {
        query = query.bind(division);
    }

    let rows = query.fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            let athlete: String = row.get("athlete_id");
            let college_id: String = row.get("college_id");
            let computed_at: DateTime<Utc> = row.get("computed_at");
            let m = CollegeMatch {
                athlete_id: Uuid::parse_str(&athlete)?,
                college_id: Uuid::parse_str(&college_id)?,
                academic_fit: row.get("academic_fit"),
                athletic_fit: row.get("athletic_fit"),
                financial_fit: row.get("financial_fit"),
                overall: row.get("overall"),
                computed_at,
            };
            let c = college_from_row(row)?;
            Ok((m, c))
        })
        .collect()
}
