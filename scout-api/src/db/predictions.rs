//! Saved height-prediction snapshot persistence
//!
//! Append-only, like combine metrics. The recommended position list is
//! stored as a JSON array so a re-read returns exactly what was computed.

use anyhow::{anyhow, Result};
use scout_common::db::models::HeightPrediction;
use scout_common::growth::Sex;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn prediction_from_row(row: &SqliteRow) -> Result<HeightPrediction> {
    let guid: String = row.get("guid");
    let athlete_id: String = row.get("athlete_id");
    let sex: String = row.get("sex");
    let positions: String = row.get("recommended_positions");

    Ok(HeightPrediction {
        guid: Uuid::parse_str(&guid)?,
        athlete_id: Uuid::parse_str(&athlete_id)?,
        sex: Sex::parse(&sex).ok_or_else(|| anyhow!("invalid sex value: {}", sex))?,
        age_years: row.get("age_years"),
        height_in: row.get("height_in"),
        weight_lb: row.get("weight_lb"),
        mother_height_in: row.get("mother_height_in"),
        father_height_in: row.get("father_height_in"),
        predicted_height_in: row.get("predicted_height_in"),
        predicted_height_cm: row.get("predicted_height_cm"),
        margin_in: row.get("margin_in"),
        percent_complete: row.get("percent_complete"),
        remaining_in: row.get("remaining_in"),
        remaining_cm: row.get("remaining_cm"),
        interpretation: row.get("interpretation"),
        recommended_positions: serde_json::from_str(&positions)?,
        created_at: row.get("created_at"),
    })
}

/// Append a prediction snapshot to an athlete profile
pub async fn insert_prediction(pool: &SqlitePool, prediction: &HeightPrediction) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO height_predictions (
            guid, athlete_id, sex, age_years, height_in, weight_lb,
            mother_height_in, father_height_in, predicted_height_in,
            predicted_height_cm, margin_in, percent_complete, remaining_in,
            remaining_cm, interpretation, recommended_positions, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(prediction.guid.to_string())
    .bind(prediction.athlete_id.to_string())
    .bind(prediction.sex.as_str())
    .bind(prediction.age_years)
    .bind(prediction.height_in)
    .bind(prediction.weight_lb)
    .bind(prediction.mother_height_in)
    .bind(prediction.father_height_in)
    .bind(prediction.predicted_height_in)
    .bind(prediction.predicted_height_cm)
    .bind(prediction.margin_in)
    .bind(prediction.percent_complete)
    .bind(prediction.remaining_in)
    .bind(prediction.remaining_cm)
    .bind(&prediction.interpretation)
    .bind(serde_json::to_string(&prediction.recommended_positions)?)
    .bind(prediction.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Saved snapshots for an athlete, latest first
pub async fn list_predictions(pool: &SqlitePool, athlete_id: Uuid) -> Result<Vec<HeightPrediction>> {
    let rows = sqlx::query(
        "SELECT * FROM height_predictions WHERE athlete_id = ? ORDER BY created_at DESC",
    )
    .bind(athlete_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(prediction_from_row).collect()
}

/// Most recently saved snapshot for an athlete, if any
pub async fn latest_prediction(
    pool: &SqlitePool,
    athlete_id: Uuid,
) -> Result<Option<HeightPrediction>> {
    let row = sqlx::query(
        "SELECT * FROM height_predictions WHERE athlete_id = ? ORDER BY created_at DESC LIMIT 1",
    )
    .bind(athlete_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(|r| prediction_from_row(&r)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use chrono::Utc;
    use scout_common::db::init_memory_database;
    use scout_common::growth::{predict, PredictionInput};

    #[tokio::test]
    async fn test_saved_prediction_reads_back_identically() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let input = PredictionInput {
            sex: Sex::Male,
            age_years: 16.0,
            height_in: 70.0,
            weight_lb: 160.0,
            mother_height_in: 65.0,
            father_height_in: 71.0,
        };
        let result = predict(&input);

        let snapshot = HeightPrediction {
            guid: Uuid::new_v4(),
            athlete_id: athlete.guid,
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
            interpretation: result.interpretation.clone(),
            recommended_positions: result.recommended_positions.clone(),
            created_at: Utc::now(),
        };
        insert_prediction(&pool, &snapshot).await.unwrap();

        let loaded = latest_prediction(&pool, athlete.guid).await.unwrap().unwrap();
        assert_eq!(loaded.predicted_height_in, result.predicted_height_in);
        assert_eq!(loaded.percent_complete, result.percent_complete);
        assert_eq!(loaded.recommended_positions, result.recommended_positions);
        assert_eq!(loaded.interpretation, result.interpretation);
    }
}
