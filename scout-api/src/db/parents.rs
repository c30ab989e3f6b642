//! Parent accounts and dashboard queries

use anyhow::Result;
use chrono::NaiveDate;
use scout_common::db::models::{Athlete, Parent};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Save a new parent account
pub async fn insert_parent(pool: &SqlitePool, parent: &Parent) -> Result<()> {
    sqlx::query("INSERT INTO parents (guid, name, email) VALUES (?, ?, ?)")
        .bind(parent.guid.to_string())
        .bind(&parent.name)
        .bind(&parent.email)
        .execute(pool)
        .await?;

    Ok(())
}

/// Load a parent by id
pub async fn load_parent(pool: &SqlitePool, id: Uuid) -> Result<Option<Parent>> {
    let row = sqlx::query("SELECT guid, name, email FROM parents WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|r| {
        let guid: String = r.get("guid");
        Ok(Parent {
            guid: Uuid::parse_str(&guid)?,
            name: r.get("name"),
            email: r.get("email"),
        })
    })
    .transpose()
}

/// Whether a parent account already uses this email
pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM parents WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Link a parent to an athlete (idempotent)
pub async fn link_athlete(pool: &SqlitePool, parent_id: Uuid, athlete_id: Uuid) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO parent_athletes (parent_id, athlete_id) VALUES (?, ?)")
        .bind(parent_id.to_string())
        .bind(athlete_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Athletes linked to a parent, ordered by name
pub async fn linked_athletes(pool: &SqlitePool, parent_id: Uuid) -> Result<Vec<Athlete>> {
    let rows = sqlx::query(
        r#"
        SELECT a.* FROM athletes a
        JOIN parent_athletes pa ON pa.athlete_id = a.guid
        WHERE pa.parent_id = ?
        ORDER BY a.last_name, a.first_name
        "#,
    )
    .bind(parent_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let guid: String = row.get("guid");
            let sex: String = row.get("sex");
            Ok(Athlete {
                guid: Uuid::parse_str(&guid)?,
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                sex: scout_common::growth::Sex::parse(&sex)
                    .ok_or_else(|| anyhow::anyhow!("invalid sex value: {}", sex))?,
                birth_date: row.get("birth_date"),
                position: row.get("position"),
                grad_year: row.get("grad_year"),
                school: row.get("school"),
                city: row.get("city"),
                state: row.get("state"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
        })
        .collect()
}

/// Date of the most recent combine session for an athlete, if any
pub async fn latest_metric_date(pool: &SqlitePool, athlete_id: Uuid) -> Result<Option<NaiveDate>> {
    let date: Option<NaiveDate> =
        sqlx::query_scalar("SELECT MAX(recorded_at) FROM combine_metrics WHERE athlete_id = ?")
            .bind(athlete_id.to_string())
            .fetch_one(pool)
            .await?;

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use scout_common::db::init_memory_database;

    #[tokio::test]
    async fn test_link_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let parent = Parent {
            guid: Uuid::new_v4(),
            name: "Casey Hayes".to_string(),
            email: "casey@example.com".to_string(),
        };
        insert_parent(&pool, &parent).await.unwrap();

        link_athlete(&pool, parent.guid, athlete.guid).await.unwrap();
        link_athlete(&pool, parent.guid, athlete.guid).await.unwrap();

        let linked = linked_athletes(&pool, parent.guid).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].guid, athlete.guid);
    }

    #[tokio::test]
    async fn test_latest_metric_date_empty() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;
        assert!(latest_metric_date(&pool, athlete.guid).await.unwrap().is_none());
    }
}
