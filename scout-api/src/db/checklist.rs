//! Application checklist persistence

use anyhow::Result;
use chrono::{DateTime, Utc};
use scout_common::db::models::ChecklistItem;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn item_from_row(row: &SqliteRow) -> Result<ChecklistItem> {
    let guid: String = row.get("guid");
    let athlete_id: String = row.get("athlete_id");
    let completed: i64 = row.get("completed");

    Ok(ChecklistItem {
        guid: Uuid::parse_str(&guid)?,
        athlete_id: Uuid::parse_str(&athlete_id)?,
        title: row.get("title"),
        category: row.get("category"),
        due_date: row.get("due_date"),
        completed: completed != 0,
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Save a new checklist item
pub async fn insert_item(pool: &SqlitePool, item: &ChecklistItem) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO checklist_items (
            guid, athlete_id, title, category, due_date, completed,
            completed_at, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.guid.to_string())
    .bind(item.athlete_id.to_string())
    .bind(&item.title)
    .bind(&item.category)
    .bind(item.due_date)
    .bind(item.completed as i64)
    .bind(item.completed_at)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one item by id
pub async fn load_item(pool: &SqlitePool, id: Uuid) -> Result<Option<ChecklistItem>> {
    let row = sqlx::query("SELECT * FROM checklist_items WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|r| item_from_row(&r)).transpose()
}

/// Items for an athlete, due-date order with undated items last
pub async fn list_items(pool: &SqlitePool, athlete_id: Uuid) -> Result<Vec<ChecklistItem>> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM checklist_items
        WHERE athlete_id = ?
        ORDER BY due_date IS NULL, due_date, created_at
        "#,
    )
    .bind(athlete_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

/// Persist an edited item (full row write)
pub async fn update_item(
    pool: &SqlitePool,
    item: &ChecklistItem,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE checklist_items SET
            title = ?, category = ?, due_date = ?, completed = ?,
            completed_at = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(&item.title)
    .bind(&item.category)
    .bind(item.due_date)
    .bind(item.completed as i64)
    .bind(item.completed_at)
    .bind(updated_at)
    .bind(item.guid.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an item. Returns whether a row was removed.
pub async fn delete_item(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM checklist_items WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// (total, completed) counts for an athlete's checklist
pub async fn completion_counts(pool: &SqlitePool, athlete_id: Uuid) -> Result<(i64, i64)> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS total, COALESCE(SUM(completed), 0) AS done FROM checklist_items WHERE athlete_id = ?",
    )
    .bind(athlete_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok((row.get("total"), row.get("done")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use chrono::NaiveDate;
    use scout_common::db::init_memory_database;

    fn item(athlete_id: Uuid, title: &str, due: Option<NaiveDate>) -> ChecklistItem {
        let now = Utc::now();
        ChecklistItem {
            guid: Uuid::new_v4(),
            athlete_id,
            title: title.to_string(),
            category: Some("applications".to_string()),
            due_date: due,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_items_ordered_by_due_date_with_undated_last() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let later = item(athlete.guid, "Campus visit", NaiveDate::from_ymd_opt(2026, 11, 1));
        let sooner = item(athlete.guid, "Transcript request", NaiveDate::from_ymd_opt(2026, 9, 1));
        let undated = item(athlete.guid, "Highlight reel", None);
        for i in [&later, &sooner, &undated] {
            insert_item(&pool, i).await.unwrap();
        }

        let listed = list_items(&pool, athlete.guid).await.unwrap();
        assert_eq!(listed[0].title, "Transcript request");
        assert_eq!(listed[1].title, "Campus visit");
        assert_eq!(listed[2].title, "Highlight reel");
    }

    #[tokio::test]
    async fn test_completion_counts() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let mut first = item(athlete.guid, "FAFSA", None);
        let second = item(athlete.guid, "Essay", None);
        insert_item(&pool, &first).await.unwrap();
        insert_item(&pool, &second).await.unwrap();

        first.completed = true;
        first.completed_at = Some(Utc::now());
        update_item(&pool, &first, Utc::now()).await.unwrap();

        let (total, done) = completion_counts(&pool, athlete.guid).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(done, 1);
    }
}
