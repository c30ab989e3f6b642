//! Social feed persistence

use anyhow::Result;
use scout_common::db::models::SocialPost;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn post_from_row(row: &SqliteRow) -> Result<SocialPost> {
    let guid: String = row.get("guid");
    let author_id: String = row.get("author_id");

    Ok(SocialPost {
        guid: Uuid::parse_str(&guid)?,
        author_id: Uuid::parse_str(&author_id)?,
        body: row.get("body"),
        media_url: row.get("media_url"),
        like_count: row.get("like_count"),
        created_at: row.get("created_at"),
    })
}

/// Save a new feed post
pub async fn insert_post(pool: &SqlitePool, post: &SocialPost) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO social_posts (guid, author_id, body, media_url, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(post.guid.to_string())
    .bind(post.author_id.to_string())
    .bind(&post.body)
    .bind(&post.media_url)
    .bind(post.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Feed page, latest first, with like counts
pub async fn list_posts(pool: &SqlitePool, limit: i64) -> Result<Vec<SocialPost>> {
    let rows = sqlx::query(
        r#"
        SELECT p.guid, p.author_id, p.body, p.media_url, p.created_at,
               (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.guid) AS like_count
        FROM social_posts p
        ORDER BY p.created_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(post_from_row).collect()
}

/// Delete a post. Returns whether a row was removed.
pub async fn delete_post(pool: &SqlitePool, post_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM social_posts WHERE guid = ?")
        .bind(post_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Toggle a like for (post, athlete).
///
/// Returns `None` when the post doesn't exist, otherwise the new liked
/// state and the post's like count after the toggle.
pub async fn toggle_like(
    pool: &SqlitePool,
    post_id: Uuid,
    athlete_id: Uuid,
) -> Result<Option<(bool, i64)>> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM social_posts WHERE guid = ?)")
        .bind(post_id.to_string())
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(None);
    }

    let already_liked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = ? AND athlete_id = ?)",
    )
    .bind(post_id.to_string())
    .bind(athlete_id.to_string())
    .fetch_one(pool)
    .await?;

    if already_liked {
        sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND athlete_id = ?")
            .bind(post_id.to_string())
            .bind(athlete_id.to_string())
            .execute(pool)
            .await?;
    } else {
        sqlx::query("INSERT INTO post_likes (post_id, athlete_id) VALUES (?, ?)")
            .bind(post_id.to_string())
            .bind(athlete_id.to_string())
            .execute(pool)
            .await?;
    }

    let like_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ?")
        .bind(post_id.to_string())
        .fetch_one(pool)
        .await?;

    Ok(Some((!already_liked, like_count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::athletes::test_support::seed_athlete;
    use chrono::Utc;
    use scout_common::db::init_memory_database;

    #[tokio::test]
    async fn test_like_toggle_round_trip() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let post = SocialPost {
            guid: Uuid::new_v4(),
            author_id: athlete.guid,
            body: "New 40 time: 4.48!".to_string(),
            media_url: None,
            like_count: 0,
            created_at: Utc::now(),
        };
        insert_post(&pool, &post).await.unwrap();

        let (liked, count) = toggle_like(&pool, post.guid, athlete.guid).await.unwrap().unwrap();
        assert!(liked);
        assert_eq!(count, 1);

        let (liked, count) = toggle_like(&pool, post.guid, athlete.guid).await.unwrap().unwrap();
        assert!(!liked);
        assert_eq!(count, 0);

        // Unknown post reports None rather than erroring
        assert!(toggle_like(&pool, Uuid::new_v4(), athlete.guid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_feed_lists_latest_first_with_counts() {
        let pool = init_memory_database().await.unwrap();
        let athlete = seed_athlete(&pool).await;

        let first = SocialPost {
            guid: Uuid::new_v4(),
            author_id: athlete.guid,
            body: "first".to_string(),
            media_url: None,
            like_count: 0,
            created_at: Utc::now() - chrono::Duration::minutes(5),
        };
        let second = SocialPost {
            guid: Uuid::new_v4(),
            author_id: athlete.guid,
            body: "second".to_string(),
            media_url: Some("https://example.com/clip.mp4".to_string()),
            like_count: 0,
            created_at: Utc::now(),
        };
        insert_post(&pool, &first).await.unwrap();
        insert_post(&pool, &second).await.unwrap();
        toggle_like(&pool, first.guid, athlete.guid).await.unwrap();

        let feed = list_posts(&pool, 50).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].body, "second");
        assert_eq!(feed[1].like_count, 1);
    }
}
