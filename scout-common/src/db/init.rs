//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the idempotent schema.
//! Every table uses `CREATE TABLE IF NOT EXISTS`, so startup is safe to
//! repeat against an existing file.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL keeps readers concurrent with the single writer
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema, for tests
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_athletes_table(pool).await?;
    create_combine_metrics_table(pool).await?;
    create_height_predictions_table(pool).await?;
    create_colleges_table(pool).await?;
    create_college_matches_table(pool).await?;
    create_social_posts_table(pool).await?;
    create_post_likes_table(pool).await?;
    create_checklist_items_table(pool).await?;
    create_injuries_table(pool).await?;
    create_parents_table(pool).await?;
    create_parent_athletes_table(pool).await?;
    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_athletes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS athletes (
            guid TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
            birth_date TEXT NOT NULL,
            position TEXT,
            grad_year INTEGER,
            school TEXT,
            city TEXT,
            state TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (grad_year IS NULL OR (grad_year >= 2000 AND grad_year <= 2100))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_athletes_name ON athletes(last_name, first_name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Combine testing sessions are append-only snapshots; there is no UPDATE
/// path for this table.
async fn create_combine_metrics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS combine_metrics (
            guid TEXT PRIMARY KEY,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            recorded_at TEXT NOT NULL,
            forty_yard REAL,
            ten_yard_split REAL,
            shuttle REAL,
            three_cone REAL,
            vertical_jump REAL,
            broad_jump REAL,
            bench_press REAL,
            bench_press_reps INTEGER,
            squat_max REAL,
            power_clean REAL,
            deadlift REAL,
            pull_ups INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (forty_yard IS NULL OR forty_yard > 0),
            CHECK (ten_yard_split IS NULL OR ten_yard_split > 0),
            CHECK (shuttle IS NULL OR shuttle > 0),
            CHECK (three_cone IS NULL OR three_cone > 0),
            CHECK (vertical_jump IS NULL OR vertical_jump >= 0),
            CHECK (broad_jump IS NULL OR broad_jump >= 0),
            CHECK (bench_press IS NULL OR bench_press >= 0),
            CHECK (bench_press_reps IS NULL OR bench_press_reps >= 0),
            CHECK (squat_max IS NULL OR squat_max >= 0),
            CHECK (power_clean IS NULL OR power_clean >= 0),
            CHECK (deadlift IS NULL OR deadlift >= 0),
            CHECK (pull_ups IS NULL OR pull_ups >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_combine_metrics_athlete ON combine_metrics(athlete_id, recorded_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Saved prediction snapshots are append-only, like combine metrics.
async fn create_height_predictions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS height_predictions (
            guid TEXT PRIMARY KEY,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
            age_years REAL NOT NULL,
            height_in REAL NOT NULL,
            weight_lb REAL NOT NULL,
            mother_height_in REAL NOT NULL,
            father_height_in REAL NOT NULL,
            predicted_height_in REAL NOT NULL,
            predicted_height_cm REAL NOT NULL,
            margin_in REAL NOT NULL,
            percent_complete REAL NOT NULL,
            remaining_in REAL NOT NULL,
            remaining_cm REAL NOT NULL,
            interpretation TEXT NOT NULL,
            recommended_positions TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (age_years >= 8.0 AND age_years <= 18.0),
            CHECK (percent_complete >= 0.0 AND percent_complete <= 100.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_height_predictions_athlete ON height_predictions(athlete_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_colleges_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS colleges (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            division TEXT NOT NULL CHECK (division IN ('d1', 'd2', 'd3', 'naia', 'juco')),
            conference TEXT,
            city TEXT,
            state TEXT,
            enrollment INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (enrollment IS NULL OR enrollment > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_colleges_division ON colleges(division)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Match scores arrive from the upstream matching service; this table only
/// stores and serves them.
async fn create_college_matches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS college_matches (
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            college_id TEXT NOT NULL REFERENCES colleges(guid) ON DELETE CASCADE,
            academic_fit INTEGER NOT NULL,
            athletic_fit INTEGER NOT NULL,
            financial_fit INTEGER NOT NULL,
            overall INTEGER NOT NULL,
            computed_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (athlete_id, college_id),
            CHECK (academic_fit >= 0 AND academic_fit <= 100),
            CHECK (athletic_fit >= 0 AND athletic_fit <= 100),
            CHECK (financial_fit >= 0 AND financial_fit <= 100),
            CHECK (overall >= 0 AND overall <= 100)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_college_matches_athlete ON college_matches(athlete_id, overall)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_social_posts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS social_posts (
            guid TEXT PRIMARY KEY,
            author_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            body TEXT NOT NULL,
            media_url TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(body) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_social_posts_created ON social_posts(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_post_likes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS post_likes (
            post_id TEXT NOT NULL REFERENCES social_posts(guid) ON DELETE CASCADE,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (post_id, athlete_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_post_likes_post ON post_likes(post_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_checklist_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checklist_items (
            guid TEXT PRIMARY KEY,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            title TEXT NOT NULL,
            category TEXT,
            due_date TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TIMESTAMP,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(title) > 0),
            CHECK (completed IN (0, 1))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_checklist_items_athlete ON checklist_items(athlete_id, due_date)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_injuries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS injuries (
            guid TEXT PRIMARY KEY,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            injury_type TEXT NOT NULL,
            body_part TEXT,
            occurred_on TEXT,
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'recovering', 'cleared')),
            notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(injury_type) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_injuries_athlete ON injuries(athlete_id, status)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_parents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parents (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_parent_athletes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parent_athletes (
            parent_id TEXT NOT NULL REFERENCES parents(guid) ON DELETE CASCADE,
            athlete_id TEXT NOT NULL REFERENCES athletes(guid) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (parent_id, athlete_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "feed_page_size", "50").await?;
    ensure_setting(pool, "metrics_page_size", "100").await?;
    ensure_setting(pool, "http_request_timeout_ms", "30000").await?;
    ensure_setting(pool, "http_max_body_size_bytes", "1048576").await?;

    Ok(())
}

/// Ensure a setting exists with the specified default value.
///
/// Missing settings are created; NULL values are reset to the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // INSERT OR IGNORE handles concurrent initialization races
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;
    }

    Ok(())
}
