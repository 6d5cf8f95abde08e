use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::history;
use crate::models::{DrawRecord, RankedResult};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn count_draws(pool: &PgPool) -> anyhow::Result<i64> {
    let count: i64 = sqlx::query("SELECT COUNT(*) AS total FROM keno_bias.draws")
        .fetch_one(pool)
        .await?
        .get("total");
    Ok(count)
}

/// The most recent `limit` draws, ascending by game id.
pub async fn fetch_window(pool: &PgPool, limit: usize) -> anyhow::Result<Vec<DrawRecord>> {
    let limit = i64::try_from(limit).context("window size too large")?;
    let rows = sqlx::query(
        r#"
        SELECT game_id, drawn_at, numbers, scraped_at
        FROM keno_bias.draws
        ORDER BY game_id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut draws = Vec::with_capacity(rows.len());
    for row in rows.into_iter().rev() {
        draws.push(DrawRecord {
            game_id: row.get("game_id"),
            timestamp: row.get("drawn_at"),
            numbers: row.get("numbers"),
            scraped_at: row.get::<Option<NaiveDateTime>, _>("scraped_at"),
        });
    }

    debug!(draws = draws.len(), "fetched draw window");
    Ok(draws)
}

pub async fn insert_draw(pool: &PgPool, draw: &DrawRecord) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO keno_bias.draws (game_id, drawn_at, numbers, scraped_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (game_id) DO NOTHING
        "#,
    )
    .bind(draw.game_id)
    .bind(&draw.timestamp)
    .bind(&draw.numbers)
    .bind(draw.scraped_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Imports a history CSV, skipping games already stored.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let draws = history::load_csv(csv_path)?;
    let mut inserted = 0usize;

    for draw in &draws {
        if insert_draw(pool, draw)
            .await
            .with_context(|| format!("failed to store game {}", draw.game_id))?
        {
            inserted += 1;
        }
    }

    info!(
        read = draws.len(),
        inserted,
        skipped = draws.len() - inserted,
        "import finished"
    );
    Ok(inserted)
}

/// Stores a completed analysis and returns its run id.
pub async fn record_run(
    pool: &PgPool,
    result: &RankedResult,
    created_at: DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let payload = serde_json::to_string(result).context("failed to serialize result")?;
    let window_games = i32::try_from(result.window_games).context("window too large")?;
    let qualifying_count = i32::try_from(result.qualifying.len()).context("too many qualifiers")?;

    sqlx::query(
        r#"
        INSERT INTO keno_bias.analysis_runs
        (id, created_at, window_games, first_game_id, last_game_id,
         dominant_region, alert, qualifying_count, combined_rarity, result)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(id)
    .bind(created_at)
    .bind(window_games)
    .bind(result.first_game_id)
    .bind(result.last_game_id)
    .bind(result.dominant_region.map(|r| r.to_string()))
    .bind(result.alert)
    .bind(qualifying_count)
    .bind(result.combined_rarity)
    .bind(payload)
    .execute(pool)
    .await?;

    info!(%id, alert = result.alert, "analysis run recorded");
    Ok(id)
}
