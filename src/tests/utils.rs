// src/tests/utils.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::params;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::{self, init_db, Database};
use crate::domain::{ConsolidatedGame, Consolidator};
use crate::filters::FilterSpec;
use crate::query::{BasicSearchResolver, Projection, QueryBuilder};

/// Returns a fresh test database using the production schema.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "gamescout_{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize test DB");
    db
}

/// Fixed "now" so relative-time presets resolve deterministically.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// `fixed_now() - days`, in the stored timestamp format.
pub fn days_ago(days: i64) -> String {
    (fixed_now() - Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Seed row for the `games` table; override what the test cares about and
/// take the rest from `Default`.
pub struct SeedGame {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub is_absorbed: bool,
    pub absorbed_into: Option<String>,
    pub release_date: Option<String>,
    pub release_date_sortable: Option<i64>,
    pub coming_soon: bool,
    pub is_early_access: bool,
    pub is_demo: bool,
    pub is_free: bool,
    pub price_eur: Option<f64>,
    pub price_usd: Option<f64>,
    pub positive_review_percentage: Option<i64>,
    pub review_count: Option<i64>,
    pub review_summary: Option<String>,
    pub review_summary_priority: Option<i64>,
    pub header_image: Option<String>,
    pub steam_url: Option<String>,
    pub itch_url: Option<String>,
    pub crazygames_url: Option<String>,
    pub video_count: i64,
    pub latest_video_date: Option<String>,
    pub tags: Option<String>,
    pub genres: Option<String>,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub unique_channels: Option<String>,
}

impl Default for SeedGame {
    fn default() -> Self {
        Self {
            id: "steam:1".into(),
            name: "Test Game".into(),
            platform: "steam".into(),
            is_absorbed: false,
            absorbed_into: None,
            release_date: Some("15 Jan, 2024".into()),
            release_date_sortable: Some(20240115),
            coming_soon: false,
            is_early_access: false,
            is_demo: false,
            is_free: false,
            price_eur: Some(9.99),
            price_usd: Some(9.99),
            positive_review_percentage: Some(85),
            review_count: Some(100),
            review_summary: Some("Very Positive".into()),
            review_summary_priority: Some(1),
            header_image: Some("header.jpg".into()),
            steam_url: Some("https://store.steampowered.com/app/1".into()),
            itch_url: None,
            crazygames_url: None,
            video_count: 1,
            latest_video_date: Some("2025-06-01 10:00:00".into()),
            tags: Some(r#"["Roguelike"]"#.into()),
            genres: Some(r#"["Action"]"#.into()),
            developers: Some(r#"["Dev Studio"]"#.into()),
            publishers: Some(r#"["Pub House"]"#.into()),
            unique_channels: Some(r#"["ChannelOne"]"#.into()),
        }
    }
}

pub fn insert_game(db: &Database, g: &SeedGame) {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO games (
                id, name, platform, is_absorbed, absorbed_into,
                release_date, release_date_sortable, coming_soon, is_early_access, is_demo,
                is_free, price_eur, price_usd,
                positive_review_percentage, review_count, review_summary, review_summary_priority,
                header_image, steam_url, itch_url, crazygames_url,
                video_count, latest_video_date,
                tags, genres, developers, publishers, unique_channels
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28
            )
            "#,
            params![
                g.id,
                g.name,
                g.platform,
                g.is_absorbed as i64,
                g.absorbed_into,
                g.release_date,
                g.release_date_sortable,
                g.coming_soon as i64,
                g.is_early_access as i64,
                g.is_demo as i64,
                g.is_free as i64,
                g.price_eur,
                g.price_usd,
                g.positive_review_percentage,
                g.review_count,
                g.review_summary,
                g.review_summary_priority,
                g.header_image,
                g.steam_url,
                g.itch_url,
                g.crazygames_url,
                g.video_count,
                g.latest_video_date,
                g.tags,
                g.genres,
                g.developers,
                g.publishers,
                g.unique_channels,
            ],
        )
        .map_err(|e| crate::errors::CatalogError::DbError(e.to_string()))?;
        Ok(())
    })
    .expect("Failed to seed game");
}

pub fn insert_video(db: &Database, game_id: &str, title: &str, channel: &str, date: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO game_videos (game_id, video_title, channel_name, video_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![game_id, title, channel, date],
        )
        .map_err(|e| crate::errors::CatalogError::DbError(e.to_string()))?;
        Ok(())
    })
    .expect("Failed to seed video");
}

/// Build at the fixed clock, execute, consolidate.
pub fn run_full(db: &Database, spec: &FilterSpec) -> Vec<ConsolidatedGame> {
    let builder = QueryBuilder::new();
    let query = builder.build_at(spec, &BasicSearchResolver, Projection::Full, fixed_now());
    let output = db::execute(db, &query).expect("Query execution failed");
    Consolidator::new().project(&output)
}

pub fn ids(games: &[ConsolidatedGame]) -> Vec<&str> {
    games.iter().map(|g| g.id.as_str()).collect()
}

pub fn placeholder_count(text: &str) -> usize {
    text.matches('?').count()
}
