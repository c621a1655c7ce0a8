// src/domain/game.rs

use serde::Serialize;

/// Placeholder Steam writes into the review summary when a listing has no
/// reviews yet. Treated the same as a missing summary during consolidation.
pub const NO_REVIEWS_SENTINEL: &str = "No user reviews";

/// One raw row from the `games` table, before JSON columns are parsed and
/// before absorption is resolved. Flags arrive as 0/1 integers and are
/// coerced on decode; the JSON-array columns stay as stored text here.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
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

    // JSON-array text columns.
    pub tags: Option<String>,
    pub genres: Option<String>,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub unique_channels: Option<String>,
}

/// A display-ready game: JSON columns parsed into ordered sequences, and
/// absorbed records patched with the inheritable fields of their parent.
/// Created fresh each query cycle and owned by the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsolidatedGame {
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

    pub tags: Vec<String>,
    pub genres: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub unique_channels: Vec<String>,
}

/// Derived statistics over one consolidated result set. Recomputed every
/// cycle; never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_games: usize,
    pub free_games: usize,
    /// Highest EUR price in the set.
    pub max_price: f64,
    /// Mean over strictly positive ratings only; 0.0 when none qualify.
    pub average_rating: f64,
    pub channel_count: usize,
    pub tag_count: usize,
}
