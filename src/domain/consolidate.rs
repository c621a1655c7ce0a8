// src/domain/consolidate.rs
//
// Turns raw query output into display-ready entities. Absorbed records
// (a demo or a cross-listed platform entry folded into a parent listing)
// inherit a fixed set of fields from their parent, but only where their own
// value is missing; price, storefront URLs and the record's own tags are
// never overwritten. The second job is the aggregate pass feeding the
// stats header.

use std::collections::{HashMap, HashSet};

use rusqlite::types::Value;

use crate::db::store::QueryOutput;

use super::game::{AggregateStats, ConsolidatedGame, GameRecord, NO_REVIEWS_SENTINEL};

/// Stateless row consolidation service.
#[derive(Debug, Default)]
pub struct Consolidator;

impl Consolidator {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw rows, resolve absorption, parse JSON columns. Never fails:
    /// a malformed stored JSON column logs a warning and decodes to an empty
    /// sequence, and a dangling `absorbed_into` key leaves the record as-is.
    pub fn project(&self, output: &QueryOutput) -> Vec<ConsolidatedGame> {
        let index = ColumnIndex::new(&output.columns);
        let records: Vec<GameRecord> = output
            .rows
            .iter()
            .map(|row| decode_record(&index, row))
            .collect();

        // Parents first: only non-absorbed records can be inherited from.
        let parents: HashMap<&str, &GameRecord> = records
            .iter()
            .filter(|r| !r.is_absorbed)
            .map(|r| (r.id.as_str(), r))
            .collect();

        records
            .iter()
            .map(|record| {
                let parent = record
                    .absorbed_into
                    .as_deref()
                    .filter(|_| record.is_absorbed)
                    .and_then(|key| parents.get(key).copied());
                consolidate_one(record, parent)
            })
            .collect()
    }

    /// Derived statistics over the full consolidated set.
    pub fn aggregate(&self, games: &[ConsolidatedGame]) -> AggregateStats {
        let mut channels: HashSet<&str> = HashSet::new();
        let mut tags: HashSet<&str> = HashSet::new();
        let mut max_price: f64 = 0.0;
        let mut rating_sum: i64 = 0;
        let mut rated = 0usize;
        let mut free = 0usize;

        for game in games {
            if game.is_free {
                free += 1;
            }
            if let Some(price) = game.price_eur {
                if price > max_price {
                    max_price = price;
                }
            }
            // Zero means "no rating data", not a zero score.
            if let Some(rating) = game.positive_review_percentage.filter(|r| *r > 0) {
                rating_sum += rating;
                rated += 1;
            }
            channels.extend(game.unique_channels.iter().map(String::as_str));
            tags.extend(game.tags.iter().map(String::as_str));
        }

        AggregateStats {
            total_games: games.len(),
            free_games: free,
            max_price,
            average_rating: if rated > 0 {
                rating_sum as f64 / rated as f64
            } else {
                0.0
            },
            channel_count: channels.len(),
            tag_count: tags.len(),
        }
    }
}

/// Apply the inheritance rule and parse the JSON-array columns.
fn consolidate_one(record: &GameRecord, parent: Option<&GameRecord>) -> ConsolidatedGame {
    let mut review_summary = record.review_summary.clone();
    let mut positive_review_percentage = record.positive_review_percentage;
    let mut review_count = record.review_count;
    let mut review_summary_priority = record.review_summary_priority;
    let mut header_image = record.header_image.clone();
    let mut release_date = record.release_date.clone();
    let mut release_date_sortable = record.release_date_sortable;

    if let Some(parent) = parent {
        // The review block inherits as a unit: a child holding only the
        // "No user reviews" placeholder takes the parent's real summary,
        // percentage, count and priority together.
        let own_reviews_missing = match review_summary.as_deref() {
            None => true,
            Some(s) => s.trim().is_empty() || s == NO_REVIEWS_SENTINEL,
        };
        if own_reviews_missing {
            review_summary = parent.review_summary.clone();
            positive_review_percentage = parent.positive_review_percentage;
            review_count = parent.review_count;
            review_summary_priority = parent.review_summary_priority;
        }
        if header_image.as_deref().map_or(true, |s| s.is_empty()) {
            header_image = parent.header_image.clone();
        }
        if release_date.as_deref().map_or(true, |s| s.is_empty()) {
            release_date = parent.release_date.clone();
            release_date_sortable = parent.release_date_sortable;
        }
    }

    ConsolidatedGame {
        id: record.id.clone(),
        name: record.name.clone(),
        platform: record.platform.clone(),
        is_absorbed: record.is_absorbed,
        absorbed_into: record.absorbed_into.clone(),
        release_date,
        release_date_sortable,
        coming_soon: record.coming_soon,
        is_early_access: record.is_early_access,
        is_demo: record.is_demo,
        is_free: record.is_free,
        price_eur: record.price_eur,
        price_usd: record.price_usd,
        positive_review_percentage,
        review_count,
        review_summary,
        review_summary_priority,
        header_image,
        steam_url: record.steam_url.clone(),
        itch_url: record.itch_url.clone(),
        crazygames_url: record.crazygames_url.clone(),
        video_count: record.video_count,
        latest_video_date: record.latest_video_date.clone(),
        tags: parse_string_array(&record.id, "tags", record.tags.as_deref()),
        genres: parse_string_array(&record.id, "genres", record.genres.as_deref()),
        developers: parse_string_array(&record.id, "developers", record.developers.as_deref()),
        publishers: parse_string_array(&record.id, "publishers", record.publishers.as_deref()),
        unique_channels: parse_string_array(
            &record.id,
            "unique_channels",
            record.unique_channels.as_deref(),
        ),
    }
}

/// Parse a JSON-array text column into an ordered string sequence. A parse
/// failure is a data problem in the snapshot, not a reason to drop the
/// record: log it and carry on with an empty sequence.
fn parse_string_array(game_id: &str, column: &str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("game {game_id}: malformed JSON in column {column}: {e}");
            Vec::new()
        }
    }
}

/// Column-name → position map for one result set.
struct ColumnIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> ColumnIndex<'a> {
    fn new(columns: &'a [String]) -> Self {
        Self {
            positions: columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), i))
                .collect(),
        }
    }

    fn get<'r>(&self, row: &'r [Value], name: &str) -> Option<&'r Value> {
        self.positions.get(name).and_then(|&i| row.get(i))
    }

    fn text(&self, row: &[Value], name: &str) -> Option<String> {
        match self.get(row, name) {
            Some(Value::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn integer(&self, row: &[Value], name: &str) -> Option<i64> {
        match self.get(row, name) {
            Some(Value::Integer(n)) => Some(*n),
            Some(Value::Real(x)) => Some(*x as i64),
            _ => None,
        }
    }

    fn real(&self, row: &[Value], name: &str) -> Option<f64> {
        match self.get(row, name) {
            Some(Value::Real(x)) => Some(*x),
            Some(Value::Integer(n)) => Some(*n as f64),
            _ => None,
        }
    }

    fn flag(&self, row: &[Value], name: &str) -> bool {
        self.integer(row, name).unwrap_or(0) != 0
    }
}

fn decode_record(index: &ColumnIndex, row: &[Value]) -> GameRecord {
    GameRecord {
        id: index.text(row, "id").unwrap_or_default(),
        name: index.text(row, "name").unwrap_or_default(),
        platform: index.text(row, "platform").unwrap_or_default(),
        is_absorbed: index.flag(row, "is_absorbed"),
        absorbed_into: index.text(row, "absorbed_into"),
        release_date: index.text(row, "release_date"),
        release_date_sortable: index.integer(row, "release_date_sortable"),
        coming_soon: index.flag(row, "coming_soon"),
        is_early_access: index.flag(row, "is_early_access"),
        is_demo: index.flag(row, "is_demo"),
        is_free: index.flag(row, "is_free"),
        price_eur: index.real(row, "price_eur"),
        price_usd: index.real(row, "price_usd"),
        positive_review_percentage: index.integer(row, "positive_review_percentage"),
        review_count: index.integer(row, "review_count"),
        review_summary: index.text(row, "review_summary"),
        review_summary_priority: index.integer(row, "review_summary_priority"),
        header_image: index.text(row, "header_image"),
        steam_url: index.text(row, "steam_url"),
        itch_url: index.text(row, "itch_url"),
        crazygames_url: index.text(row, "crazygames_url"),
        video_count: index.integer(row, "video_count").unwrap_or(0),
        latest_video_date: index.text(row, "latest_video_date"),
        tags: index.text(row, "tags"),
        genres: index.text(row, "genres"),
        developers: index.text(row, "developers"),
        publishers: index.text(row, "publishers"),
        unique_channels: index.text(row, "unique_channels"),
    }
}
