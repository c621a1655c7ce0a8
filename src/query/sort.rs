// src/query/sort.rs
//
// Maps a sort selection to an ORDER BY expression. Three regimes: a fixed
// table of simple single-column sorts, user-assembled advanced criteria, and
// the closed catalog of smart discovery presets. Advanced and smart
// orderings always end with two deterministic tie-breakers (latest video
// date descending, then name ascending) so otherwise-tied rows have a
// strict total order.

use crate::filters::{Currency, SortDirection, SortKey, SortSpec};

use super::time_window::{MONTHLY_DAYS, RECENT_DAYS, SEMI_RECENT_DAYS};

/// Derived channel count: separators in the JSON channel list plus one.
const CHANNEL_COUNT_EXPR: &str =
    "(LENGTH(g.unique_channels) - LENGTH(REPLACE(g.unique_channels, ',', '')) + 1)";

const TIE_BREAKERS: &str = "g.latest_video_date DESC, g.name COLLATE NOCASE ASC";

/// The closed catalog of smart discovery presets. Adding one is a
/// compile-time-checked addition here, not a new string branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartSortPreset {
    BestValue,
    HiddenGems,
    MostCovered,
    Trending,
    CreatorConsensus,
    RecentDiscoveries,
    VideoRecency,
    TimeRangeReleases,
    PriceValue,
    SteamOptimized,
    ItchDiscoveries,
    PremiumQuality,
    TagMatch,
    ChannelPicks,
}

impl SmartSortPreset {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "best-value" => Some(SmartSortPreset::BestValue),
            "hidden-gems" => Some(SmartSortPreset::HiddenGems),
            "most-covered" => Some(SmartSortPreset::MostCovered),
            "trending" => Some(SmartSortPreset::Trending),
            "creator-consensus" => Some(SmartSortPreset::CreatorConsensus),
            "recent-discoveries" => Some(SmartSortPreset::RecentDiscoveries),
            "video-recency" => Some(SmartSortPreset::VideoRecency),
            "time-range-releases" => Some(SmartSortPreset::TimeRangeReleases),
            "price-value" => Some(SmartSortPreset::PriceValue),
            "steam-optimized" => Some(SmartSortPreset::SteamOptimized),
            "itch-discoveries" => Some(SmartSortPreset::ItchDiscoveries),
            "premium-quality" => Some(SmartSortPreset::PremiumQuality),
            "tag-match" => Some(SmartSortPreset::TagMatch),
            "channel-picks" => Some(SmartSortPreset::ChannelPicks),
            _ => None,
        }
    }
}

/// Stateless ordering resolver.
#[derive(Debug, Default)]
pub struct SortStrategy;

impl SortStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a sort selection to the body of an ORDER BY clause. Never
    /// fails: an unrecognized identifier falls back to recency descending.
    pub fn resolve(&self, sort_by: &str, sort_spec: Option<&SortSpec>, currency: Currency) -> String {
        match sort_spec {
            Some(SortSpec::Advanced { primary, secondary }) => {
                self.advanced(primary, secondary.as_ref(), currency)
            }
            // A bare field name acts as an advanced primary, descending.
            Some(SortSpec::Field(field)) => self.advanced(
                &SortKey {
                    field: field.clone(),
                    direction: SortDirection::Desc,
                },
                None,
                currency,
            ),
            None => match SmartSortPreset::from_key(sort_by) {
                Some(preset) => self.smart(preset, currency),
                None => self.simple(sort_by, currency),
            },
        }
    }

    /// Whether this selection orders on the release date, which requires the
    /// sortable-date-not-null guard in the WHERE clause.
    pub fn uses_release_date(&self, sort_by: &str, sort_spec: Option<&SortSpec>) -> bool {
        match sort_spec {
            Some(SortSpec::Advanced { primary, secondary }) => {
                primary.field == "release"
                    || secondary.as_ref().is_some_and(|s| s.field == "release")
            }
            Some(SortSpec::Field(field)) => field == "release",
            None => matches!(
                sort_by,
                "release-new" | "release-old" | "time-range-releases"
            ),
        }
    }

    /// Fixed table of simple single-column sorts.
    fn simple(&self, sort_by: &str, currency: Currency) -> String {
        let ordering = match sort_by {
            "rating" => "g.positive_review_percentage DESC".to_string(),
            "reviews" => "g.review_count DESC".to_string(),
            "date" => "g.latest_video_date DESC".to_string(),
            "name" => "g.name COLLATE NOCASE ASC".to_string(),
            "release-new" => "g.release_date_sortable DESC".to_string(),
            "release-old" => "g.release_date_sortable ASC".to_string(),
            "price-low" => format!("{} ASC", price_rank_expr(currency)),
            "price-high" => format!("{} DESC", price_rank_expr(currency)),
            // Documented fallback for anything unrecognized.
            _ => "g.latest_video_date DESC".to_string(),
        };
        format!("{ordering}, {TIE_BREAKERS}")
    }

    fn advanced(&self, primary: &SortKey, secondary: Option<&SortKey>, currency: Currency) -> String {
        let mut keys = vec![advanced_key(primary, currency)];
        if let Some(secondary) = secondary {
            keys.push(advanced_key(secondary, currency));
        }
        keys.push(TIE_BREAKERS.to_string());
        keys.join(", ")
    }

    /// Multi-tier ranking presets: priority buckets over fixed thresholds,
    /// then numeric tie-breaks.
    fn smart(&self, preset: SmartSortPreset, currency: Currency) -> String {
        let price = format!("COALESCE({}, 0)", currency.price_column());
        let price_rank = price_rank_expr(currency);
        let recent = sql_days_ago(RECENT_DAYS);
        let semi_recent = sql_days_ago(SEMI_RECENT_DAYS);
        let monthly = sql_days_ago(MONTHLY_DAYS);

        let ordering = match preset {
            SmartSortPreset::BestValue => format!(
                "CASE WHEN g.positive_review_percentage >= 85 AND {price} <= 10 THEN 0 \
                 WHEN g.positive_review_percentage >= 75 AND {price} <= 20 THEN 1 \
                 ELSE 2 END ASC, {price_rank} ASC, g.positive_review_percentage DESC"
            ),
            SmartSortPreset::HiddenGems => {
                "CASE WHEN g.positive_review_percentage >= 85 AND g.video_count <= 3 THEN 0 \
                 WHEN g.positive_review_percentage >= 80 AND g.video_count <= 5 THEN 1 \
                 ELSE 2 END ASC, g.positive_review_percentage DESC, g.video_count ASC"
                    .to_string()
            }
            SmartSortPreset::MostCovered => {
                "g.video_count DESC, g.positive_review_percentage DESC, g.latest_video_date DESC"
                    .to_string()
            }
            SmartSortPreset::Trending => format!(
                "CASE WHEN g.latest_video_date >= {recent} AND g.video_count >= 3 THEN 0 \
                 WHEN g.latest_video_date >= {semi_recent} AND g.video_count >= 2 THEN 1 \
                 ELSE 2 END ASC, g.latest_video_date DESC, g.video_count DESC"
            ),
            SmartSortPreset::CreatorConsensus => format!(
                "CASE WHEN {CHANNEL_COUNT_EXPR} >= 5 AND g.positive_review_percentage >= 80 THEN 0 \
                 WHEN {CHANNEL_COUNT_EXPR} >= 3 AND g.positive_review_percentage >= 75 THEN 1 \
                 ELSE 2 END ASC, {CHANNEL_COUNT_EXPR} DESC, g.positive_review_percentage DESC"
            ),
            SmartSortPreset::RecentDiscoveries => format!(
                "CASE WHEN g.latest_video_date >= {recent} AND g.positive_review_percentage >= 80 THEN 0 \
                 WHEN g.latest_video_date >= {monthly} AND g.positive_review_percentage >= 70 THEN 1 \
                 ELSE 2 END ASC, g.latest_video_date DESC, g.positive_review_percentage DESC"
            ),
            SmartSortPreset::VideoRecency => {
                "g.latest_video_date DESC, g.video_count DESC".to_string()
            }
            SmartSortPreset::TimeRangeReleases => {
                "g.release_date_sortable DESC, g.latest_video_date DESC".to_string()
            }
            SmartSortPreset::PriceValue => {
                format!("{price_rank} ASC, g.positive_review_percentage DESC")
            }
            SmartSortPreset::SteamOptimized => {
                "g.positive_review_percentage DESC, g.review_count DESC".to_string()
            }
            SmartSortPreset::ItchDiscoveries => {
                "g.latest_video_date DESC, g.positive_review_percentage DESC".to_string()
            }
            SmartSortPreset::PremiumQuality => {
                format!("g.positive_review_percentage DESC, {price} DESC")
            }
            SmartSortPreset::TagMatch => {
                "g.positive_review_percentage DESC, g.video_count DESC".to_string()
            }
            SmartSortPreset::ChannelPicks => {
                format!("{CHANNEL_COUNT_EXPR} DESC, g.latest_video_date DESC")
            }
        };
        format!("{ordering}, {TIE_BREAKERS}")
    }
}

/// One advanced criterion rendered as a sort key. Unknown fields fall back
/// to recency so a stale URL never breaks the query.
fn advanced_key(key: &SortKey, currency: Currency) -> String {
    let expr = match key.field.as_str() {
        "rating" => "g.positive_review_percentage".to_string(),
        "coverage" => "g.video_count".to_string(),
        "recency" => "g.latest_video_date".to_string(),
        "release" => "g.release_date_sortable".to_string(),
        "price" => price_rank_expr(currency),
        "channels" => CHANNEL_COUNT_EXPR.to_string(),
        "reviews" => "g.review_count".to_string(),
        _ => "g.latest_video_date".to_string(),
    };
    format!("{expr} {}", key.direction.as_sql())
}

/// Sortable price with a sentinel substituted for free/zero entries, so
/// ascending ranks free games first and descending ranks them last.
fn price_rank_expr(currency: Currency) -> String {
    let col = currency.price_column();
    format!("CASE WHEN g.is_free = 1 OR COALESCE({col}, 0) = 0 THEN -1 ELSE {col} END")
}

fn sql_days_ago(days: i64) -> String {
    format!("datetime('now', '-{days} days')")
}
