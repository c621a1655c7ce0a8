// src/query/time_window.rs
//
// Resolves the named relative-time presets ("smart" time filters) into
// absolute date boundaries, computed against a caller-supplied `now` so the
// same preset resolves identically within one query cycle and in tests.

use chrono::{DateTime, Datelike, Duration, Utc};

use super::{JoinSpec, SqlParam};

/// Day spans the presets (and the trending/recent smart sorts) are built on.
pub const RECENT_DAYS: i64 = 7;
pub const SEMI_RECENT_DAYS: i64 = 14;
pub const MONTHLY_DAYS: i64 = 30;
pub const YEARLY_DAYS: i64 = 365;

/// Lower bound of the "old game" window for `OldGameNewAttention`.
const OLD_GAME_FLOOR_SORTABLE: i64 = 2020_01_01;

/// The closed catalog of smart time presets. String keys from the UI are
/// decoded once here; an unknown key is simply no preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartTimePreset {
    /// Released within the last 30 days AND covered by a video in the last
    /// 30 days.
    ReleaseAndVideoRecent,
    /// First-ever video for the game landed within the last 30 days.
    FirstVideoRecent,
    /// At least two videos within the last 7 days.
    MultipleVideosRecent,
    /// Released between 2020-01-01 and a year ago, but covered by a video in
    /// the last 30 days.
    OldGameNewAttention,
}

impl SmartTimePreset {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "release-and-video-recent" => Some(SmartTimePreset::ReleaseAndVideoRecent),
            "first-video-recent" => Some(SmartTimePreset::FirstVideoRecent),
            "multiple-videos-recent" => Some(SmartTimePreset::MultipleVideosRecent),
            "old-game-new-attention" => Some(SmartTimePreset::OldGameNewAttention),
            _ => None,
        }
    }
}

/// A resolved preset: a WHERE fragment, its bound parameters, and an
/// optional aggregate sub-join the base query must carry.
#[derive(Debug)]
pub struct TimeWindow {
    pub predicate: String,
    pub params: Vec<SqlParam>,
    pub join: Option<JoinSpec>,
}

/// Stateless resolver for smart time presets.
#[derive(Debug, Default)]
pub struct TimeWindowResolver;

impl TimeWindowResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, preset: SmartTimePreset, now: DateTime<Utc>) -> TimeWindow {
        match preset {
            SmartTimePreset::ReleaseAndVideoRecent => TimeWindow {
                predicate: "(g.release_date_sortable IS NOT NULL \
                            AND g.release_date_sortable >= ? \
                            AND g.latest_video_date >= ?)"
                    .into(),
                params: vec![
                    SqlParam::Int(sortable_days_ago(now, MONTHLY_DAYS)),
                    SqlParam::Text(timestamp_days_ago(now, MONTHLY_DAYS)),
                ],
                join: None,
            },
            SmartTimePreset::FirstVideoRecent => TimeWindow {
                predicate: "fv.first_video_date >= ?".into(),
                params: vec![SqlParam::Text(timestamp_days_ago(now, MONTHLY_DAYS))],
                join: Some(JoinSpec {
                    name: "first_video",
                    sql: "LEFT JOIN (SELECT game_id, MIN(video_date) AS first_video_date \
                          FROM game_videos GROUP BY game_id) fv ON fv.game_id = g.id"
                        .into(),
                    params: vec![],
                }),
            },
            SmartTimePreset::MultipleVideosRecent => TimeWindow {
                predicate: "rv.recent_video_count >= 2".into(),
                params: vec![],
                join: Some(JoinSpec {
                    name: "recent_videos",
                    sql: "LEFT JOIN (SELECT game_id, COUNT(*) AS recent_video_count \
                          FROM game_videos WHERE video_date >= ? \
                          GROUP BY game_id HAVING COUNT(*) >= 2) rv ON rv.game_id = g.id"
                        .into(),
                    params: vec![SqlParam::Text(timestamp_days_ago(now, RECENT_DAYS))],
                }),
            },
            SmartTimePreset::OldGameNewAttention => TimeWindow {
                predicate: format!(
                    "(g.release_date_sortable IS NOT NULL \
                     AND g.release_date_sortable >= {OLD_GAME_FLOOR_SORTABLE} \
                     AND g.release_date_sortable <= ? \
                     AND g.latest_video_date >= ?)"
                ),
                params: vec![
                    SqlParam::Int(sortable_days_ago(now, YEARLY_DAYS)),
                    SqlParam::Text(timestamp_days_ago(now, MONTHLY_DAYS)),
                ],
                join: None,
            },
        }
    }
}

/// `now - days` as the integer YYYYMMDD sortable encoding.
fn sortable_days_ago(now: DateTime<Utc>, days: i64) -> i64 {
    let date = (now - Duration::days(days)).date_naive();
    date.year() as i64 * 10000 + date.month() as i64 * 100 + date.day() as i64
}

/// `now - days` as the text timestamp format stored in the video columns.
fn timestamp_days_ago(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
