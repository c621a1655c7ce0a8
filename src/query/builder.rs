// src/query/builder.rs
//
// Composes one parameterized SELECT over the games snapshot from a
// FilterSpec. Predicates are appended in selectivity-first order behind a
// tautological anchor; user-supplied values are always bound, and the
// parameter list is emitted in the exact order the placeholders appear in
// the text. The builder is total: a bad filter value drops its predicate or
// falls back to a default, it never errors.

use chrono::{DateTime, Utc};

use crate::filters::{FilterSpec, Platform, PriceFilter, ReleaseStatus, TimeFilterKind};

use super::search::SearchFragmentResolver;
use super::sort::SortStrategy;
use super::time_window::{SmartTimePreset, TimeWindowResolver};
use super::{QueryParts, SqlParam};

/// Hidden-gems thresholds. Internal constants, inlined rather than bound.
const HIDDEN_GEM_MIN_RATING: i64 = 80;
const HIDDEN_GEM_MIN_VIDEOS: i64 = 1;
const HIDDEN_GEM_MAX_VIDEOS: i64 = 3;
const HIDDEN_GEM_MIN_REVIEWS: i64 = 50;

/// Output shape of the built query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// All game columns, ordered.
    Full,
    /// A single COUNT(*) scalar; no ordering.
    Count,
    /// Price columns only, for histogram/slider bounds; no ordering.
    PriceOnly,
}

impl Projection {
    fn select(&self) -> &'static str {
        match self {
            Projection::Full => "SELECT g.* FROM games g",
            Projection::Count => "SELECT COUNT(*) FROM games g",
            Projection::PriceOnly => "SELECT g.price_eur, g.price_usd, g.is_free FROM games g",
        }
    }
}

/// A rendered query: text plus bound parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub query_text: String,
    pub parameters: Vec<SqlParam>,
}

/// Stateless query composer. Holds the two sub-resolvers; safe to share and
/// re-invoke from any call site without coordination.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    sort: SortStrategy,
    time_windows: TimeWindowResolver,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            sort: SortStrategy::new(),
            time_windows: TimeWindowResolver::new(),
        }
    }

    /// Build against the current wall clock.
    pub fn build(
        &self,
        spec: &FilterSpec,
        search: &dyn SearchFragmentResolver,
        projection: Projection,
    ) -> BuiltQuery {
        self.build_at(spec, search, projection, Utc::now())
    }

    /// Build with an explicit `now` reference for the relative-time presets.
    /// Identical inputs yield byte-identical output.
    pub fn build_at(
        &self,
        spec: &FilterSpec,
        search: &dyn SearchFragmentResolver,
        projection: Projection,
        now: DateTime<Utc>,
    ) -> BuiltQuery {
        let mut parts = QueryParts::new(projection.select());

        // 1. Sortable-date guard: needed whenever the ordering or a release
        // time window compares on release_date_sortable.
        let sorting_on_release = projection == Projection::Full
            && self
                .sort
                .uses_release_date(&spec.sort_by, spec.sort_spec.as_ref());
        let release_time_window = spec.time_filter.kind == TimeFilterKind::Release;
        if sorting_on_release || release_time_window {
            parts.push_predicate("g.release_date_sortable IS NOT NULL", vec![]);
        }

        self.push_platform(&mut parts, spec);
        self.push_cross_platform(&mut parts, spec);
        self.push_rating(&mut parts, spec);
        self.push_hidden_gems(&mut parts, spec);
        self.push_release_status(&mut parts, spec);
        self.push_tags(&mut parts, spec);
        self.push_channels(&mut parts, spec);
        self.push_price(&mut parts, spec);
        self.push_time(&mut parts, spec, now);

        if !spec.search_query.trim().is_empty() {
            if let Some(fragment) =
                search.resolve(&spec.search_query, spec.search_in_video_titles)
            {
                parts.set_search_fragment(fragment);
            }
        }

        if projection == Projection::Full {
            parts.set_order_by(self.sort.resolve(
                &spec.sort_by,
                spec.sort_spec.as_ref(),
                spec.currency,
            ));
        }

        parts.render()
    }

    // 2. Platform. Steam and CrazyGames listings filter to non-absorbed
    // records of that platform. Itch is a tri-state disjunction: an itch
    // game may appear standalone, as a cross-link on a Steam parent, or as
    // an absorbed child, and stays reachable in all three shapes. With no
    // platform selected, absorbed records are hidden unless the
    // cross-platform filter takes over below.
    fn push_platform(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        match spec.platform {
            Platform::Steam | Platform::CrazyGames => {
                let value = spec.platform.as_store_value().unwrap_or_default();
                parts.push_predicate(
                    "(g.platform = ? AND g.is_absorbed = 0)",
                    vec![SqlParam::Text(value.to_string())],
                );
            }
            Platform::Itch => {
                parts.push_predicate(
                    "((g.platform = 'itch' AND g.is_absorbed = 0) \
                     OR (g.platform = 'steam' AND g.itch_url IS NOT NULL) \
                     OR (g.platform = 'itch' AND g.is_absorbed = 1))",
                    vec![],
                );
            }
            Platform::All => {
                if !spec.cross_platform {
                    parts.push_predicate("g.is_absorbed = 0", vec![]);
                }
            }
        }
    }

    // 3. Cross-platform: at least two storefront URLs present, never on
    // absorbed children.
    fn push_cross_platform(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        if spec.platform == Platform::All && spec.cross_platform {
            parts.push_predicate(
                "((CASE WHEN g.steam_url IS NOT NULL THEN 1 ELSE 0 END \
                 + CASE WHEN g.itch_url IS NOT NULL THEN 1 ELSE 0 END \
                 + CASE WHEN g.crazygames_url IS NOT NULL THEN 1 ELSE 0 END) >= 2 \
                 AND g.is_absorbed = 0)",
                vec![],
            );
        }
    }

    // 4. Rating threshold; an unparsable string silently skips the filter.
    fn push_rating(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        if let Some(threshold) = spec.rating_threshold() {
            parts.push_predicate(
                "g.positive_review_percentage >= ?",
                vec![SqlParam::Int(threshold)],
            );
        }
    }

    // 5. Hidden gems: well-reviewed, barely covered, enough reviews to trust
    // the score.
    fn push_hidden_gems(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        if spec.hidden_gems {
            parts.push_predicate(
                format!(
                    "(g.positive_review_percentage >= {HIDDEN_GEM_MIN_RATING} \
                     AND g.video_count BETWEEN {HIDDEN_GEM_MIN_VIDEOS} AND {HIDDEN_GEM_MAX_VIDEOS} \
                     AND g.review_count >= {HIDDEN_GEM_MIN_REVIEWS})"
                ),
                vec![],
            );
        }
    }

    // 6. Release status. Lifecycle flags only exist on Steam records, so
    // "released" passes every non-Steam platform through.
    fn push_release_status(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        match spec.release_status {
            ReleaseStatus::All => {}
            ReleaseStatus::Released => {
                parts.push_predicate(
                    "(g.platform != 'steam' \
                     OR (g.platform = 'steam' AND g.coming_soon = 0 \
                     AND g.is_early_access = 0 AND g.is_demo = 0))",
                    vec![],
                );
            }
            ReleaseStatus::EarlyAccess => {
                parts.push_predicate(
                    "(g.platform = 'steam' AND g.is_early_access = 1 AND g.coming_soon = 0)",
                    vec![],
                );
            }
            ReleaseStatus::ComingSoon => {
                parts.push_predicate("(g.platform = 'steam' AND g.coming_soon = 1)", vec![]);
            }
        }
    }

    // 7. Tags: one LIKE per tag against the JSON-array text, AND- or
    // OR-combined. The quoted pattern keeps "Horror" from matching
    // "Psychological Horror" inside the array text.
    fn push_tags(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        if spec.selected_tags.is_empty() {
            return;
        }
        let connective = match spec.tag_logic {
            crate::filters::TagLogic::And => " AND ",
            crate::filters::TagLogic::Or => " OR ",
        };
        let clauses: Vec<&str> = spec.selected_tags.iter().map(|_| "g.tags LIKE ?").collect();
        let params = spec
            .selected_tags
            .iter()
            .map(|tag| SqlParam::Text(format!("%\"{tag}\"%")))
            .collect();
        parts.push_predicate(format!("({})", clauses.join(connective)), params);
    }

    // 8. Channels: always OR-combined.
    fn push_channels(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        if spec.selected_channels.is_empty() {
            return;
        }
        let clauses: Vec<&str> = spec
            .selected_channels
            .iter()
            .map(|_| "g.unique_channels LIKE ?")
            .collect();
        let params = spec
            .selected_channels
            .iter()
            .map(|ch| SqlParam::Text(format!("%\"{ch}\"%")))
            .collect();
        parts.push_predicate(format!("({})", clauses.join(" OR ")), params);
    }

    // 9. Price window: free clause only when the window starts at zero, paid
    // range only when a ceiling is set. The unrestricted default applies no
    // predicate at all.
    fn push_price(&self, parts: &mut QueryParts, spec: &FilterSpec) {
        let PriceFilter {
            min_price,
            max_price,
        } = spec.price_filter;
        if spec.price_filter.is_unrestricted() {
            return;
        }

        let col = spec.currency.price_column();
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if min_price == 0.0 {
            clauses.push(format!("(g.is_free = 1 OR COALESCE({col}, 0) = 0)"));
        }
        if max_price > 0.0 {
            clauses.push(format!("(g.is_free = 0 AND {col} >= ? AND {col} <= ?)"));
            params.push(SqlParam::Real(min_price));
            params.push(SqlParam::Real(max_price));
        }
        if clauses.is_empty() {
            return;
        }
        parts.push_predicate(format!("({})", clauses.join(" OR ")), params);
    }

    // 10. Time filter; the three modes are mutually exclusive by construction.
    fn push_time(&self, parts: &mut QueryParts, spec: &FilterSpec, now: DateTime<Utc>) {
        let filter = &spec.time_filter;
        match filter.kind {
            TimeFilterKind::None => {}
            TimeFilterKind::Video => {
                // Picker dates carry no time of day; normalize to the full
                // span of each bounding day.
                if let Some(start) = filter.start_date.as_deref().filter(|s| !s.is_empty()) {
                    parts.push_predicate(
                        "g.latest_video_date >= ?",
                        vec![SqlParam::Text(format!("{start} 00:00:00"))],
                    );
                }
                if let Some(end) = filter.end_date.as_deref().filter(|s| !s.is_empty()) {
                    parts.push_predicate(
                        "g.latest_video_date <= ?",
                        vec![SqlParam::Text(format!("{end} 23:59:59"))],
                    );
                }
            }
            TimeFilterKind::Release => {
                if let Some(start) = filter
                    .start_date
                    .as_deref()
                    .and_then(sortable_from_date_key)
                {
                    parts.push_predicate(
                        "g.release_date_sortable >= ?",
                        vec![SqlParam::Int(start)],
                    );
                }
                if let Some(end) = filter.end_date.as_deref().and_then(sortable_from_date_key) {
                    parts
                        .push_predicate("g.release_date_sortable <= ?", vec![SqlParam::Int(end)]);
                }
            }
            TimeFilterKind::Smart => {
                let preset = filter
                    .smart_logic
                    .as_deref()
                    .or(filter.preset.as_deref())
                    .and_then(SmartTimePreset::from_key);
                if let Some(preset) = preset {
                    let window = self.time_windows.resolve(preset, now);
                    if let Some(join) = window.join {
                        parts.add_join(join);
                    }
                    parts.push_predicate(window.predicate, window.params);
                }
            }
        }
    }
}

/// `"2024-01-15"` → `20240115`. Strips separators and parses the digits, so
/// any `YYYY-MM-DD`-like key works; anything else yields `None` and the
/// bound is skipped.
pub fn sortable_from_date_key(key: &str) -> Option<i64> {
    let digits: String = key.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 8 {
        return None;
    }
    digits.parse().ok()
}
