// src/filters.rs
//
// The complete set of user-selected filter, sort and search options for one
// query cycle. The values originate from loosely validated UI/URL state, so
// every enumerated domain is normalized here through a `from_key` constructor
// that maps unknown strings to a documented default instead of erroring.
// Deep inside predicate assembly the spec is already well-formed.

/// Release lifecycle filter. Unknown keys fall back to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseStatus {
    #[default]
    All,
    Released,
    EarlyAccess,
    ComingSoon,
}

impl ReleaseStatus {
    pub fn from_key(key: &str) -> Self {
        match key {
            "released" => ReleaseStatus::Released,
            "early-access" => ReleaseStatus::EarlyAccess,
            "coming-soon" => ReleaseStatus::ComingSoon,
            _ => ReleaseStatus::All,
        }
    }
}

/// Storefront platform filter. Unknown keys fall back to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    All,
    Steam,
    Itch,
    CrazyGames,
}

impl Platform {
    pub fn from_key(key: &str) -> Self {
        match key {
            "steam" => Platform::Steam,
            "itch" => Platform::Itch,
            "crazygames" => Platform::CrazyGames,
            _ => Platform::All,
        }
    }

    /// Column value as stored in the `games.platform` column.
    pub fn as_store_value(&self) -> Option<&'static str> {
        match self {
            Platform::All => None,
            Platform::Steam => Some("steam"),
            Platform::Itch => Some("itch"),
            Platform::CrazyGames => Some("crazygames"),
        }
    }
}

/// How multiple selected tags combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagLogic {
    #[default]
    And,
    Or,
}

impl TagLogic {
    pub fn from_key(key: &str) -> Self {
        match key {
            "or" => TagLogic::Or,
            _ => TagLogic::And,
        }
    }
}

/// Price display/filter currency. Unknown keys fall back to `Eur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Eur,
    Usd,
}

impl Currency {
    pub fn from_key(key: &str) -> Self {
        match key {
            "usd" => Currency::Usd,
            _ => Currency::Eur,
        }
    }

    /// The price column this currency filters and sorts on.
    pub fn price_column(&self) -> &'static str {
        match self {
            Currency::Eur => "g.price_eur",
            Currency::Usd => "g.price_usd",
        }
    }
}

/// Which date axis a time filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilterKind {
    #[default]
    None,
    /// Bounds on the latest-video timestamp.
    Video,
    /// Bounds on the sortable release date.
    Release,
    /// One of the named relative-time presets.
    Smart,
}

impl TimeFilterKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "video" => TimeFilterKind::Video,
            "release" => TimeFilterKind::Release,
            "smart" => TimeFilterKind::Smart,
            _ => TimeFilterKind::None,
        }
    }
}

/// Time filter selection. `start_date`/`end_date` are `YYYY-MM-DD` strings
/// from the date pickers; `smart_logic` is a preset key decoded by the
/// time-window resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeFilter {
    pub kind: TimeFilterKind,
    pub preset: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub smart_logic: Option<String>,
}

/// Price window. `(0.0, 0.0)` is the unrestricted default and disables the
/// predicate entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFilter {
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 0.0,
        }
    }
}

impl PriceFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.min_price == 0.0 && self.max_price == 0.0
    }
}

/// Direction of an advanced sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_key(key: &str) -> Self {
        match key {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One criterion of an advanced sort: a field key plus a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Optional refinement of `sort_by`: either a bare field name or a full
/// primary/secondary criteria pair.
#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    Field(String),
    Advanced {
        primary: SortKey,
        secondary: Option<SortKey>,
    },
}

/// Everything the user selected for one query cycle. Owned by the calling
/// UI layer; the query builder only borrows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub release_status: ReleaseStatus,
    pub platform: Platform,
    /// String-encoded minimum positive-review percentage; `"0"` or anything
    /// that fails to parse as a non-negative integer means no threshold.
    pub rating: String,
    pub cross_platform: bool,
    pub hidden_gems: bool,
    pub selected_tags: Vec<String>,
    pub tag_logic: TagLogic,
    pub selected_channels: Vec<String>,
    pub sort_by: String,
    pub sort_spec: Option<SortSpec>,
    pub currency: Currency,
    pub time_filter: TimeFilter,
    pub price_filter: PriceFilter,
    pub search_query: String,
    pub search_in_video_titles: bool,
}

impl FilterSpec {
    /// The rating threshold as an integer, if one is active.
    pub fn rating_threshold(&self) -> Option<i64> {
        match self.rating.trim().parse::<i64>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}
