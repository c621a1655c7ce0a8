// src/query/search.rs

use super::SqlParam;

/// A pre-built search predicate. The clause must lead with a connective
/// (`" AND ..."`) because the query builder splices it verbatim after the
/// composed predicates.
#[derive(Debug)]
pub struct SearchFragment {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

/// Seam for the free-text search collaborator. Tokenization/ranking lives
/// outside this crate; the builder only consumes the finished fragment.
pub trait SearchFragmentResolver {
    /// `None` means no search predicate (e.g. blank query).
    fn resolve(&self, query: &str, in_video_titles: bool) -> Option<SearchFragment>;
}

/// Default resolver: substring match on name and developers, optionally
/// extended to video titles through an EXISTS sub-query.
#[derive(Debug, Default)]
pub struct BasicSearchResolver;

impl SearchFragmentResolver for BasicSearchResolver {
    fn resolve(&self, query: &str, in_video_titles: bool) -> Option<SearchFragment> {
        let term = query.trim();
        if term.is_empty() {
            return None;
        }
        let pattern = format!("%{term}%");

        if in_video_titles {
            Some(SearchFragment {
                clause: " AND (g.name LIKE ? OR g.developers LIKE ? \
                         OR EXISTS (SELECT 1 FROM game_videos v \
                         WHERE v.game_id = g.id AND v.video_title LIKE ?))"
                    .into(),
                params: vec![
                    SqlParam::Text(pattern.clone()),
                    SqlParam::Text(pattern.clone()),
                    SqlParam::Text(pattern),
                ],
            })
        } else {
            Some(SearchFragment {
                clause: " AND (g.name LIKE ? OR g.developers LIKE ?)".into(),
                params: vec![SqlParam::Text(pattern.clone()), SqlParam::Text(pattern)],
            })
        }
    }
}
