pub mod builder;
pub mod search;
pub mod sort;
pub mod time_window;

pub use builder::{BuiltQuery, Projection, QueryBuilder};
pub use search::{BasicSearchResolver, SearchFragment, SearchFragmentResolver};
pub use sort::SortStrategy;
pub use time_window::{SmartTimePreset, TimeWindowResolver};

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;

/// A single bound query parameter. Everything user-supplied is bound, never
/// interpolated into the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Real(f64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlParam::Int(n) => ToSqlOutput::Owned(Value::Integer(*n)),
            SqlParam::Real(x) => ToSqlOutput::Owned(Value::Real(*x)),
        })
    }
}

/// An aggregate sub-join a time preset needs spliced into the base query.
/// Joins are registered by name so combining a preset with any other filter
/// never duplicates the join.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub name: &'static str,
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Accumulator for one query: a fixed projection template, a named join
/// slot, AND-composed predicates, and an optional ordering. Parameters are
/// kept alongside the fragment that owns them and emitted in the exact order
/// their placeholders appear in the rendered text (join placeholders render
/// before the WHERE clause, so join parameters come first).
#[derive(Debug)]
pub(crate) struct QueryParts {
    select: &'static str,
    joins: Vec<JoinSpec>,
    predicates: Vec<String>,
    predicate_params: Vec<SqlParam>,
    search_fragment: Option<SearchFragment>,
    order_by: Option<String>,
}

impl QueryParts {
    pub fn new(select: &'static str) -> Self {
        Self {
            select,
            joins: Vec::new(),
            predicates: Vec::new(),
            predicate_params: Vec::new(),
            search_fragment: None,
            order_by: None,
        }
    }

    /// Append an AND-composed predicate with its bound parameters.
    pub fn push_predicate(&mut self, clause: impl Into<String>, params: Vec<SqlParam>) {
        self.predicates.push(clause.into());
        self.predicate_params.extend(params);
    }

    /// Register a join by name; a second registration under the same name is
    /// ignored so stacked filters cannot malform the FROM clause.
    pub fn add_join(&mut self, join: JoinSpec) {
        if self.joins.iter().any(|j| j.name == join.name) {
            return;
        }
        self.joins.push(join);
    }

    /// Splice a pre-built search fragment; it must lead with a connective
    /// (e.g. `" AND"`) and is appended verbatim after the predicates.
    pub fn set_search_fragment(&mut self, fragment: SearchFragment) {
        self.search_fragment = Some(fragment);
    }

    pub fn set_order_by(&mut self, order: String) {
        self.order_by = Some(order);
    }

    /// Render the final text and the parameter list in placeholder order.
    pub fn render(self) -> BuiltQuery {
        let mut text = String::from(self.select);
        let mut parameters = Vec::new();

        for join in &self.joins {
            text.push(' ');
            text.push_str(&join.sql);
        }
        for join in self.joins {
            parameters.extend(join.params);
        }

        // Tautological anchor so every predicate appends with a plain AND.
        text.push_str(" WHERE 1=1");
        for predicate in &self.predicates {
            text.push_str(" AND ");
            text.push_str(predicate);
        }
        parameters.extend(self.predicate_params);

        if let Some(fragment) = self.search_fragment {
            text.push_str(&fragment.clause);
            parameters.extend(fragment.params);
        }

        if let Some(order) = self.order_by {
            text.push_str(" ORDER BY ");
            text.push_str(&order);
        }

        BuiltQuery {
            query_text: text,
            parameters,
        }
    }
}
