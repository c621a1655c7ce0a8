// src/db/store.rs
//
// Read-only executor for built queries. This is the only layer that can
// fail hard: the query core upstream is total, and consolidation downstream
// degrades per record.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::errors::CatalogError;
use crate::query::BuiltQuery;

use super::connection::Database;

/// Raw result of a full-projection query: column names plus untyped rows,
/// in store order.
#[derive(Debug, Default)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// One row of the price-only projection.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub price_eur: Option<f64>,
    pub price_usd: Option<f64>,
    pub is_free: bool,
}

/// Run a full-projection query and collect every row.
pub fn execute(db: &Database, query: &BuiltQuery) -> Result<QueryOutput, CatalogError> {
    db.with_conn(|conn| run_query(conn, query))
}

/// Run a count-projection query and read the scalar.
pub fn execute_count(db: &Database, query: &BuiltQuery) -> Result<i64, CatalogError> {
    db.with_conn(|conn| {
        conn.query_row(
            &query.query_text,
            params_from_iter(query.parameters.iter()),
            |row| row.get(0),
        )
        .map_err(|e| CatalogError::DbError(e.to_string()))
    })
}

/// Run a price-only-projection query.
pub fn execute_prices(db: &Database, query: &BuiltQuery) -> Result<Vec<PriceRow>, CatalogError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&query.query_text)
            .map_err(|e| CatalogError::DbError(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(query.parameters.iter()), |row| {
                Ok(PriceRow {
                    price_eur: row.get(0)?,
                    price_usd: row.get(1)?,
                    is_free: row.get::<_, i64>(2)? != 0,
                })
            })
            .map_err(|e| CatalogError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| CatalogError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}

fn run_query(conn: &mut Connection, query: &BuiltQuery) -> Result<QueryOutput, CatalogError> {
    let mut stmt = conn
        .prepare(&query.query_text)
        .map_err(|e| CatalogError::DbError(e.to_string()))?;

    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let width = columns.len();

    let mut rows = stmt
        .query(params_from_iter(query.parameters.iter()))
        .map_err(|e| CatalogError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    loop {
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => return Err(CatalogError::DbError(e.to_string())),
        };
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            let value = row
                .get::<_, Value>(i)
                .map_err(|e| CatalogError::DbError(e.to_string()))?;
            values.push(value);
        }
        out.push(values);
    }

    Ok(QueryOutput { columns, rows: out })
}
