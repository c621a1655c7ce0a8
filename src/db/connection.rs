// src/db/connection.rs

use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;

use crate::errors::CatalogError;

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = RefCell::new(None);
}

/// Handle to the snapshot database. Cheap to clone; the actual connection is
/// opened lazily, once per thread.
#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Open or fetch the per-thread SQLite connection and run `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&mut Connection) -> Result<T, CatalogError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| CatalogError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| CatalogError::Internal)?;
        inner_result
    }
}

/// Initialize a database from a SQL schema file.
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), CatalogError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| CatalogError::DbError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| CatalogError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
