//! Application state container shared across Axum route handlers and services.
//!
//! It is cloned into every handler through Axum's `State<T>` extractor.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// Holds a cloned, thread-safe database connection for use with SeaORM and the
/// page size used by resource searches.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    page_size: usize,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and page size.
    pub fn new(db: DatabaseConnection, page_size: usize) -> Self {
        Self { db, page_size }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Number of resources returned per search page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
