//! Driven port for listing-grid reads.
//!
//! The grid engine hands each adapter an already normalised
//! [`GridQuery`]; adapters only translate it into their storage's query
//! language and return rows in the requested order.

use async_trait::async_trait;

use crate::domain::grid::GridQuery;

use super::define_port_error;

define_port_error! {
    /// Errors raised by resource repository adapters.
    pub enum ResourceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "resource repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "resource repository query failed: {message}",
    }
}

/// Read access to one resource type for listing grids.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Row view returned to the listing.
    type Row: Clone + Send + Sync + 'static;

    /// Count rows matching the query's search and filters, ignoring
    /// `offset`, `limit` and `order`.
    async fn count_matching(&self, query: &GridQuery) -> Result<u64, ResourceRepositoryError>;

    /// Fetch at most `limit` matching rows after skipping `offset`, in
    /// `order`.
    async fn fetch_page(&self, query: &GridQuery)
    -> Result<Vec<Self::Row>, ResourceRepositoryError>;
}
