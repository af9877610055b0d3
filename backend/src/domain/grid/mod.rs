//! Filtered, sorted, paginated listing grids.
//!
//! A request's raw [`FilterParams`] become an immutable [`FilterSpec`]
//! (through [`FilterSpecResolver`] when last-used filters are persisted).
//! A per-resource [`GridDefinition`] normalises the spec into a
//! [`GridQuery`], and the [`GridQueryEngine`] runs it against a
//! [`ResourceRepository`](crate::domain::ports::ResourceRepository) to
//! produce a [`GridPage`].

mod definition;
mod engine;
mod filter_spec;
mod resolver;

pub use definition::{ColumnDefinition, ColumnFilter, GridDefinition, GridQuery};
pub use engine::{GridPage, GridQueryEngine, ListingError};
pub use filter_spec::{
    DEFAULT_PAGE_SIZE, FilterParams, FilterSpec, GridDefaults, MAX_PAGE_SIZE, SortDirection,
    SortOrder,
};
pub use resolver::FilterSpecResolver;
