//! Back-office library modules.

pub mod domain;
pub mod outbound;
pub mod settings;

/// Per-request correlation id re-exported for adapters.
pub use domain::TraceId;
