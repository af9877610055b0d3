//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local adapters for every port, used by the binary
//!   and by behaviour tests.
//!
//! Adapters translate between domain types and their storage; they hold
//! no business rules beyond what the port contract states.

pub mod memory;
