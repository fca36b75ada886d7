//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local POI store with cursor and unit-of-work support
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
