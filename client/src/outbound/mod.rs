//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest-backed gateway for the auth, loan and admin APIs
//! - **session_store**: file and in-memory session persistence
//!
//! Adapters translate between domain types and wire or disk formats. They
//! contain no business logic.

pub mod http;
pub mod session_store;
