//! LoanFlow client library: domain rules, backend gateway, session storage
//! and the command-line adapter.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
