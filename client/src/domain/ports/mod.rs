//! Domain ports and supporting types for the hexagonal boundary.
//!
//! The LoanFlow backend is reached through three driven ports, one per API
//! area, and the session triple is persisted through [`SessionStore`].

mod macros;
pub(crate) use macros::define_port_error;

mod admin_api;
mod auth_api;
mod gateway_error;
mod loan_api;
mod session_store;

#[cfg(test)]
pub use admin_api::MockAdminApi;
pub use admin_api::AdminApi;
#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::AuthApi;
pub use gateway_error::{Action, GatewayError};
#[cfg(test)]
pub use loan_api::MockLoanApi;
pub use loan_api::LoanApi;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
