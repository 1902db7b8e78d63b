//! Port for the backend's authentication endpoints.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, LoginResponse, SignupRequest};

use super::GatewayError;

/// Registration and login against the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create a customer account.
    async fn register(&self, request: &SignupRequest) -> Result<(), GatewayError>;

    /// Exchange credentials for a token, username and role.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, GatewayError>;
}
