//! Port for the backend's administration endpoints.

use async_trait::async_trait;

use crate::domain::{AdminMetrics, AdminUser, Role, UserId};

use super::GatewayError;

/// Metrics and user management for administrators.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// User counts per role and the total loan count.
    async fn metrics(&self) -> Result<AdminMetrics, GatewayError>;

    /// Every user, or only those holding `role`.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<AdminUser>, GatewayError>;

    /// Change a user's role.
    async fn update_role(&self, id: UserId, role: Role) -> Result<AdminUser, GatewayError>;

    /// Enable or disable a user's account.
    async fn update_active(&self, id: UserId, active: bool) -> Result<AdminUser, GatewayError>;
}
