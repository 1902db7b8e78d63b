//! Port for the backend's loan endpoints.

use async_trait::async_trait;

use crate::domain::{LoanApplicationInput, LoanId, LoanQuery, LoanRecord};

use super::GatewayError;

/// Loan submission, listing and review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanApi: Send + Sync {
    /// Submit a validated application and return the stored record.
    async fn apply(&self, input: &LoanApplicationInput) -> Result<LoanRecord, GatewayError>;

    /// List loans visible to the current session.
    ///
    /// Adapters accept both page envelopes and bare arrays and return the
    /// items in backend order.
    async fn list(&self, query: &LoanQuery) -> Result<Vec<LoanRecord>, GatewayError>;

    /// Approve a submitted loan.
    async fn approve(&self, id: LoanId) -> Result<LoanRecord, GatewayError>;

    /// Reject a submitted loan.
    async fn reject(&self, id: LoanId) -> Result<LoanRecord, GatewayError>;
}
