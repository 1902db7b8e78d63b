//! LoanFlow workflow service.
//!
//! Orchestrates the backend ports and the injected session context for the
//! user-facing flows: signup, login and logout, loan submission, analyst
//! review and administration. Gateway failures are turned into domain
//! [`Error`]s whose message is the one the user should see.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::access::dashboard_redirect;
use crate::domain::ports::{Action, AdminApi, AuthApi, GatewayError, LoanApi};
use crate::domain::{
    AdminMetrics, AdminUser, Error, InFlight, LoanApplicationForm, LoanId, LoanQuery, LoanRecord,
    LoanSummary, LoginCredentials, ReviewAction, Role, SessionContext, SignupRequest, StatusFilter,
    UserId, normalize_role,
};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Username the backend resolved.
    pub username: String,
    /// Normalised role.
    pub role: String,
    /// Dashboard the user lands on.
    pub landing: &'static str,
}

/// Workflow service over the auth, loan and admin ports.
pub struct LoanFlow<A, L, M> {
    auth: Arc<A>,
    loans: Arc<L>,
    admin: Arc<M>,
    session: SessionContext,
    submitting: InFlight<()>,
    reviewing: InFlight<LoanId>,
}

impl<A, L, M> Clone for LoanFlow<A, L, M> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            loans: Arc::clone(&self.loans),
            admin: Arc::clone(&self.admin),
            session: self.session.clone(),
            submitting: self.submitting.clone(),
            reviewing: self.reviewing.clone(),
        }
    }
}

impl<A, L, M> LoanFlow<A, L, M> {
    /// Create a service over the given ports and session.
    pub fn new(auth: Arc<A>, loans: Arc<L>, admin: Arc<M>, session: SessionContext) -> Self {
        Self {
            auth,
            loans,
            admin,
            session,
            submitting: InFlight::new(),
            reviewing: InFlight::new(),
        }
    }

    /// The session this service reads and writes.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Whether a loan submission is running.
    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy(&())
    }

    /// Whether a review of `id` is running.
    pub fn is_reviewing(&self, id: LoanId) -> bool {
        self.reviewing.is_busy(&id)
    }
}

impl<A, L, M> LoanFlow<A, L, M>
where
    A: AuthApi,
    L: LoanApi,
    M: AdminApi,
{
    fn map_gateway_error(error: GatewayError, action: Action) -> Error {
        let message = match (action, error.plain_text()) {
            (Action::Signup, Some(text)) => text.to_owned(),
            _ => error.user_message(&action.fallback_message()),
        };
        warn!(%action, error = %error, "backend call failed");
        match error {
            GatewayError::Rejected { status, .. } | GatewayError::RejectedText { status, .. } => {
                match status {
                    401 => Error::unauthorized(message),
                    403 => Error::forbidden(message),
                    404 => Error::not_found(message),
                    409 => Error::conflict(message),
                    500..=599 => Error::service_unavailable(message),
                    _ => Error::invalid_request(message),
                }
            }
            GatewayError::Unauthorized { .. } => Error::unauthorized(message),
            GatewayError::Transport { .. } | GatewayError::Timeout { .. } => {
                Error::service_unavailable(message)
            }
            GatewayError::Decode { .. } | GatewayError::Session { .. } => Error::internal(message),
        }
    }

    /// Create an account. Does not log in.
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<(), Error> {
        self.auth
            .register(request)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::Signup))?;
        info!(username = request.username(), "account created");
        Ok(())
    }

    /// Log in, store the session triple and return the landing route.
    pub async fn log_in(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let response = self
            .auth
            .login(credentials)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::Login))?;
        let identity = response.into_identity().map_err(|err| {
            warn!(error = %err, "login response missing credentials");
            Error::unauthorized(Action::Login.fallback_message())
        })?;
        self.session.establish(&identity)?;

        let landing = dashboard_redirect(Some(identity.role()));
        info!(username = identity.username(), landing, "logged in");
        Ok(LoginOutcome {
            username: identity.username().to_owned(),
            role: normalize_role(identity.role()),
            landing,
        })
    }

    /// Clear the stored session.
    pub fn log_out(&self) -> Result<(), Error> {
        self.session.end()?;
        info!("logged out");
        Ok(())
    }

    /// Validate and submit a loan application.
    ///
    /// Validation failures never reach the backend. A second submission
    /// while one is running is refused with a conflict.
    pub async fn submit_application(&self, form: &LoanApplicationForm) -> Result<LoanRecord, Error> {
        let input = form
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let _busy = self
            .submitting
            .try_begin(())
            .ok_or_else(|| Error::conflict("A loan application is already being submitted."))?;

        let record = self
            .loans
            .apply(&input)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::SubmitLoan))?;
        info!(loan_id = record.id, "loan application submitted");
        Ok(record)
    }

    /// Run `query`, reporting failures as `action`.
    pub async fn list_loans(&self, query: &LoanQuery, action: Action) -> Result<Vec<LoanRecord>, Error> {
        let loans = self
            .loans
            .list(query)
            .await
            .map_err(|err| Self::map_gateway_error(err, action))?;
        debug!(count = loans.len(), "loans listed");
        Ok(loans)
    }

    /// The application status view.
    pub async fn application_status(&self, filter: StatusFilter) -> Result<Vec<LoanRecord>, Error> {
        let query = LoanQuery::application_status(filter).map_err(page_error)?;
        self.list_loans(&query, Action::LoadApplications).await
    }

    /// The analyst review queue.
    pub async fn analyst_queue(&self, filter: StatusFilter) -> Result<Vec<LoanRecord>, Error> {
        let query = LoanQuery::analyst_queue(filter).map_err(page_error)?;
        self.list_loans(&query, Action::LoadQueue).await
    }

    /// Every loan of the current customer, newest first.
    pub async fn customer_history(&self) -> Result<Vec<LoanRecord>, Error> {
        let query = LoanQuery::customer_history().map_err(page_error)?;
        self.list_loans(&query, Action::LoadApplications).await
    }

    /// Status counts over the customer's history.
    pub async fn loan_summary(&self) -> Result<LoanSummary, Error> {
        Ok(LoanSummary::from_records(&self.customer_history().await?))
    }

    /// Approve or reject a loan.
    ///
    /// Each loan id can only have one review in flight; other ids are
    /// unaffected.
    pub async fn review(&self, id: LoanId, decision: ReviewAction) -> Result<LoanRecord, Error> {
        let _busy = self
            .reviewing
            .try_begin(id)
            .ok_or_else(|| Error::conflict(format!("Loan #{id} is already being updated.")))?;

        let result = match decision {
            ReviewAction::Approve => self.loans.approve(id).await,
            ReviewAction::Reject => self.loans.reject(id).await,
        };
        let record = result.map_err(|err| Self::map_gateway_error(err, decision.action(id)))?;
        info!(loan_id = id, decision = decision.as_str(), "loan reviewed");
        Ok(record)
    }

    /// Admin dashboard metrics.
    pub async fn metrics(&self) -> Result<AdminMetrics, Error> {
        self.admin
            .metrics()
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::LoadMetrics))
    }

    /// Users, optionally restricted to one role.
    pub async fn users(&self, role: Option<Role>) -> Result<Vec<AdminUser>, Error> {
        self.admin
            .list_users(role)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::LoadUsers))
    }

    /// Change a user's role.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<AdminUser, Error> {
        let user = self
            .admin
            .update_role(id, role)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::UpdateUser))?;
        info!(user_id = id, role = %role, "user role updated");
        Ok(user)
    }

    /// Enable or disable a user's account.
    pub async fn set_active(&self, id: UserId, active: bool) -> Result<AdminUser, Error> {
        let user = self
            .admin
            .update_active(id, active)
            .await
            .map_err(|err| Self::map_gateway_error(err, Action::UpdateUser))?;
        info!(user_id = id, active, "user active flag updated");
        Ok(user)
    }
}

fn page_error(error: pagination::PageRequestError) -> Error {
    Error::internal(format!("invalid list preset: {error}"))
}

#[cfg(test)]
#[path = "loan_flow_tests.rs"]
mod tests;
