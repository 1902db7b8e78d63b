//! Domain primitives, rules, ports and services.
//!
//! Purpose: hold everything the LoanFlow client decides on its own (form
//! validation, the eligibility preview, route guards, busy flags) and the
//! ports through which it reaches the backend and the session store. Nothing
//! here performs I/O directly.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload returned by services.
//! - LoanApplicationForm / LoanApplicationInput: raw and validated form.
//! - evaluate / score / EligibilityAnalysis: the instant analysis.
//! - authorize / RouteTable / AccessOutcome: route guards.
//! - SessionContext / SessionIdentity / StoredSession: the session triple.
//! - LoanFlow: the workflow service.

pub mod access;
pub mod admin;
pub mod auth;
pub mod busy;
pub mod eligibility;
pub mod error;
pub mod loan;
pub mod loan_application;
pub mod loan_flow;
pub mod ports;
pub mod role;
pub mod session;

pub use self::access::{
    AccessOutcome, LANDING_ROUTE, LOGIN_ROUTE, RouteGuard, RouteTable, authorize,
    dashboard_redirect, guard, require_session,
};
pub use self::admin::{AdminMetrics, AdminUser, UserId};
pub use self::auth::{
    LoginCredentials, LoginResponse, LoginValidationError, SignupRequest, SignupValidationError,
};
pub use self::busy::{InFlight, InFlightGuard};
pub use self::eligibility::{Decision, EligibilityAnalysis, MAX_RISK, evaluate, score};
pub use self::error::{Error, ErrorCode};
pub use self::loan::{
    LoanId, LoanQuery, LoanRecord, LoanStatus, LoanSummary, RECENT_LOANS_LIMIT, ReviewAction,
    StatusFilter, UnknownStatusError,
};
pub use self::loan_application::{
    EmploymentType, FormValidationError, LoanApplicationForm, LoanApplicationInput, LoanPurpose,
    MAX_CREDIT_SCORE, MIN_CREDIT_SCORE, UnknownOptionError,
};
pub use self::loan_flow::{LoanFlow, LoginOutcome};
pub use self::role::{Role, UnknownRoleError, home_route_for, normalize_role};
pub use self::session::{SessionContext, SessionIdentity, SessionIdentityError, StoredSession};

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use loanflow_client::domain::{Error, ServiceResult};
///
/// fn refuse() -> ServiceResult<()> {
///     Err(Error::forbidden("admins only"))
/// }
/// assert!(refuse().is_err());
/// ```
pub type ServiceResult<T> = Result<T, Error>;
