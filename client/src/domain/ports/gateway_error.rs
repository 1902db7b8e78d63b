//! Failures shared by every backend port and the messages users see.

use std::fmt;

use crate::domain::LoanId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by backend gateway adapters.
    pub enum GatewayError {
        /// The backend answered with a non-success status.
        ///
        /// `message` holds the backend's own message, or is empty when the
        /// response carried none.
        Rejected { status: u16, message: String } =>
            "backend rejected the request with status {status}: {message}",
        /// The backend answered with a non-success status and a plain-text
        /// (non-JSON) body.
        RejectedText { status: u16, text: String } =>
            "backend rejected the request with status {status}: {text}",
        /// The backend refused the credentials or token (HTTP 401).
        Unauthorized { message: String } => "backend refused authentication: {message}",
        /// The request could not be sent or the connection failed.
        Transport { message: String } => "backend transport failed: {message}",
        /// The backend did not answer in time.
        Timeout { message: String } => "backend request timed out: {message}",
        /// The response body had an unexpected shape.
        Decode { message: String } => "backend response could not be decoded: {message}",
        /// The session store could not supply a token.
        Session { message: String } => "session unavailable: {message}",
    }
}

impl GatewayError {
    /// The backend-supplied message, when the backend produced one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Unauthorized { message } => {
                let trimmed = message.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            Self::RejectedText { .. }
            | Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. }
            | Self::Session { .. } => None,
        }
    }

    /// Plain-text body of a rejection. Only signup shows it to the user.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Self::RejectedText { text, .. } => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Message to show the user: the backend's JSON message verbatim when
    /// one exists, otherwise `fallback`. Plain-text bodies are not used.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::ports::GatewayError;
    ///
    /// let err = GatewayError::rejected(409_u16, "Username already exists");
    /// assert_eq!(err.user_message("Signup failed."), "Username already exists");
    /// assert_eq!(GatewayError::timeout("30s").user_message("Signup failed."), "Signup failed.");
    /// ```
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_owned()
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::RejectedText { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. }
            | Self::Session { .. } => None,
        }
    }
}

/// User-initiated operations that can fail against the backend.
///
/// Each action owns the fallback message shown when the backend gives no
/// message of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Logging in.
    Login,
    /// Creating an account.
    Signup,
    /// Submitting a loan application.
    SubmitLoan,
    /// Loading the application status list or history.
    LoadApplications,
    /// Loading the analyst review queue.
    LoadQueue,
    /// Approving a loan.
    Approve(LoanId),
    /// Rejecting a loan.
    Reject(LoanId),
    /// Loading admin metrics.
    LoadMetrics,
    /// Loading the user list.
    LoadUsers,
    /// Changing a user's role or active flag.
    UpdateUser,
}

impl Action {
    /// Fallback message for this action.
    pub fn fallback_message(self) -> String {
        match self {
            Self::Login => "Login failed. Check username/password.".to_owned(),
            Self::Signup => "Signup failed. Try another username.".to_owned(),
            Self::SubmitLoan => "Failed to submit loan".to_owned(),
            Self::LoadApplications => "Failed to load applications".to_owned(),
            Self::LoadQueue => "Failed to load loan queue.".to_owned(),
            Self::Approve(id) => format!("Failed to approve Loan #{id}"),
            Self::Reject(id) => format!("Failed to reject Loan #{id}"),
            Self::LoadMetrics => "Failed to load admin metrics".to_owned(),
            Self::LoadUsers => "Failed to load users".to_owned(),
            Self::UpdateUser => "Failed to update user".to_owned(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::SubmitLoan => "submit_loan",
            Self::LoadApplications => "load_applications",
            Self::LoadQueue => "load_queue",
            Self::Approve(_) => "approve",
            Self::Reject(_) => "reject",
            Self::LoadMetrics => "load_metrics",
            Self::LoadUsers => "load_users",
            Self::UpdateUser => "update_user",
        };
        f.write_str(name)
    }
}
