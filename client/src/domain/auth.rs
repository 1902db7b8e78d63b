//! Login and signup inputs plus the login response.
//!
//! Both forms are validated before any request leaves the client so that
//! empty or mismatched input never reaches the backend.

use std::fmt;

use serde::Deserialize;
use zeroize::Zeroizing;

use super::session::{SessionIdentity, SessionIdentityError};

/// Domain error returned when login input is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use loanflow_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "pw").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validation failures for the signup form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    /// Username or password left blank.
    #[error("Username and password are required.")]
    MissingFields,
    /// Password and confirmation differ.
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// A validated signup request.
///
/// The username is trimmed; the password must match its confirmation
/// exactly.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupRequest {
    credentials: LoginCredentials,
}

impl SignupRequest {
    /// Validate the signup form fields.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Self, SignupValidationError> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|_| SignupValidationError::MissingFields)?;
        if password != confirm {
            return Err(SignupValidationError::PasswordMismatch);
        }
        Ok(Self { credentials })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username())
            .finish_non_exhaustive()
    }
}

/// Successful login payload returned by the backend.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for later requests.
    pub token: String,
    /// Username the backend resolved.
    pub username: String,
    /// Role string, possibly `ROLE_`-prefixed.
    pub role: String,
}

impl LoginResponse {
    /// Convert into the session triple, rejecting blank tokens.
    pub fn into_identity(self) -> Result<SessionIdentity, SessionIdentityError> {
        SessionIdentity::try_new(self.token, self.role, self.username)
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_keep_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("  ada  ", " pw ").expect("valid");
        assert_eq!(creds.username(), "ada");
        assert_eq!(creds.password(), " pw ");
        assert!(!format!("{creds:?}").contains("pw "));
    }

    #[rstest]
    #[case("", "pw", "pw", SignupValidationError::MissingFields)]
    #[case("ada", "", "", SignupValidationError::MissingFields)]
    #[case("ada", "pw", "pW", SignupValidationError::PasswordMismatch)]
    fn invalid_signup(
        #[case] username: &str,
        #[case] password: &str,
        #[case] confirm: &str,
        #[case] expected: SignupValidationError,
    ) {
        let err = SignupRequest::try_from_parts(username, password, confirm)
            .expect_err("invalid signup must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn signup_messages_match_form_copy() {
        assert_eq!(
            SignupValidationError::MissingFields.to_string(),
            "Username and password are required."
        );
        assert_eq!(
            SignupValidationError::PasswordMismatch.to_string(),
            "Passwords do not match."
        );
    }

    #[test]
    fn login_response_decodes_and_converts() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"jwt","username":"ada","role":"ROLE_ANALYST","extra":1}"#,
        )
        .expect("login response");
        let identity = response.into_identity().expect("identity");
        assert_eq!(identity.token(), "jwt");
        assert_eq!(identity.role(), "ROLE_ANALYST");
    }

    #[test]
    fn login_response_without_token_is_rejected() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"","username":"ada","role":"ADMIN"}"#)
                .expect("login response");
        assert_eq!(
            response.into_identity().expect_err("blank token"),
            SessionIdentityError::EmptyToken
        );
    }
}
