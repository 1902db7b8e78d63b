//! User roles and their dashboard routes.
//!
//! Role strings reach the client from the login response and from whatever
//! the session store holds, so they may carry a `ROLE_` prefix or arbitrary
//! casing. [`normalize_role`] is the single place that cleans them up.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Literal prefix some backends put in front of role names.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Home route for administrators.
pub const ADMIN_HOME: &str = "/admin";
/// Home route for analysts.
pub const ANALYST_HOME: &str = "/analyst";
/// Home route for customers and for any unrecognised role.
pub const CUSTOMER_HOME: &str = "/customer";

/// Role granted to a LoanFlow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Applies for loans and tracks their status.
    Customer,
    /// Reviews the loan queue and approves or rejects applications.
    Analyst,
    /// Manages users and sees system metrics.
    Admin,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::Analyst, Self::Admin];

    /// Canonical upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Analyst => "ANALYST",
            Self::Admin => "ADMIN",
        }
    }

    /// Dashboard route this role lands on.
    pub const fn home_route(self) -> &'static str {
        match self {
            Self::Customer => CUSTOMER_HOME,
            Self::Analyst => ANALYST_HOME,
            Self::Admin => ADMIN_HOME,
        }
    }

    /// Parse a raw role string, tolerating case, whitespace and the
    /// `ROLE_` prefix.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::Role;
    ///
    /// assert_eq!(Role::parse(" role_admin "), Some(Role::Admin));
    /// assert_eq!(Role::parse("GUEST"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_role(raw).as_str() {
            "CUSTOMER" => Some(Self::Customer),
            "ANALYST" => Some(Self::Analyst),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{value}': expected CUSTOMER, ANALYST or ADMIN")]
pub struct UnknownRoleError {
    value: String,
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownRoleError {
            value: s.to_owned(),
        })
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_owned()
    }
}

/// Trim, upper-case, and strip a leading `ROLE_` from a stored role string.
///
/// Unknown roles survive normalisation unchanged apart from case, so callers
/// can still route them (they land on the customer dashboard).
///
/// # Examples
/// ```
/// use loanflow_client::domain::normalize_role;
///
/// assert_eq!(normalize_role("ROLE_ANALYST"), "ANALYST");
/// assert_eq!(normalize_role("  admin "), "ADMIN");
/// assert_eq!(normalize_role(""), "");
/// ```
pub fn normalize_role(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.strip_prefix(ROLE_PREFIX) {
        Some(rest) => rest.to_owned(),
        None => upper,
    }
}

/// Dashboard route for an already normalised role string.
///
/// ADMIN goes to `/admin`, ANALYST to `/analyst`, anything else to
/// `/customer`.
pub fn home_route_for(normalized_role: &str) -> &'static str {
    match normalized_role {
        "ADMIN" => ADMIN_HOME,
        "ANALYST" => ANALYST_HOME,
        _ => CUSTOMER_HOME,
    }
}
