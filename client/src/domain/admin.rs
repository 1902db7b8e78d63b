//! Administration read models.

use serde::{Deserialize, Serialize};

use super::Role;

/// Backend identifier of a user account.
pub type UserId = i64;

/// User counts per role and the total loan count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMetrics {
    /// Customer accounts.
    #[serde(default)]
    pub customers: u64,
    /// Analyst accounts.
    #[serde(default)]
    pub analysts: u64,
    /// Admin accounts.
    #[serde(default)]
    pub admins: u64,
    /// Loan applications of every status.
    #[serde(default)]
    pub loans: u64,
}

impl AdminMetrics {
    /// Users across every role.
    pub fn total_users(&self) -> u64 {
        self.customers
            .saturating_add(self.analysts)
            .saturating_add(self.admins)
    }

    /// Share of all users that `count` represents, in percent; zero when
    /// there are no users.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::AdminMetrics;
    ///
    /// let metrics = AdminMetrics { customers: 3, analysts: 1, admins: 0, loans: 9 };
    /// assert_eq!(metrics.share_percent(metrics.customers), 75.0);
    /// assert_eq!(AdminMetrics::default().share_percent(0), 0.0);
    /// ```
    pub fn share_percent(&self, count: u64) -> f64 {
        let total = self.total_users();
        if total == 0 {
            return 0.0;
        }
        // counts stay far below 2^53
        count as f64 / total as f64 * 100.0
    }

    /// Count for a single role.
    pub fn users_with(&self, role: Role) -> u64 {
        match role {
            Role::Customer => self.customers,
            Role::Analyst => self.analysts,
            Role::Admin => self.admins,
        }
    }
}

/// A user account as listed for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Backend identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Assigned role.
    pub role: Role,
    /// Whether the account may log in.
    pub active: bool,
}
