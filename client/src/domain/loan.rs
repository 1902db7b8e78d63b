//! Loan records as the backend reports them and the queries used to list
//! them.

use std::fmt;
use std::str::FromStr;

use pagination::{PageRequest, PageRequestError, SortDirection};
use serde::{Deserialize, Serialize};

use super::ports::Action;

/// Backend identifier of a loan application.
pub type LoanId = i64;

/// Number of rows the recent-loans view shows.
pub const RECENT_LOANS_LIMIT: usize = 5;

/// Field every preset list view sorts on.
const CREATED_AT: &str = "createdAt";

/// Review state of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// Waiting for an analyst.
    Submitted,
    /// Approved by an analyst.
    Approved,
    /// Rejected by an analyst.
    Rejected,
}

impl LoanStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Submitted, Self::Approved, Self::Rejected];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Label shown to users.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known status filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}': expected ALL, SUBMITTED, APPROVED or REJECTED")]
pub struct UnknownStatusError(String);

impl FromStr for LoanStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| UnknownStatusError(s.to_owned()))
    }
}

/// A loan application as returned by the backend.
///
/// Only `id` is guaranteed; every other field may be missing depending on
/// which endpoint produced the record. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    /// Backend identifier.
    pub id: LoanId,
    /// Applicant's full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Requested amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Tenure in months.
    #[serde(default)]
    pub tenure: Option<u32>,
    /// Annual interest rate assigned by the backend.
    #[serde(default)]
    pub interest_rate: Option<f64>,
    /// Backend risk score.
    #[serde(default)]
    pub risk_score: Option<i64>,
    /// Backend eligibility decision string.
    #[serde(default)]
    pub eligibility_decision: Option<String>,
    /// Review state.
    #[serde(default)]
    pub status: Option<LoanStatus>,
    /// Creation timestamp as sent.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Owner's username.
    #[serde(default)]
    pub username: Option<String>,
    /// Applicant's username, when the backend reports it separately.
    #[serde(default)]
    pub applicant_username: Option<String>,
}

impl LoanRecord {
    /// Whether an analyst may still approve or reject this loan.
    pub fn is_reviewable(&self) -> bool {
        self.status == Some(LoanStatus::Submitted)
    }

    /// Status label, or `-` when the status is unknown.
    pub fn status_label(&self) -> &'static str {
        self.status.map_or("-", LoanStatus::label)
    }

    /// Best available applicant name for display.
    pub fn applicant(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .or(self.applicant_username.as_deref())
            .or(self.username.as_deref())
    }
}

/// Loan counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    /// Every record counted.
    pub total: usize,
    /// Records still pending.
    pub submitted: usize,
    /// Approved records.
    pub approved: usize,
    /// Rejected records.
    pub rejected: usize,
}

impl LoanSummary {
    /// Count `loans` by status. Records without a status only count towards
    /// the total.
    pub fn from_records(loans: &[LoanRecord]) -> Self {
        loans.iter().fold(
            Self {
                total: loans.len(),
                ..Self::default()
            },
            |mut summary, loan| {
                match loan.status {
                    Some(LoanStatus::Submitted) => summary.submitted += 1,
                    Some(LoanStatus::Approved) => summary.approved += 1,
                    Some(LoanStatus::Rejected) => summary.rejected += 1,
                    None => {}
                }
                summary
            },
        )
    }
}

/// Status restriction applied to a loan listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every status.
    #[default]
    All,
    /// A single status.
    Only(LoanStatus),
}

impl StatusFilter {
    /// Status to send, if any.
    pub const fn status(self) -> Option<LoanStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Parameters for listing loans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanQuery {
    page: PageRequest,
    filter: StatusFilter,
}

impl LoanQuery {
    /// Build a query from a page request and filter.
    pub fn new(page: PageRequest, filter: StatusFilter) -> Self {
        Self { page, filter }
    }

    /// Newest first, 50 per page: the application status view.
    pub fn application_status(filter: StatusFilter) -> Result<Self, PageRequestError> {
        Self::newest_first(50, filter)
    }

    /// Newest first, 25 per page: the analyst review queue.
    pub fn analyst_queue(filter: StatusFilter) -> Result<Self, PageRequestError> {
        Self::newest_first(25, filter)
    }

    /// Newest first, 200 per page, unfiltered: a customer's history.
    pub fn customer_history() -> Result<Self, PageRequestError> {
        Self::newest_first(200, StatusFilter::All)
    }

    fn newest_first(size: u32, filter: StatusFilter) -> Result<Self, PageRequestError> {
        let page = PageRequest::new(0, size)?.sorted_by(CREATED_AT, SortDirection::Desc)?;
        Ok(Self::new(page, filter))
    }

    /// Page parameters.
    pub fn page(&self) -> &PageRequest {
        &self.page
    }

    /// Status restriction.
    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Query string pairs: paging and sorting first, then `status` when
    /// filtered.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.query_pairs();
        if let Some(status) = self.filter.status() {
            pairs.push(("status", status.as_str().to_owned()));
        }
        pairs
    }
}

/// Analyst decision on a submitted loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Approve the loan.
    Approve,
    /// Reject the loan.
    Reject,
}

impl ReviewAction {
    /// Path segment of the review endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Failure context for `id`.
    pub const fn action(self, id: LoanId) -> Action {
        match self {
            Self::Approve => Action::Approve(id),
            Self::Reject => Action::Reject(id),
        }
    }

    /// Confirmation shown after the backend accepts the decision.
    pub fn success_message(self, id: LoanId) -> String {
        match self {
            Self::Approve => format!("Loan #{id} approved."),
            Self::Reject => format!("Loan #{id} rejected."),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn record(id: LoanId, status: Option<LoanStatus>) -> LoanRecord {
        LoanRecord {
            id,
            full_name: None,
            amount: None,
            tenure: None,
            interest_rate: None,
            risk_score: None,
            eligibility_decision: None,
            status,
            created_at: None,
            username: None,
            applicant_username: None,
        }
    }

    #[test]
    fn decodes_sparse_records() {
        let loan: LoanRecord = serde_json::from_str(
            r#"{"id":7,"amount":12000.0,"status":"APPROVED","user":{"id":1},"dti":0.2}"#,
        )
        .expect("record decodes");
        assert_eq!(loan.id, 7);
        assert_eq!(loan.status, Some(LoanStatus::Approved));
        assert_eq!(loan.status_label(), "Approved");
        assert_eq!(loan.tenure, None);
    }

    #[rstest]
    #[case(LoanStatus::Submitted, "Pending")]
    #[case(LoanStatus::Approved, "Approved")]
    #[case(LoanStatus::Rejected, "Rejected")]
    fn statuses_have_labels(#[case] status: LoanStatus, #[case] label: &str) {
        assert_eq!(status.label(), label);
    }

    #[test]
    fn summary_counts_each_status() {
        let loans = [
            record(1, Some(LoanStatus::Submitted)),
            record(2, Some(LoanStatus::Submitted)),
            record(3, Some(LoanStatus::Approved)),
            record(4, Some(LoanStatus::Rejected)),
            record(5, None),
        ];
        assert_eq!(
            LoanSummary::from_records(&loans),
            LoanSummary {
                total: 5,
                submitted: 2,
                approved: 1,
                rejected: 1,
            }
        );
    }

    #[rstest]
    #[case("all", StatusFilter::All)]
    #[case(" submitted ", StatusFilter::Only(LoanStatus::Submitted))]
    #[case("REJECTED", StatusFilter::Only(LoanStatus::Rejected))]
    fn parses_status_filters(#[case] raw: &str, #[case] expected: StatusFilter) {
        assert_eq!(raw.parse::<StatusFilter>().expect("known filter"), expected);
    }

    #[test]
    fn analyst_queue_renders_filtered_query() {
        let query = LoanQuery::analyst_queue(StatusFilter::Only(LoanStatus::Submitted))
            .expect("preset is valid");
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "0".to_owned()),
                ("size", "25".to_owned()),
                ("sortBy", "createdAt".to_owned()),
                ("direction", "desc".to_owned()),
                ("status", "SUBMITTED".to_owned()),
            ]
        );
    }

    #[rstest]
    #[case(LoanQuery::application_status(StatusFilter::All), 50)]
    #[case(LoanQuery::customer_history(), 200)]
    fn presets_use_view_page_sizes(
        #[case] query: Result<LoanQuery, PageRequestError>,
        #[case] size: u32,
    ) {
        let query = query.expect("preset is valid");
        assert_eq!(query.page().size(), size);
        assert_eq!(query.filter(), StatusFilter::All);
        assert!(query.query_pairs().iter().all(|(key, _)| *key != "status"));
    }

    #[test]
    fn only_submitted_loans_are_reviewable() {
        assert!(record(1, Some(LoanStatus::Submitted)).is_reviewable());
        assert!(!record(1, Some(LoanStatus::Approved)).is_reviewable());
        assert!(!record(1, None).is_reviewable());
    }

    #[test]
    fn review_actions_name_their_endpoint_and_fallback() {
        assert_eq!(ReviewAction::Approve.as_str(), "approve");
        assert_eq!(
            ReviewAction::Reject.action(9).fallback_message(),
            "Failed to reject Loan #9"
        );
    }
}
