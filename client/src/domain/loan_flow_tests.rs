//! Tests for the LoanFlow workflow service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockAdminApi, MockAuthApi, MockLoanApi, MockSessionStore, SessionStoreError,
};
use crate::domain::{ErrorCode, LoanStatus, LoginResponse, StoredSession};

type TestFlow = LoanFlow<MockAuthApi, MockLoanApi, MockAdminApi>;

struct Mocks {
    auth: MockAuthApi,
    loans: MockLoanApi,
    admin: MockAdminApi,
    store: MockSessionStore,
}

impl Mocks {
    fn new() -> Self {
        Self {
            auth: MockAuthApi::new(),
            loans: MockLoanApi::new(),
            admin: MockAdminApi::new(),
            store: MockSessionStore::new(),
        }
    }

    fn build(self) -> TestFlow {
        LoanFlow::new(
            Arc::new(self.auth),
            Arc::new(self.loans),
            Arc::new(self.admin),
            SessionContext::new(Arc::new(self.store)),
        )
    }
}

fn loan(id: LoanId, status: LoanStatus) -> LoanRecord {
    serde_json::from_value(serde_json::json!({ "id": id, "status": status }))
        .expect("loan record fixture")
}

fn filled_form() -> LoanApplicationForm {
    LoanApplicationForm {
        full_name: "Ada Lovelace".to_owned(),
        amount: "10000".to_owned(),
        tenure: "24".to_owned(),
        monthly_income: "8000".to_owned(),
        monthly_debt: "800".to_owned(),
        credit_score: "820".to_owned(),
        ..LoanApplicationForm::default()
    }
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("ada", "pw").expect("credentials")
}

#[rstest]
#[case("ROLE_ADMIN", "/admin", "ADMIN")]
#[case("ANALYST", "/analyst", "ANALYST")]
#[case("CUSTOMER", "/customer", "CUSTOMER")]
#[tokio::test]
async fn log_in_stores_session_and_lands_on_role_home(
    #[case] role: &'static str,
    #[case] landing: &str,
    #[case] normalised: &str,
) {
    let mut mocks = Mocks::new();
    mocks.auth.expect_login().times(1).returning(move |creds| {
        Ok(LoginResponse {
            token: "jwt".to_owned(),
            username: creds.username().to_owned(),
            role: role.to_owned(),
        })
    });
    mocks
        .store
        .expect_save()
        .withf(move |identity| {
            identity.token() == "jwt" && identity.role() == role && identity.username() == "ada"
        })
        .times(1)
        .returning(|_| Ok(()));

    let outcome = mocks.build().log_in(&credentials()).await.expect("login");
    assert_eq!(outcome.landing, landing);
    assert_eq!(outcome.role, normalised);
    assert_eq!(outcome.username, "ada");
}

#[tokio::test]
async fn failed_login_uses_backend_message_and_stores_nothing() {
    let mut mocks = Mocks::new();
    mocks
        .auth
        .expect_login()
        .times(1)
        .returning(|_| Err(GatewayError::unauthorized("Invalid credentials")));
    mocks.store.expect_save().times(0);

    let err = mocks.build().log_in(&credentials()).await.expect_err("login fails");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Invalid credentials");
}

#[rstest]
#[case(GatewayError::rejected_text(403_u16, "Access Denied"), ErrorCode::Forbidden)]
#[case(GatewayError::unauthorized(""), ErrorCode::Unauthorized)]
#[tokio::test]
async fn login_ignores_plain_text_bodies(#[case] failure: GatewayError, #[case] code: ErrorCode) {
    let mut mocks = Mocks::new();
    mocks
        .auth
        .expect_login()
        .times(1)
        .return_once(move |_| Err(failure));

    let err = mocks.build().log_in(&credentials()).await.expect_err("login fails");
    assert_eq!(err.code(), code);
    assert_eq!(err.message(), "Login failed. Check username/password.");
}

#[tokio::test]
async fn submission_ignores_plain_text_bodies() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_apply()
        .times(1)
        .returning(|_| Err(GatewayError::rejected_text(400_u16, "amount: must be positive")));

    let err = mocks
        .build()
        .submit_application(&filled_form())
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Failed to submit loan");
}

#[tokio::test]
async fn login_without_token_is_refused() {
    let mut mocks = Mocks::new();
    mocks.auth.expect_login().times(1).returning(|_| {
        Ok(LoginResponse {
            token: String::new(),
            username: "ada".to_owned(),
            role: "ADMIN".to_owned(),
        })
    });
    mocks.store.expect_save().times(0);

    let err = mocks.build().log_in(&credentials()).await.expect_err("no token");
    assert_eq!(err.message(), "Login failed. Check username/password.");
}

#[tokio::test]
async fn log_out_clears_the_session() {
    let mut mocks = Mocks::new();
    mocks.store.expect_clear().times(1).returning(|| Ok(()));
    mocks.build().log_out().expect("logout");
}

#[tokio::test]
async fn log_out_reports_store_failures() {
    let mut mocks = Mocks::new();
    mocks
        .store
        .expect_clear()
        .times(1)
        .returning(|| Err(SessionStoreError::write("read-only")));
    let err = mocks.build().log_out().expect_err("clear fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[case(GatewayError::rejected(400_u16, "Username already exists"), "Username already exists")]
#[case(GatewayError::rejected_text(400_u16, "Username already exists"), "Username already exists")]
#[case(GatewayError::rejected(400_u16, ""), "Signup failed. Try another username.")]
#[case(GatewayError::transport("refused"), "Signup failed. Try another username.")]
#[tokio::test]
async fn sign_up_surfaces_backend_or_fallback_message(
    #[case] failure: GatewayError,
    #[case] expected: &str,
) {
    let mut mocks = Mocks::new();
    mocks
        .auth
        .expect_register()
        .times(1)
        .return_once(move |_| Err(failure));
    let request = SignupRequest::try_from_parts("ada", "pw", "pw").expect("signup");

    let err = mocks.build().sign_up(&request).await.expect_err("signup fails");
    assert_eq!(err.message(), expected);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let mut mocks = Mocks::new();
    mocks.loans.expect_apply().times(0);
    let mut form = filled_form();
    form.credit_score = "900".to_owned();

    let flow = mocks.build();
    let err = flow.submit_application(&form).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Credit score must be between 300 and 850.");
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn submission_returns_stored_record_and_releases_flag() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_apply()
        .withf(|input| input.full_name() == "Ada Lovelace" && input.tenure() == 24)
        .times(1)
        .returning(|_| Ok(loan(41, LoanStatus::Submitted)));

    let flow = mocks.build();
    let record = flow.submit_application(&filled_form()).await.expect("submitted");
    assert_eq!(record.id, 41);
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn concurrent_submission_is_refused() {
    let mut mocks = Mocks::new();
    mocks.loans.expect_apply().times(0);
    let flow = mocks.build();
    let _held = flow.submitting.try_begin(()).expect("first submission");

    let err = flow
        .submit_application(&filled_form())
        .await
        .expect_err("second submission");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn failed_submission_uses_fallback_and_releases_flag() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_apply()
        .times(1)
        .returning(|_| Err(GatewayError::rejected(500_u16, "")));

    let flow = mocks.build();
    let err = flow
        .submit_application(&filled_form())
        .await
        .expect_err("backend failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.message(), "Failed to submit loan");
    assert!(!flow.is_submitting());
}

#[rstest]
#[case(ReviewAction::Approve, LoanStatus::Approved)]
#[case(ReviewAction::Reject, LoanStatus::Rejected)]
#[tokio::test]
async fn review_calls_matching_endpoint(
    #[case] decision: ReviewAction,
    #[case] status: LoanStatus,
) {
    let mut mocks = Mocks::new();
    let approvals = usize::from(decision == ReviewAction::Approve);
    mocks
        .loans
        .expect_approve()
        .times(approvals)
        .returning(|id| Ok(loan(id, LoanStatus::Approved)));
    mocks
        .loans
        .expect_reject()
        .times(1 - approvals)
        .returning(|id| Ok(loan(id, LoanStatus::Rejected)));

    let flow = mocks.build();
    let record = flow.review(5, decision).await.expect("reviewed");
    assert_eq!(record.status, Some(status));
    assert!(!flow.is_reviewing(5));
}

#[tokio::test]
async fn review_is_guarded_per_loan() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_approve()
        .withf(|id| *id == 8)
        .times(1)
        .returning(|id| Ok(loan(id, LoanStatus::Approved)));

    let flow = mocks.build();
    let _held = flow.reviewing.try_begin(7).expect("first review");

    let err = flow
        .review(7, ReviewAction::Approve)
        .await
        .expect_err("same loan is busy");
    assert_eq!(err.code(), ErrorCode::Conflict);
    flow.review(8, ReviewAction::Approve)
        .await
        .expect("other loans are unaffected");
}

#[tokio::test]
async fn failed_review_names_the_loan() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_reject()
        .times(1)
        .returning(|_| Err(GatewayError::timeout("30s")));

    let flow = mocks.build();
    let err = flow
        .review(12, ReviewAction::Reject)
        .await
        .expect_err("timeout");
    assert_eq!(err.message(), "Failed to reject Loan #12");
    assert!(!flow.is_reviewing(12));
}

#[tokio::test]
async fn analyst_queue_uses_queue_preset() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_list()
        .withf(|query| {
            query.page().size() == 25
                && query.filter() == StatusFilter::Only(LoanStatus::Submitted)
        })
        .times(1)
        .returning(|_| Err(GatewayError::decode("not json")));

    let err = mocks
        .build()
        .analyst_queue(StatusFilter::Only(LoanStatus::Submitted))
        .await
        .expect_err("decode failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Failed to load loan queue.");
}

#[tokio::test]
async fn loan_summary_counts_customer_history() {
    let mut mocks = Mocks::new();
    mocks
        .loans
        .expect_list()
        .withf(|query| query.page().size() == 200 && query.filter() == StatusFilter::All)
        .times(1)
        .returning(|_| {
            Ok(vec![
                loan(1, LoanStatus::Submitted),
                loan(2, LoanStatus::Approved),
                loan(3, LoanStatus::Approved),
            ])
        });

    let summary = mocks.build().loan_summary().await.expect("summary");
    assert_eq!(
        summary,
        LoanSummary {
            total: 3,
            submitted: 1,
            approved: 2,
            rejected: 0,
        }
    );
}

#[rstest]
#[case(403, ErrorCode::Forbidden)]
#[case(404, ErrorCode::NotFound)]
#[case(409, ErrorCode::Conflict)]
#[case(422, ErrorCode::InvalidRequest)]
#[tokio::test]
async fn admin_failures_map_status_codes(#[case] status: u16, #[case] expected: ErrorCode) {
    let mut mocks = Mocks::new();
    mocks
        .admin
        .expect_update_active()
        .times(1)
        .returning(move |_, _| Err(GatewayError::rejected(status, "")));

    let err = mocks
        .build()
        .set_active(3, false)
        .await
        .expect_err("update fails");
    assert_eq!(err.code(), expected);
    assert_eq!(err.message(), "Failed to update user");
}

#[tokio::test]
async fn users_passes_role_filter_through() {
    let mut mocks = Mocks::new();
    mocks
        .admin
        .expect_list_users()
        .withf(|role| *role == Some(Role::Analyst))
        .times(1)
        .returning(|_| {
            Ok(vec![AdminUser {
                id: 2,
                username: "grace".to_owned(),
                role: Role::Analyst,
                active: true,
            }])
        });

    let users = mocks.build().users(Some(Role::Analyst)).await.expect("users");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn session_is_readable_through_the_service() {
    let mut mocks = Mocks::new();
    mocks
        .store
        .expect_load()
        .times(1)
        .returning(|| Ok(StoredSession::empty()));
    let flow = mocks.build();
    assert!(!flow.session().snapshot().expect("snapshot").is_logged_in());
}
