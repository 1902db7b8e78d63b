//! Tests for command dispatch.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{GatewayError, MockAdminApi, MockAuthApi, MockLoanApi, SessionStore};
use crate::domain::{
    ErrorCode, LoanRecord, LoanStatus, LoginResponse, SessionContext, SessionIdentity,
    StoredSession,
};
use crate::outbound::session_store::MemorySessionStore;

type TestFlow = LoanFlow<MockAuthApi, MockLoanApi, MockAdminApi>;

struct Harness {
    auth: MockAuthApi,
    loans: MockLoanApi,
    admin: MockAdminApi,
    store: Arc<MemorySessionStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            auth: MockAuthApi::new(),
            loans: MockLoanApi::new(),
            admin: MockAdminApi::new(),
            store: Arc::new(MemorySessionStore::new()),
        }
    }

    fn logged_in(role: &str) -> Self {
        let identity = SessionIdentity::try_new("jwt", role, "ada").expect("identity");
        Self {
            store: Arc::new(MemorySessionStore::with_session(StoredSession::from(
                &identity,
            ))),
            ..Self::new()
        }
    }

    fn build(self) -> (TestFlow, Arc<MemorySessionStore>) {
        let flow = LoanFlow::new(
            Arc::new(self.auth),
            Arc::new(self.loans),
            Arc::new(self.admin),
            SessionContext::new(self.store.clone()),
        );
        (flow, self.store)
    }
}

async fn run(flow: &TestFlow, command: Command) -> (Result<(), CliError>, String) {
    let mut out = Vec::new();
    let result = execute(command, flow, &RouteTable::standard(), &mut out).await;
    (result, String::from_utf8(out).expect("utf-8 output"))
}

fn loan(id: i64, status: LoanStatus) -> LoanRecord {
    serde_json::from_value(serde_json::json!({ "id": id, "status": status })).expect("record")
}

fn complete_application() -> ApplicationArgs {
    ApplicationArgs {
        full_name: "Ada Lovelace".to_owned(),
        amount: "10000".to_owned(),
        tenure: "24".to_owned(),
        monthly_income: "8000".to_owned(),
        monthly_debt: "800".to_owned(),
        credit_score: "820".to_owned(),
        ..ApplicationArgs::default()
    }
}

#[tokio::test]
async fn login_stores_session_and_reports_landing() {
    let mut harness = Harness::new();
    harness.auth.expect_login().times(1).returning(|_| {
        Ok(LoginResponse {
            token: "jwt".to_owned(),
            username: "ada".to_owned(),
            role: "ROLE_ANALYST".to_owned(),
        })
    });
    let (flow, store) = harness.build();

    let (result, out) = run(
        &flow,
        Command::Login {
            username: "ada".to_owned(),
            password: "pw".to_owned(),
        },
    )
    .await;

    result.expect("login succeeds");
    assert_eq!(out, "Logged in as ada (ANALYST). Landing page: /analyst\n");
    assert!(store.load().expect("load").is_logged_in());
}

#[tokio::test]
async fn login_with_blank_username_never_calls_backend() {
    let mut harness = Harness::new();
    harness.auth.expect_login().times(0);
    let (flow, _) = harness.build();

    let (result, _) = run(
        &flow,
        Command::Login {
            username: "  ".to_owned(),
            password: "pw".to_owned(),
        },
    )
    .await;
    assert!(matches!(result, Err(CliError::Login(_))));
}

#[tokio::test]
async fn signup_mismatch_is_reported_locally() {
    let mut harness = Harness::new();
    harness.auth.expect_register().times(0);
    let (flow, _) = harness.build();

    let (result, _) = run(
        &flow,
        Command::Signup {
            username: "ada".to_owned(),
            password: "one".to_owned(),
            confirm: "two".to_owned(),
        },
    )
    .await;
    let err = result.expect_err("mismatch");
    assert_eq!(err.to_string(), "Passwords do not match.");
}

#[tokio::test]
async fn signup_success_prints_confirmation() {
    let mut harness = Harness::new();
    harness.auth.expect_register().times(1).returning(|_| Ok(()));
    let (flow, _) = harness.build();

    let (result, out) = run(
        &flow,
        Command::Signup {
            username: "ada".to_owned(),
            password: "pw".to_owned(),
            confirm: "pw".to_owned(),
        },
    )
    .await;
    result.expect("signup");
    assert_eq!(out, format!("{SIGNUP_SUCCESS}\n"));
}

#[tokio::test]
async fn logout_then_whoami_reports_logged_out() {
    let (flow, _) = Harness::logged_in("CUSTOMER").build();

    let (before, out) = run(&flow, Command::Whoami).await;
    before.expect("whoami");
    assert_eq!(out, "ada (CUSTOMER)\n");

    run(&flow, Command::Logout).await.0.expect("logout");
    let (after, out) = run(&flow, Command::Whoami).await;
    after.expect("whoami");
    assert_eq!(out, "Not logged in.\n");
}

#[tokio::test]
async fn preview_is_offline() {
    let (flow, _) = Harness::new().build();
    let (result, out) = run(&flow, Command::Preview(complete_application())).await;
    result.expect("preview");
    assert!(out.contains("Completion: 100%"));
    assert!(out.contains("Decision: Eligible"));
}

#[tokio::test]
async fn invalid_application_is_previewed_but_not_submitted() {
    let mut harness = Harness::logged_in("CUSTOMER");
    harness.loans.expect_apply().times(0);
    let (flow, _) = harness.build();
    let mut fields = complete_application();
    fields.monthly_income = "0".to_owned();

    let (result, out) = run(&flow, Command::Apply(fields)).await;
    assert!(out.contains("Complete the form"));
    let Err(CliError::Service(err)) = result else {
        panic!("expected a service error");
    };
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Monthly income must be greater than 0.");
}

#[tokio::test]
async fn apply_reports_reference() {
    let mut harness = Harness::logged_in("CUSTOMER");
    harness
        .loans
        .expect_apply()
        .times(1)
        .returning(|_| Ok(loan(77, LoanStatus::Submitted)));
    let (flow, _) = harness.build();

    let (result, out) = run(&flow, Command::Apply(complete_application())).await;
    result.expect("apply");
    assert!(out.ends_with(&format!("{SUBMIT_SUCCESS} Reference: Loan #77\n")));
}

#[rstest]
#[case(LoanCommand::Approve { id: 9 }, "Loan #9 approved.\n")]
#[case(LoanCommand::Reject { id: 9 }, "Loan #9 rejected.\n")]
#[tokio::test]
async fn review_commands_confirm(#[case] command: LoanCommand, #[case] expected: &str) {
    let mut harness = Harness::logged_in("ANALYST");
    harness
        .loans
        .expect_approve()
        .returning(|id| Ok(loan(id, LoanStatus::Approved)));
    harness
        .loans
        .expect_reject()
        .returning(|id| Ok(loan(id, LoanStatus::Rejected)));
    let (flow, _) = harness.build();

    let (result, out) = run(&flow, Command::Loans(command)).await;
    result.expect("review");
    assert_eq!(out, expected);
}

#[tokio::test]
async fn summary_lists_only_recent_rows() {
    let mut harness = Harness::logged_in("CUSTOMER");
    harness.loans.expect_list().times(1).returning(|_| {
        Ok((1..=7)
            .map(|id| loan(id, LoanStatus::Submitted))
            .collect::<Vec<_>>())
    });
    let (flow, _) = harness.build();

    let (result, out) = run(&flow, Command::Loans(LoanCommand::Summary)).await;
    result.expect("summary");
    assert!(out.contains("Total: 7"));
    assert!(out.contains("Pending: 7"));
    let rows = out
        .lines()
        .skip_while(|line| *line != "Recent applications:")
        .skip(2)
        .count();
    assert_eq!(rows, RECENT_LOANS_LIMIT);
}

#[tokio::test]
async fn admin_failure_surfaces_fallback() {
    let mut harness = Harness::logged_in("ADMIN");
    harness
        .admin
        .expect_metrics()
        .times(1)
        .returning(|| Err(GatewayError::rejected(500_u16, "")));
    let (flow, _) = harness.build();

    let (result, _) = run(&flow, Command::Admin(AdminCommand::Metrics)).await;
    assert_eq!(
        result.expect_err("metrics fail").to_string(),
        "Failed to load admin metrics"
    );
}

#[rstest]
#[case("ADMIN", "/admin", "render /admin\n")]
#[case("CUSTOMER", "/admin", "redirect /customer\n")]
#[case("ROLE_ANALYST", "/dashboard", "redirect /analyst\n")]
#[tokio::test]
async fn route_uses_stored_session(
    #[case] role: &str,
    #[case] path: &str,
    #[case] expected: &str,
) {
    let (flow, _) = Harness::logged_in(role).build();
    let (result, out) = run(
        &flow,
        Command::Route {
            path: path.to_owned(),
        },
    )
    .await;
    result.expect("route");
    assert_eq!(out, expected);
}

#[tokio::test]
async fn route_without_session_goes_to_login() {
    let (flow, _) = Harness::new().build();
    let (result, out) = run(
        &flow,
        Command::Route {
            path: "/loan-application".to_owned(),
        },
    )
    .await;
    result.expect("route");
    assert_eq!(out, "redirect /login\n");
}
