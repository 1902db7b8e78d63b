//! Command-line adapter.
//!
//! Parses `loanflow` arguments with clap and drives [`LoanFlow`] and the
//! route table. Results are written to the supplied output; failures are
//! returned as [`CliError`] for the binary to report on stderr.

mod args;
mod render;

use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

pub use self::args::{AdminCommand, ApplicationArgs, Cli, Command, LoanCommand, LoanView};
use crate::domain::ports::{AdminApi, AuthApi, LoanApi};
use crate::domain::{
    Error, LoanApplicationForm, LoanFlow, LoanId, LoanSummary, LoginCredentials,
    LoginValidationError, RECENT_LOANS_LIMIT, ReviewAction, RouteTable, SignupRequest,
    SignupValidationError, evaluate,
};

/// Shown after a successful signup.
pub const SIGNUP_SUCCESS: &str = "Account created! Redirecting to login...";
/// Shown after a successful loan submission.
pub const SUBMIT_SUCCESS: &str = "Your loan application has been submitted successfully.";

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The workflow service refused or failed.
    #[error("{0}")]
    Service(#[from] Error),
    /// Login input was incomplete.
    #[error("{0}")]
    Login(#[from] LoginValidationError),
    /// Signup input was incomplete or inconsistent.
    #[error("{0}")]
    Signup(#[from] SignupValidationError),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Run one command.
///
/// # Errors
///
/// Returns [`CliError`] when input validation, the service or writing the
/// output fails.
pub async fn execute<A, L, M>(
    command: Command,
    flow: &LoanFlow<A, L, M>,
    routes: &RouteTable,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    A: AuthApi,
    L: LoanApi,
    M: AdminApi,
{
    match command {
        Command::Signup {
            username,
            password,
            confirm,
        } => {
            let request = SignupRequest::try_from_parts(&username, &password, &confirm)?;
            flow.sign_up(&request).await?;
            writeln!(out, "{SIGNUP_SUCCESS}")?;
        }
        Command::Login { username, password } => {
            let credentials = LoginCredentials::try_from_parts(&username, &password)?;
            let outcome = flow.log_in(&credentials).await?;
            writeln!(
                out,
                "Logged in as {} ({}). Landing page: {}",
                outcome.username, outcome.role, outcome.landing
            )?;
        }
        Command::Logout => {
            flow.log_out()?;
            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => render::session(out, &flow.session().snapshot()?)?,
        Command::Preview(fields) => preview(&LoanApplicationForm::from(fields), out)?,
        Command::Apply(fields) => {
            let form = LoanApplicationForm::from(fields);
            preview(&form, out)?;
            let record = flow.submit_application(&form).await?;
            writeln!(out, "{SUBMIT_SUCCESS} Reference: Loan #{}", record.id)?;
        }
        Command::Loans(command) => loans(command, flow, out).await?,
        Command::Admin(command) => admin(command, flow, out).await?,
        Command::Route { path } => {
            let outcome = routes.resolve(&path, &flow.session().snapshot()?);
            debug!(path, ?outcome, "route resolved");
            render::route(out, &path, outcome)?;
        }
    }
    Ok(())
}

fn preview(form: &LoanApplicationForm, out: &mut impl Write) -> io::Result<()> {
    render::preview(out, form.completion(), evaluate(form).as_ref())
}

async fn loans<A, L, M>(
    command: LoanCommand,
    flow: &LoanFlow<A, L, M>,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    A: AuthApi,
    L: LoanApi,
    M: AdminApi,
{
    match command {
        LoanCommand::List { status, view } => {
            let records = match view {
                LoanView::Status => flow.application_status(status).await?,
                LoanView::Queue => flow.analyst_queue(status).await?,
                LoanView::History => flow.customer_history().await?,
            };
            render::loans(out, &records)?;
        }
        LoanCommand::Approve { id } => review(flow, id, ReviewAction::Approve, out).await?,
        LoanCommand::Reject { id } => review(flow, id, ReviewAction::Reject, out).await?,
        LoanCommand::Summary => {
            let history = flow.customer_history().await?;
            let recent = &history[..history.len().min(RECENT_LOANS_LIMIT)];
            render::summary(out, &LoanSummary::from_records(&history), recent)?;
        }
    }
    Ok(())
}

async fn review<A, L, M>(
    flow: &LoanFlow<A, L, M>,
    id: LoanId,
    decision: ReviewAction,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    A: AuthApi,
    L: LoanApi,
    M: AdminApi,
{
    flow.review(id, decision).await?;
    writeln!(out, "{}", decision.success_message(id))?;
    Ok(())
}

async fn admin<A, L, M>(
    command: AdminCommand,
    flow: &LoanFlow<A, L, M>,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    A: AuthApi,
    L: LoanApi,
    M: AdminApi,
{
    match command {
        AdminCommand::Metrics => render::metrics(out, &flow.metrics().await?)?,
        AdminCommand::Users { role } => render::users(out, &flow.users(role).await?)?,
        AdminCommand::SetRole { id, role } => render::user(out, &flow.set_role(id, role).await?)?,
        AdminCommand::SetActive { id, active } => {
            render::user(out, &flow.set_active(id, active).await?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
