//! Plain-text rendering of command results.

use std::io::{self, Write};

use crate::domain::{
    AccessOutcome, AdminMetrics, AdminUser, EligibilityAnalysis, LoanRecord, LoanSummary, Role,
    StoredSession,
};

const MISSING: &str = "-";

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |value| value.to_string())
}

pub(super) fn session(out: &mut impl Write, session: &StoredSession) -> io::Result<()> {
    if !session.is_logged_in() {
        return writeln!(out, "Not logged in.");
    }
    let username = session.username.as_deref().unwrap_or(MISSING);
    let role = session.normalized_role();
    writeln!(out, "{username} ({})", if role.is_empty() { MISSING } else { &role })
}

pub(super) fn preview(
    out: &mut impl Write,
    completion: u8,
    analysis: Option<&EligibilityAnalysis>,
) -> io::Result<()> {
    writeln!(out, "Completion: {completion}%")?;
    let Some(analysis) = analysis else {
        return writeln!(out, "Complete the form to see the eligibility analysis.");
    };
    writeln!(out, "Debt-to-income: {:.1}%", analysis.dti * 100.0)?;
    writeln!(out, "Risk score: {}/100", analysis.risk)?;
    writeln!(out, "Decision: {}", analysis.decision.label())?;
    writeln!(out, "Suggested rate: {:.1}%", analysis.rate)
}

pub(super) fn loans(out: &mut impl Write, loans: &[LoanRecord]) -> io::Result<()> {
    if loans.is_empty() {
        return writeln!(out, "No loans found.");
    }
    writeln!(
        out,
        "{:>6}  {:<24}  {:>12}  {:>6}  {:>6}  {:>5}  {:<10}  {:<8}",
        "ID", "APPLICANT", "AMOUNT", "MONTHS", "RATE", "RISK", "DECISION", "STATUS"
    )?;
    for loan in loans {
        writeln!(
            out,
            "{:>6}  {:<24}  {:>12}  {:>6}  {:>6}  {:>5}  {:<10}  {:<8}",
            loan.id,
            loan.applicant().unwrap_or(MISSING),
            or_missing(loan.amount.map(|amount| format!("{amount:.2}"))),
            or_missing(loan.tenure),
            or_missing(loan.interest_rate.map(|rate| format!("{rate:.1}%"))),
            or_missing(loan.risk_score),
            loan.eligibility_decision.as_deref().unwrap_or(MISSING),
            loan.status_label(),
        )?;
    }
    Ok(())
}

pub(super) fn summary(
    out: &mut impl Write,
    summary: &LoanSummary,
    recent: &[LoanRecord],
) -> io::Result<()> {
    writeln!(out, "Total: {}", summary.total)?;
    writeln!(out, "Pending: {}", summary.submitted)?;
    writeln!(out, "Approved: {}", summary.approved)?;
    writeln!(out, "Rejected: {}", summary.rejected)?;
    writeln!(out)?;
    writeln!(out, "Recent applications:")?;
    loans(out, recent)
}

pub(super) fn metrics(out: &mut impl Write, metrics: &AdminMetrics) -> io::Result<()> {
    writeln!(out, "Users: {}", metrics.total_users())?;
    for role in Role::ALL {
        let count = metrics.users_with(role);
        writeln!(
            out,
            "  {role}: {count} ({:.0}%)",
            metrics.share_percent(count)
        )?;
    }
    writeln!(out, "Loans: {}", metrics.loans)
}

pub(super) fn users(out: &mut impl Write, users: &[AdminUser]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "No users found.");
    }
    writeln!(out, "{:>6}  {:<24}  {:<8}  {:<8}", "ID", "USERNAME", "ROLE", "ACTIVE")?;
    for user in users {
        writeln!(
            out,
            "{:>6}  {:<24}  {:<8}  {:<8}",
            user.id,
            user.username,
            user.role.as_str(),
            if user.active { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

pub(super) fn user(out: &mut impl Write, user: &AdminUser) -> io::Result<()> {
    writeln!(
        out,
        "User #{} ({}) is now {} and {}.",
        user.id,
        user.username,
        user.role,
        if user.active { "active" } else { "disabled" }
    )
}

pub(super) fn route(out: &mut impl Write, path: &str, outcome: AccessOutcome) -> io::Result<()> {
    match outcome.target() {
        None => writeln!(out, "render {path}"),
        Some(target) => writeln!(out, "redirect {target}"),
    }
}
