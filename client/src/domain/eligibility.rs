//! Instant eligibility analysis shown while an application is being filled.
//!
//! The analysis is advisory. The backend performs the authoritative
//! evaluation when the application is stored. Scoring is a sum of points
//! looked up in threshold tables, clamped to 0..=100, then bucketed into a
//! decision and a suggested annual rate.

use std::fmt;

use serde::Serialize;

use super::loan_application::{EmploymentType, LoanApplicationForm, LoanApplicationInput};

/// Highest risk score an analysis reports.
pub const MAX_RISK: u8 = 100;

/// Rate offered at zero risk, in percent.
const BASE_RATE: f64 = 7.5;
/// Rate added per risk point, in percent.
const RATE_PER_RISK_POINT: f64 = 0.08;

/// Credit score floors, best first. Scores below every floor earn
/// [`CREDIT_FALLBACK_POINTS`].
const CREDIT_BANDS: [(u16, u8); 4] = [(780, 10), (740, 20), (700, 35), (650, 50)];
const CREDIT_FALLBACK_POINTS: u8 = 70;

/// Debt-to-income ceilings, lowest first.
const DTI_BANDS: [(f64, u8); 3] = [(0.20, 5), (0.35, 20), (0.50, 40)];
const DTI_FALLBACK_POINTS: u8 = 60;

/// Amount over annual income ceilings, lowest first.
const AFFORDABILITY_BANDS: [(f64, u8); 2] = [(1.5, 5), (3.0, 15)];
const AFFORDABILITY_FALLBACK_POINTS: u8 = 25;

/// Limits that send an application to a given decision when any one is hit.
struct DecisionGate {
    decision: Decision,
    credit_below: u16,
    dti_above: f64,
    risk_at_least: u8,
}

impl DecisionGate {
    fn trips(&self, credit_score: u16, dti: f64, risk: u8) -> bool {
        credit_score < self.credit_below || dti > self.dti_above || risk >= self.risk_at_least
    }
}

/// Checked in order; the first gate that trips wins.
const DECISION_GATES: [DecisionGate; 2] = [
    DecisionGate {
        decision: Decision::Reject,
        credit_below: 600,
        dti_above: 0.60,
        risk_at_least: 80,
    },
    DecisionGate {
        decision: Decision::Review,
        credit_below: 680,
        dti_above: 0.45,
        risk_at_least: 55,
    },
];

/// Advisory outcome of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Likely to be approved.
    Eligible,
    /// Needs an analyst's attention.
    Review,
    /// High risk.
    Reject,
}

impl Decision {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eligible => "ELIGIBLE",
            Self::Review => "REVIEW",
            Self::Reject => "REJECT",
        }
    }

    /// Badge text shown next to the analysis.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::Review => "Needs review",
            Self::Reject => "High risk",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a complete application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilityAnalysis {
    /// Monthly debt over monthly income.
    pub dti: f64,
    /// Risk score in 0..=100.
    pub risk: u8,
    /// Advisory decision.
    pub decision: Decision,
    /// Suggested annual rate in percent, one decimal place.
    pub rate: f64,
}

/// Score a validated application.
///
/// # Examples
/// ```
/// use loanflow_client::domain::{score, Decision, LoanApplicationForm};
///
/// let form = LoanApplicationForm {
///     full_name: "Ada".into(),
///     amount: "10000".into(),
///     tenure: "24".into(),
///     monthly_income: "8000".into(),
///     monthly_debt: "800".into(),
///     credit_score: "820".into(),
///     ..LoanApplicationForm::default()
/// };
/// let analysis = score(&form.validate().unwrap());
/// assert_eq!(analysis.risk, 25);
/// assert_eq!(analysis.decision, Decision::Eligible);
/// assert_eq!(analysis.rate, 9.5);
/// ```
pub fn score(input: &LoanApplicationInput) -> EligibilityAnalysis {
    let credit_score = input.credit_score();
    let dti = input.monthly_debt() / input.monthly_income();
    let affordability = input.amount() / (input.monthly_income() * 12.0);

    let raw = credit_points(credit_score)
        .saturating_add(ceiling_points(&DTI_BANDS, DTI_FALLBACK_POINTS, dti))
        .saturating_add(employment_points(input.employment_type()))
        .saturating_add(ceiling_points(
            &AFFORDABILITY_BANDS,
            AFFORDABILITY_FALLBACK_POINTS,
            affordability,
        ));
    let risk = raw.min(MAX_RISK);

    EligibilityAnalysis {
        dti,
        risk,
        decision: decide(credit_score, dti, risk),
        rate: rate_for(risk),
    }
}

/// Analyse the form, or `None` while it is incomplete or invalid.
pub fn evaluate(form: &LoanApplicationForm) -> Option<EligibilityAnalysis> {
    form.validate().ok().map(|input| score(&input))
}

fn credit_points(credit_score: u16) -> u8 {
    CREDIT_BANDS
        .iter()
        .find(|(floor, _)| credit_score >= *floor)
        .map_or(CREDIT_FALLBACK_POINTS, |(_, points)| *points)
}

fn ceiling_points(bands: &[(f64, u8)], fallback: u8, value: f64) -> u8 {
    bands
        .iter()
        .find(|(ceiling, _)| value <= *ceiling)
        .map_or(fallback, |(_, points)| *points)
}

const fn employment_points(employment: EmploymentType) -> u8 {
    match employment {
        EmploymentType::Salaried => 5,
        EmploymentType::SelfEmployed => 15,
        EmploymentType::Student => 25,
        EmploymentType::Unemployed => 35,
    }
}

fn decide(credit_score: u16, dti: f64, risk: u8) -> Decision {
    DECISION_GATES
        .iter()
        .find(|gate| gate.trips(credit_score, dti, risk))
        .map_or(Decision::Eligible, |gate| gate.decision)
}

fn rate_for(risk: u8) -> f64 {
    ((BASE_RATE + f64::from(risk) * RATE_PER_RISK_POINT) * 10.0).round() / 10.0
}
