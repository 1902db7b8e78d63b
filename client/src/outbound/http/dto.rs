//! Wire representations of LoanFlow request and error bodies.
//!
//! Response bodies that map one-to-one onto domain types (`LoanRecord`,
//! `AdminUser`, `AdminMetrics`, `LoginResponse`) are decoded directly; only
//! request bodies and the error envelope live here.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{EmploymentType, LoanApplicationInput, LoanPurpose, Role};

/// Body of `auth/register` and `auth/login`.
#[derive(Serialize)]
pub(super) struct CredentialsDto<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
}

/// Body of `loans/apply`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApplyLoanDto<'a> {
    full_name: &'a str,
    amount: f64,
    tenure: u32,
    monthly_income: f64,
    monthly_debt: f64,
    credit_score: u16,
    employment_type: EmploymentType,
    purpose: LoanPurpose,
}

impl<'a> From<&'a LoanApplicationInput> for ApplyLoanDto<'a> {
    fn from(input: &'a LoanApplicationInput) -> Self {
        Self {
            full_name: input.full_name(),
            amount: input.amount(),
            tenure: input.tenure(),
            monthly_income: input.monthly_income(),
            monthly_debt: input.monthly_debt(),
            credit_score: input.credit_score(),
            employment_type: input.employment_type(),
            purpose: input.purpose(),
        }
    }
}

/// Body of `admin/users/{id}/role`.
#[derive(Debug, Serialize)]
pub(super) struct RoleUpdateDto {
    pub(super) role: Role,
}

/// Body of `admin/users/{id}/active`.
#[derive(Debug, Serialize)]
pub(super) struct ActiveUpdateDto {
    pub(super) active: bool,
}

/// Error bodies, classified by whether they parse as JSON.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ErrorBodyDto {
    /// A JSON body. Only a string `message` field or a bare JSON string
    /// counts as a message; arrays and nested objects carry none.
    Json(Option<String>),
    /// A non-JSON, non-HTML plain-text body.
    Text(String),
    /// Empty bodies and HTML error pages.
    Empty,
}

impl ErrorBodyDto {
    pub(super) fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::Json(json_message(value)),
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_owned();
                if text.is_empty() || text.starts_with('<') {
                    Self::Empty
                } else {
                    Self::Text(text)
                }
            }
        }
    }
}

fn json_message(value: Value) -> Option<String> {
    let message = match value {
        Value::String(text) => text,
        Value::Object(mut fields) => match fields.remove("message") {
            Some(Value::String(text)) => text,
            _ => return None,
        },
        _ => return None,
    };
    (!message.trim().is_empty()).then_some(message)
}
