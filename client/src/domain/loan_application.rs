//! The loan application form and its validated input.
//!
//! Numeric fields are held as the text the user typed so that an empty
//! field can be told apart from zero. [`LoanApplicationForm::validate`] is
//! the only way to obtain a [`LoanApplicationInput`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest credit score the form accepts.
pub const MIN_CREDIT_SCORE: u16 = 300;
/// Highest credit score the form accepts.
pub const MAX_CREDIT_SCORE: u16 = 850;

/// Applicant employment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    /// Salaried employee.
    #[default]
    Salaried,
    /// Self-employed.
    SelfEmployed,
    /// Student.
    Student,
    /// Not employed.
    Unemployed,
}

impl EmploymentType {
    /// Every employment type, in form order.
    pub const ALL: [Self; 4] = [
        Self::Salaried,
        Self::SelfEmployed,
        Self::Student,
        Self::Unemployed,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salaried => "SALARIED",
            Self::SelfEmployed => "SELF_EMPLOYED",
            Self::Student => "STUDENT",
            Self::Unemployed => "UNEMPLOYED",
        }
    }
}

/// Purpose of the loan. Recorded with the application but not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanPurpose {
    /// Home purchase or renovation.
    Home,
    /// Vehicle.
    Auto,
    /// General personal use.
    #[default]
    Personal,
    /// Tuition and study costs.
    Education,
    /// Medical expenses.
    Medical,
}

impl LoanPurpose {
    /// Every purpose, in form order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Auto,
        Self::Personal,
        Self::Education,
        Self::Medical,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Auto => "AUTO",
            Self::Personal => "PERSONAL",
            Self::Education => "EDUCATION",
            Self::Medical => "MEDICAL",
        }
    }
}

/// Error returned when a string names no known form option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownOptionError {
    field: &'static str,
    value: String,
}

macro_rules! impl_form_option {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_uppercase().replace('-', "_");
                Self::ALL
                    .into_iter()
                    .find(|option| option.as_str() == wanted)
                    .ok_or_else(|| UnknownOptionError {
                        field: $field,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

impl_form_option!(EmploymentType, "employment type");
impl_form_option!(LoanPurpose, "loan purpose");

/// Validation failures, reported one at a time in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormValidationError {
    /// Full name blank.
    #[error("Please enter your full name.")]
    MissingName,
    /// A numeric field was blank or not a number.
    #[error("Please fill all numeric fields correctly.")]
    InvalidNumber,
    /// Amount or tenure not positive.
    #[error("Loan amount and tenure must be greater than 0.")]
    NonPositiveAmountOrTenure,
    /// Monthly income not positive.
    #[error("Monthly income must be greater than 0.")]
    NonPositiveIncome,
    /// Credit score outside the accepted range.
    #[error("Credit score must be between 300 and 850.")]
    CreditScoreOutOfRange,
    /// Monthly debt below zero.
    #[error("Monthly debt cannot be negative.")]
    NegativeDebt,
}

/// Raw form state as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanApplicationForm {
    /// Applicant's full name.
    pub full_name: String,
    /// Requested amount.
    pub amount: String,
    /// Tenure in months.
    pub tenure: String,
    /// Monthly income.
    pub monthly_income: String,
    /// Existing monthly debt payments.
    pub monthly_debt: String,
    /// Credit score.
    pub credit_score: String,
    /// Employment category.
    pub employment_type: EmploymentType,
    /// Loan purpose.
    pub purpose: LoanPurpose,
}

impl LoanApplicationForm {
    /// Whether every text field holds something.
    pub fn is_complete(&self) -> bool {
        [
            &self.full_name,
            &self.amount,
            &self.tenure,
            &self.monthly_income,
            &self.monthly_debt,
            &self.credit_score,
        ]
        .into_iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Percentage of the form filled in, for progress display.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::LoanApplicationForm;
    ///
    /// // Employment type and purpose always have a value.
    /// assert_eq!(LoanApplicationForm::default().completion(), 15);
    /// ```
    pub fn completion(&self) -> u8 {
        let weighted: [(&str, u8); 6] = [
            (&self.full_name, 25),
            (&self.amount, 15),
            (&self.tenure, 15),
            (&self.monthly_income, 15),
            (&self.monthly_debt, 10),
            (&self.credit_score, 10),
        ];
        let typed = weighted
            .into_iter()
            .filter(|(value, _)| !value.trim().is_empty())
            .fold(0_u8, |total, (_, weight)| total.saturating_add(weight));
        // employment type (7) and purpose (8) are always selected
        typed.saturating_add(7 + 8).min(100)
    }

    /// Check the form and produce validated input.
    pub fn validate(&self) -> Result<LoanApplicationInput, FormValidationError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(FormValidationError::MissingName);
        }

        let amount = parse_decimal(&self.amount)?;
        let tenure = parse_whole(&self.tenure)?;
        let monthly_income = parse_decimal(&self.monthly_income)?;
        let monthly_debt = parse_decimal(&self.monthly_debt)?;
        let credit_score = parse_whole(&self.credit_score)?;

        if amount <= 0.0 || tenure <= 0 {
            return Err(FormValidationError::NonPositiveAmountOrTenure);
        }
        if monthly_income <= 0.0 {
            return Err(FormValidationError::NonPositiveIncome);
        }
        let credit_score = u16::try_from(credit_score)
            .ok()
            .filter(|score| (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(score))
            .ok_or(FormValidationError::CreditScoreOutOfRange)?;
        if monthly_debt < 0.0 {
            return Err(FormValidationError::NegativeDebt);
        }
        let tenure = u32::try_from(tenure).map_err(|_| FormValidationError::InvalidNumber)?;

        Ok(LoanApplicationInput {
            full_name: full_name.to_owned(),
            amount,
            tenure,
            monthly_income,
            monthly_debt,
            credit_score,
            employment_type: self.employment_type,
            purpose: self.purpose,
        })
    }
}

fn parse_decimal(raw: &str) -> Result<f64, FormValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(FormValidationError::InvalidNumber)
}

fn parse_whole(raw: &str) -> Result<i64, FormValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FormValidationError::InvalidNumber)
}

/// A fully validated application, ready to score or submit.
///
/// ## Invariants
/// - `full_name` is trimmed and non-empty.
/// - `amount` and `monthly_income` are finite and positive.
/// - `monthly_debt` is finite and not negative.
/// - `tenure` is positive and `credit_score` is within 300..=850.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplicationInput {
    full_name: String,
    amount: f64,
    tenure: u32,
    monthly_income: f64,
    monthly_debt: f64,
    credit_score: u16,
    employment_type: EmploymentType,
    purpose: LoanPurpose,
}

impl LoanApplicationInput {
    /// Applicant's full name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Requested amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Tenure in months.
    pub fn tenure(&self) -> u32 {
        self.tenure
    }

    /// Monthly income.
    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    /// Existing monthly debt payments.
    pub fn monthly_debt(&self) -> f64 {
        self.monthly_debt
    }

    /// Credit score.
    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    /// Employment category.
    pub fn employment_type(&self) -> EmploymentType {
        self.employment_type
    }

    /// Loan purpose.
    pub fn purpose(&self) -> LoanPurpose {
        self.purpose
    }
}
