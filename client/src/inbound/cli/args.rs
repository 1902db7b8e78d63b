//! Command-line surface of the `loanflow` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::SettingsOverrides;
use crate::domain::{
    EmploymentType, LoanApplicationForm, LoanId, LoanPurpose, Role, StatusFilter, UserId,
};

/// `loanflow` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "loanflow",
    about = "Apply for loans, review applications and administer users against a LoanFlow backend",
    version
)]
pub struct Cli {
    /// Backend API base URL. Overrides `LOANFLOW_API_URL`.
    #[arg(long, global = true, value_name = "url")]
    pub api_url: Option<String>,
    /// Session file path. Overrides `LOANFLOW_SESSION_FILE`.
    #[arg(long, global = true, value_name = "path")]
    pub session_file: Option<String>,
    /// Per-request timeout in seconds. Overrides `LOANFLOW_REQUEST_TIMEOUT_SECS`.
    #[arg(long, global = true, value_name = "secs")]
    pub request_timeout_secs: Option<u64>,
    /// Emit JSON log lines. Overrides `LOANFLOW_LOG_JSON`.
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Settings given as flags, to be layered over the loaded configuration.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_url: self.api_url.clone(),
            session_file: self.session_file.clone(),
            request_timeout_secs: self.request_timeout_secs,
            log_json: self.log_json,
        }
    }
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account. Does not log in.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Repeat of the password.
        #[arg(long)]
        confirm: String,
    },
    /// Log in and store the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Show form completion and the instant eligibility analysis without
    /// contacting the backend.
    Preview(ApplicationArgs),
    /// Validate and submit a loan application.
    Apply(ApplicationArgs),
    /// Loan listings and analyst review.
    #[command(subcommand)]
    Loans(LoanCommand),
    /// Administration.
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Show what visiting a client route does for the stored session.
    Route {
        /// Route path, for example `/admin`.
        path: String,
    },
}

/// Which loan listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LoanView {
    /// Application status page.
    #[default]
    Status,
    /// Analyst review queue.
    Queue,
    /// The customer's own history, newest first.
    History,
}

/// `loans` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum LoanCommand {
    /// List loans.
    List {
        /// ALL, SUBMITTED, APPROVED or REJECTED.
        #[arg(long, default_value = "ALL")]
        status: StatusFilter,
        #[arg(long, value_enum, default_value_t = LoanView::Status)]
        view: LoanView,
    },
    /// Approve a submitted loan.
    Approve { id: LoanId },
    /// Reject a submitted loan.
    Reject { id: LoanId },
    /// Status counts and the most recent applications.
    Summary,
}

/// `admin` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// User and loan counts.
    Metrics,
    /// List users.
    Users {
        /// Only users holding this role.
        #[arg(long)]
        role: Option<Role>,
    },
    /// Change a user's role.
    SetRole { id: UserId, role: Role },
    /// Enable or disable a user's account.
    SetActive {
        id: UserId,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
}

/// Loan application form fields. Every field may be left empty.
#[derive(Debug, Clone, Default, Args)]
pub struct ApplicationArgs {
    #[arg(long, default_value = "")]
    pub full_name: String,
    #[arg(long, default_value = "")]
    pub amount: String,
    /// Tenure in months.
    #[arg(long, default_value = "")]
    pub tenure: String,
    #[arg(long, default_value = "")]
    pub monthly_income: String,
    #[arg(long, default_value = "")]
    pub monthly_debt: String,
    #[arg(long, default_value = "")]
    pub credit_score: String,
    #[arg(long, default_value_t = EmploymentType::default())]
    pub employment_type: EmploymentType,
    #[arg(long, default_value_t = LoanPurpose::default())]
    pub purpose: LoanPurpose,
}

impl From<ApplicationArgs> for LoanApplicationForm {
    fn from(args: ApplicationArgs) -> Self {
        Self {
            full_name: args.full_name,
            amount: args.amount,
            tenure: args.tenure,
            monthly_income: args.monthly_income,
            monthly_debt: args.monthly_debt,
            credit_score: args.credit_score,
            employment_type: args.employment_type,
            purpose: args.purpose,
        }
    }
}
