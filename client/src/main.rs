//! `loanflow` entry-point: loads settings, wires the HTTP gateway and the
//! session file into the workflow service, and runs one command.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use loanflow_client::config::ClientSettings;
use loanflow_client::domain::{LoanFlow, RouteTable, SessionContext};
use loanflow_client::inbound::cli::{Cli, execute};
use loanflow_client::outbound::http::HttpGateway;
use loanflow_client::outbound::session_store::FileSessionStore;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("loanflow")])
        .map_err(|err| eyre!("failed to load LOANFLOW settings: {err}"))?
        .with_overrides(cli.overrides());
    init_tracing(settings.log_json);

    let store = FileSessionStore::new(settings.session_file())
        .wrap_err("invalid session file path")?;
    let session = SessionContext::new(Arc::new(store));
    let gateway = Arc::new(
        HttpGateway::new(settings.api_url()?, settings.request_timeout()?, session.clone())
            .wrap_err("failed to build HTTP client")?,
    );
    let flow = LoanFlow::new(Arc::clone(&gateway), Arc::clone(&gateway), gateway, session);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = runtime.block_on(execute(cli.command, &flow, &RouteTable::standard(), &mut out));
    out.flush().wrap_err("failed to flush output")?;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            writeln!(io::stderr().lock(), "error: {err}").wrap_err("failed to write error")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
