use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use selfreg::api::{self, AppState};
use selfreg::backend::IdentityBackend;
use selfreg::check::{check_request, run_check};
use selfreg::config::{AppConfig, load_config};
use selfreg::logging::{effective_level, init_logging};
use tokio::net::TcpListener;
use tracing::{debug, info};

fn main() {
    match try_main() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err:?}");
            std::process::exit(1);
        }
    }
}

/// Returns the process exit status.
fn try_main() -> Result<i32> {
    let cli = Cli::parse();

    let config = load_config(cli.common.config.as_deref())?;
    let level = effective_level(&config.logging.level, cli.common.verbose, cli.common.quiet);
    init_logging(level, cli.common.json);
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Serve(cmd) => serve(config, cmd).map(|()| 0),
        Command::Check(cmd) => handle_check(&config, cmd, cli.common.json),
        Command::Config { command } => handle_config(&config, command).map(|()| 0),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Selfreg - self sign-up username validation service.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true, env = "SELFREG_CONFIG")]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Output machine readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),
    /// Validate a single username against the configured tenants
    Check(CheckCommand),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Address to bind to (overrides config)
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Args)]
struct CheckCommand {
    /// Username to validate, optionally `DOMAIN/name`
    username: String,
    /// Tenant domain (defaults to the configured default tenant)
    #[arg(long)]
    tenant: Option<String>,
    /// User-store domain to validate against
    #[arg(long)]
    realm: Option<String>,
    /// Skip the self-registration enabled check
    #[arg(long)]
    skip_signup_check: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

#[tokio::main]
async fn serve(config: AppConfig, cmd: ServeCommand) -> Result<()> {
    let backend =
        IdentityBackend::from_config(&config.identity).context("building identity backend")?;
    let state = AppState::new(backend.into_policy(), config.identity.default_tenant.clone());
    let app = api::create_router(state);

    let bind = cmd.bind.unwrap_or(config.server.bind);
    let port = cmd.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("parsing listen address {bind}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, tenants = config.identity.tenants.len(), "selfreg listening");

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}

fn handle_check(config: &AppConfig, cmd: CheckCommand, json: bool) -> Result<i32> {
    let policy = IdentityBackend::from_config(&config.identity)
        .context("building identity backend")?
        .into_policy();

    let request = check_request(cmd.username, cmd.realm, cmd.skip_signup_check);
    let tenant = cmd
        .tenant
        .unwrap_or_else(|| config.identity.default_tenant.clone());
    run_check(&policy, &tenant, &request, json, &mut io::stdout().lock())
}

fn handle_config(config: &AppConfig, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let body = toml::to_string_pretty(config).context("serializing config to TOML")?;
            print!("{body}");
        }
    }
    Ok(())
}
