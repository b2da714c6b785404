//! `stride-tui` — interactive terminal console for a running-club server.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `stride-core`'s store. Screens are navigable via number keys (1-4):
//! Members, Records, Groups, and Settings.
//!
//! Logs are written to a file (default `/tmp/stride-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! state snapshots from the console store into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stride_core::{ClientConfig, Console, TlsVerification};

use crate::app::App;

/// Interactive terminal console for running-club administration.
#[derive(Parser, Debug)]
#[command(name = "stride-tui", version, about)]
struct Cli {
    /// Configuration profile to use
    #[arg(short = 'p', long, env = "STRIDE_PROFILE")]
    profile: Option<String>,

    /// Server URL (e.g., https://club.example.org); bypasses the config file
    #[arg(short = 's', long, env = "STRIDE_SERVER")]
    server: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "STRIDE_API_TOKEN")]
    api_token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, env = "STRIDE_INSECURE")]
    insecure: bool,

    /// Log file path (defaults to /tmp/stride-tui.log)
    #[arg(long, default_value = "/tmp/stride-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stride_tui={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("stride-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Connection settings from CLI flags alone, when `--server` is given.
fn client_config_from_flags(cli: &Cli) -> Result<Option<ClientConfig>> {
    let Some(ref server) = cli.server else {
        return Ok(None);
    };
    let url = server
        .parse()
        .map_err(|_| eyre!("invalid server URL: {server}"))?;

    Ok(Some(ClientConfig {
        url,
        token: cli.api_token.clone().map(SecretString::from),
        tls: if cli.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: Duration::from_secs(30),
        ..ClientConfig::default()
    }))
}

/// Connection settings from the shared config file.
fn client_config_from_file(cli: &Cli) -> Result<ClientConfig> {
    let cfg = stride_config::load_config_or_default();
    let (name, profile) = stride_config::select_profile(&cfg, cli.profile.as_deref())?;
    let mut client = stride_config::profile_to_client_config(profile, &name, &cfg.defaults)?;

    if let Some(ref token) = cli.api_token {
        client.token = Some(SecretString::from(token.clone()));
    }
    if cli.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal.
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit.
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > config file. Fail before touching the
    // terminal so the message stays readable.
    let client = match client_config_from_flags(&cli)? {
        Some(client) => client,
        None => client_config_from_file(&cli)?,
    };

    info!(server = %client.url, "starting stride-tui");

    let console = Console::new(client)?;
    App::new(console).run().await?;

    Ok(())
}
