//! lldap-sync - LLDAP user listing
//!
//! Logs in to an LLDAP server, fetches every user with their groups over
//! GraphQL and prints them to stdout.

#![deny(clippy::all)]

mod auth;
mod cancel;
mod config;
mod directory;
mod error;
mod graphql;

use std::io::Write;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use auth::Session;
use cancel::CancellationToken;
use config::Config;
use directory::UsersResult;
use error::AppError;
use graphql::GraphQlClient;

fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        // .env file is optional - only report if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            let err = AppError::Config(e);
            eprintln!("{}", err);
            eprintln!("\nPlease set the following environment variables:");
            eprintln!("  LLDAP_URL=<https://your-lldap-server>");
            eprintln!("  LLDAP_USERNAME=<admin user>");
            eprintln!("  LLDAP_PASSWORD=<admin password> (or LLDAP_TOKEN=<bearer token>)");
            std::process::exit(err.exit_code());
        }
    };

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let err = AppError::Runtime(e);
            error!("{}", err);
            std::process::exit(err.exit_code());
        }
    };

    let cancel = CancellationToken::new();

    let exit_code = runtime.block_on(async {
        tokio::spawn(cancel_on_signal(cancel.clone()));

        let stdout = std::io::stdout();
        match run(&config, &cancel, &mut stdout.lock()).await {
            Ok(()) => 0,
            Err(e) => {
                if e.is_cancelled() {
                    warn!("Interrupted before the request completed");
                } else {
                    error!("{}", e);
                }
                eprintln!("Error: {}\n{}", e, e.user_message());
                e.exit_code()
            }
        }
    });

    std::process::exit(exit_code);
}

/// Initialize tracing/logging.
///
/// Logs go to stderr so stdout carries only the user listing.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Log in, fetch every user and write them to `out`, one per line.
async fn run(
    config: &Config,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let session = match config.lldap.pre_issued_token() {
        Some(token) => {
            info!("Using pre-issued token, skipping login");
            Session::with_token(&config.lldap.url, token)?
        }
        None => {
            Session::login(
                &config.lldap.url,
                &config.lldap.username,
                &config.lldap.password,
                cancel,
            )
            .await?
        }
    };

    let client = GraphQlClient::new(session);
    info!("Querying {}", client.session().endpoint());

    let result = client.fetch_all_users(cancel).await?;

    // Broken pipe (e.g. piped into `head`) is not an error worth reporting
    if let Err(e) = print_users(&result, out) {
        debug!("Stopped writing users: {}", e);
    }

    Ok(())
}

fn print_users(result: &UsersResult, out: &mut impl Write) -> std::io::Result<()> {
    for user in &result.users {
        writeln!(out, "{}", user)?;
    }
    out.flush()
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received interrupt"),
            _ = terminate.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Received interrupt");
    }

    token.cancel();
}
