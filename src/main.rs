use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitcc::github::normalize_user;
use gitcc::{Config, ConsoleReporter, Error, GitHubClient, SyncEngine};

#[derive(Parser)]
#[command(name = "gitcc")]
#[command(about = "Clone all github repositories for a given user")]
#[command(override_usage = "gitcc [-l LANGUAGE] user")]
#[command(version)]
struct Cli {
    /// GitHub user whose repositories are synced (a leading "github.com/" is ignored)
    user: Option<String>,

    /// Filter retrieved repos by LANGUAGE
    #[arg(short, long, value_name = "LANGUAGE")]
    language: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let Some(user) = cli.user.as_deref().filter(|u| !u.is_empty()) else {
        return print_help();
    };

    let config = match Config::from_env(cli.language.clone()) {
        Ok(config) => config,
        Err(Error::MissingBaseDirectory(var)) => {
            debug!("{} is not set, nothing to do", var);
            return print_help();
        }
        Err(e) => return Err(e.into()),
    };

    let user = normalize_user(user);
    info!("Starting gitcc v{}", env!("CARGO_PKG_VERSION"));
    println!("Fetching all github repos for user: {}", user);

    let client = GitHubClient::new(&config).context("Failed to create GitHub client")?;
    let repositories = client
        .list_user_repositories(user)
        .await
        .with_context(|| format!("Failed to list repositories for {}", user))?;

    let engine = SyncEngine::new(config);
    let mut reporter = ConsoleReporter::stdout();
    engine.sync(user, repositories, &mut reporter).await;

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr; stdout carries the per-repository status lines.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

/// Missing input is not an error: show usage and do nothing
fn print_help() -> Result<()> {
    Cli::command()
        .print_help()
        .context("Failed to print help")?;
    println!();
    Ok(())
}
