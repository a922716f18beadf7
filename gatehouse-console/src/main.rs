//! `gatehouse` admin console binary.

mod cli;
mod command;
mod prompt;
mod render;
mod shell;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gatehouse_config::{ConfigLoader, ConsoleConfig, PreferenceStore};
use gatehouse_core::{AuthCrypto, EntityStore, SeedAccount};
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;
use crate::prompt::HiddenPrompt;
use crate::shell::Shell;

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_store(config: &ConsoleConfig) -> Result<EntityStore> {
    let argon2 = config.auth.argon2;
    let hasher = AuthCrypto::with_cost(
        &config.auth.password_pepper,
        argon2.memory_kib,
        argon2.iterations,
        argon2.parallelism,
    )
    .context("invalid credential hashing settings")?;

    let seed = SeedAccount {
        name: config.seed.name.clone(),
        email: config.seed.email.clone(),
        password: config.seed.password.clone(),
    };
    let store = EntityStore::bootstrap(Arc::new(hasher), seed)
        .await
        .context("failed to install the seed administrator")?;
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let load = ConfigLoader::new()
        .with_options(args.loader_options())
        .load()
        .context("failed to load configuration")?;
    for warning in load.warnings.iter() {
        warn!("{warning}");
    }
    let config = load.config;
    info!(
        dev_mode = config.dev_mode,
        config_path = ?config.metadata.config_path,
        env_file_loaded = config.metadata.env_file_loaded,
        "configuration loaded"
    );

    let store = open_store(&config).await?;
    let preferences = PreferenceStore::new(config.preferences.dir.clone());

    let shell = Shell::new(store, preferences, std::io::stdout());
    let outcome = if std::io::stdin().is_terminal() {
        let mut editor = prompt::line_editor()
            .context("failed to open the line editor")?;
        let mut shell = shell.with_secret_prompt(HiddenPrompt);
        shell.run_interactive(&mut editor).await
    } else {
        let mut shell = shell;
        shell.run(BufReader::new(tokio::io::stdin())).await
    };
    if let Err(err) = outcome {
        error!(error = %err, "console stopped");
        return Err(err);
    }
    Ok(())
}
