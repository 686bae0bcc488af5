//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use args::{Cli, Commands, LogFormat};
use clap::Parser;
use dnsprop::LruResultCache;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = apply_overrides(Config::load_from(&config_path)?, &cli);

    init_logging(cli.verbose, &config.log_level, cli.log_format);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // `config` stays usable so invalid settings can be inspected and replaced.
    if !matches!(cli.command, Commands::Config(_)) {
        config.validate()?;
    }

    let ctx = commands::Context {
        output_format: cli.output.or(config.output_format).unwrap_or_default(),
        explain: cli.explain || config.explain_by_default,
        verbose: cli.verbose,
        cache: Arc::new(LruResultCache::new(
            config.cache_max_entries,
            config.cache_ttl,
        )),
        config,
        config_path,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(ctx, args).await,
        Commands::Watch(args) => commands::watch::execute(ctx, args).await,
        Commands::Ready => commands::ready::execute(ctx).await,
        Commands::Servers => commands::servers::execute(&ctx).map(|()| ExitCode::SUCCESS),
        Commands::Config(args) => commands::config::execute(&ctx, args).map(|()| ExitCode::SUCCESS),
    }
}

/// Layer flags and environment variables over file settings.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(resolvers) = &cli.resolvers {
        config.resolvers.clone_from(resolvers);
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout = timeout;
    }
    if cli.dnssec {
        config.enable_dnssec = true;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_ttl = ttl;
    }
    if let Some(entries) = cli.cache_max_entries {
        config.cache_max_entries = entries;
    }
    if let Some(max) = cli.max_servers {
        config.max_servers = max;
    }
    if let Some(level) = &cli.log_level {
        config.log_level.clone_from(level);
    }
    config
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `--verbose`, which wins over the configured level.
fn init_logging(verbose: bool, level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };
}
