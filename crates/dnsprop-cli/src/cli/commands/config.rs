//! `dnsprop config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::education::Explain;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    if ctx.explain {
        Explain::config().print();
    }

    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => init_config(ctx, force),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(config)?);
        }
        _ => {
            println!("{}", "Current Configuration:".bold());
            println!();
            println!(
                "  {} {} ({})",
                "resolvers:".bold(),
                config.resolvers.len(),
                config.resolvers.join(", ").dimmed()
            );
            println!(
                "  {} {}",
                "request_timeout:".bold(),
                humantime::format_duration(config.request_timeout)
            );
            println!("  {} {}", "enable_dnssec:".bold(), config.enable_dnssec);
            println!(
                "  {} {}",
                "cache_ttl:".bold(),
                humantime::format_duration(config.cache_ttl)
            );
            println!("  {} {}", "cache_max_entries:".bold(), config.cache_max_entries);
            println!("  {} {}", "max_servers:".bold(), config.max_servers);
            println!("  {} {}", "log_level:".bold(), config.log_level);
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!("  {} {}", "explain_by_default:".bold(), config.explain_by_default);

            if let Err(e) = config.validate() {
                println!();
                println!("{} {e}", "Warning:".yellow().bold());
            }
        }
    }

    Ok(())
}

fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let path = &ctx.config_path;
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}\n\
             Use --force to overwrite it.",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    println!("{} Wrote {}", "Success:".green().bold(), path.display());
    Ok(())
}
