//! `dnsprop ready` - Readiness probe against the configured resolvers.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use dnsprop::{readiness, Readiness, ResultCache};
use serde::Serialize;
use std::sync::Arc;

use super::Context;
use crate::education::Explain;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ReadyOutput {
    status: Readiness,
}

pub async fn execute(ctx: Context) -> Result<ExitCode> {
    if ctx.explain {
        Explain::ready().print();
    }

    let cache: Arc<dyn ResultCache> = ctx.cache.clone();
    let status = readiness(&ctx.config.resolvers, ctx.config.request_timeout, Some(cache)).await;
    let data = ReadyOutput { status };

    match ctx.output_format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&data)?),
        OutputFormat::Pretty if !status.is_ok() => {
            println!("{}", serde_json::to_string(&data)?.red());
        }
        _ => println!("{}", serde_json::to_string(&data)?),
    }

    if status.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
