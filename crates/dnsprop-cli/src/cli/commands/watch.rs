//! `dnsprop watch` - Repeat a lookup until a change has propagated.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use dnsprop::Summary;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::resolve::NOT_PROPAGATED;
use super::{render, Context};
use crate::cli::args::WatchArgs;
use crate::education::Explain;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: WatchArgs) -> Result<ExitCode> {
    let request = ctx.request(&args.name, &args.record_type, &args.servers)?;

    if ctx.explain {
        Explain::watch(&request.lookup.name, request.record_type.as_str(), &args.expect).print();
    }

    // One dispatcher for every round so the cache spares unexpired answers.
    let dispatcher = ctx.dispatcher();
    let mut round = 0u32;

    loop {
        round += 1;
        let deadline = Instant::now() + ctx.config.request_timeout;
        let results = dispatcher
            .resolve(&request.lookup, &request.servers, Some(deadline))
            .await;
        let summary = Summary::from_results(&results, Some(&args.expect));
        let done = summary.is_propagated();
        let last = args.max_rounds != 0 && round >= args.max_rounds;

        debug!(round, ok = summary.ok, matching = ?summary.matching, done, "watch round");
        if ctx.output_format == OutputFormat::Pretty {
            print_progress(round, &summary);
        }

        if done || last {
            render(&ctx, &request, &results, &summary, Some(&args.expect))?;
            return Ok(if done {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(NOT_PROPAGATED)
            });
        }

        sleep(args.interval).await;
    }
}

fn print_progress(round: u32, summary: &Summary) {
    let matching = summary.matching.unwrap_or(0);
    let line = format!(
        "round {round}: {matching}/{} responding resolvers match, {} not responding",
        summary.ok,
        summary.total - summary.ok
    );
    if summary.is_propagated() {
        println!("{}", line.green());
    } else {
        println!("{}", line.dimmed());
    }
}
