//! `dnsprop resolve` - One propagation check across every resolver.

use std::process::ExitCode;

use anyhow::Result;
use dnsprop::Summary;
use tokio::time::Instant;
use tracing::info;

use super::{render, Context};
use crate::cli::args::ResolveArgs;
use crate::education::Explain;

/// Exit code when `--expect` was given and propagation is incomplete
pub const NOT_PROPAGATED: u8 = 2;

pub async fn execute(ctx: Context, args: ResolveArgs) -> Result<ExitCode> {
    let request = ctx.request(&args.name, &args.record_type, &args.servers)?;

    if ctx.explain {
        Explain::resolve(
            &request.lookup.name,
            request.record_type.as_str(),
            request.servers.len(),
        )
        .print();
    }

    let started = Instant::now();
    let deadline = started + ctx.config.request_timeout;
    let results = ctx
        .dispatcher()
        .resolve(&request.lookup, &request.servers, Some(deadline))
        .await;

    let summary = Summary::from_results(&results, args.expect.as_deref());
    info!(
        name = %request.lookup.name,
        qtype = %request.record_type,
        servers = request.servers.len(),
        ok = summary.ok,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "lookup finished"
    );

    render(&ctx, &request, &results, &summary, args.expect.as_deref())?;

    if args.expect.is_some() && !summary.is_propagated() {
        return Ok(ExitCode::from(NOT_PROPAGATED));
    }
    Ok(ExitCode::SUCCESS)
}
