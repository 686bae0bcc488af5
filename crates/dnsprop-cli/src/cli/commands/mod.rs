//! Command implementations.

pub mod config;
pub mod ready;
pub mod resolve;
pub mod servers;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use dnsprop::validate::{dedupe_servers, validate_domain_name, validate_record_type, validate_servers};
use dnsprop::{
    DispatchConfig, Dispatcher, DnspropError, Lookup, LruResultCache, RecordType, ResolveResult,
    Status, Summary,
};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::Config;
use crate::output::{self, OutputFormat};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration (file, environment, and flags merged)
    pub config: Config,

    /// Where the config file lives
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to show educational explanations
    pub explain: bool,

    /// Verbose output
    pub verbose: bool,

    /// Result cache shared by every lookup in this process
    pub cache: Arc<LruResultCache>,
}

/// A validated lookup and the servers to ask.
#[derive(Debug, Clone)]
pub struct Request {
    pub lookup: Lookup,
    pub record_type: RecordType,
    pub servers: Vec<String>,
}

impl Context {
    /// Validate user input and pick the server list.
    ///
    /// An empty `servers` falls back to the configured resolvers.
    pub fn request(
        &self,
        name: &str,
        record_type: &str,
        servers: &[String],
    ) -> dnsprop::Result<Request> {
        let name = validate_domain_name(name)?;
        let record_type = validate_record_type(record_type)?;

        let servers = if servers.is_empty() {
            &self.config.resolvers
        } else {
            servers
        };
        validate_servers(servers, self.config.max_servers)?;
        let servers = dedupe_servers(servers);
        if servers.is_empty() {
            return Err(DnspropError::NoServers);
        }

        Ok(Request {
            lookup: Lookup::new(name, record_type.as_str(), self.config.enable_dnssec),
            record_type,
            servers,
        })
    }

    /// Dispatcher using the request timeout and the shared cache.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(DispatchConfig {
            per_query_timeout: self.config.request_timeout,
            max_cache_ttl: self.config.cache_ttl,
            ..DispatchConfig::default()
        })
        .with_cache(self.cache.clone())
    }
}

/// Machine-readable shape of one fan-out.
#[derive(Debug, Serialize)]
pub struct ResolveOutput<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub results: &'a [ResolveResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a Summary>,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "RTT")]
    rtt: String,
    #[tabled(rename = "Answers")]
    answers: String,
    #[tabled(rename = "TTL")]
    ttl: String,
}

impl ResultRow {
    fn new(r: &ResolveResult, expected: Option<&str>) -> Self {
        let status = match &r.status {
            Status::Ok => "ok".green().to_string(),
            Status::Timeout | Status::Error => r.status.as_str().red().to_string(),
            other => other.as_str().yellow().to_string(),
        };
        let answers = r
            .answers
            .iter()
            .map(|a| match expected {
                Some(e) if a.matches(e) => a.value.green().to_string(),
                _ => a.value.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let answers = if answers.is_empty() {
            r.authority.join("\n").dimmed().to_string()
        } else {
            answers
        };

        Self {
            server: r.server.clone(),
            region: r.region.clone(),
            status,
            rtt: if r.rtt_ms > 0.0 {
                format!("{:.1}ms", r.rtt_ms)
            } else {
                "-".to_string()
            },
            answers,
            ttl: r
                .answers
                .iter()
                .map(|a| a.ttl)
                .min()
                .map_or_else(|| "-".to_string(), |ttl| ttl.to_string()),
        }
    }
}

/// Sort for display: by region, then server.
fn sorted(results: &[ResolveResult]) -> Vec<ResolveResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| a.region.cmp(&b.region).then_with(|| a.server.cmp(&b.server)));
    sorted
}

/// Render one fan-out in the selected format.
pub fn render(
    ctx: &Context,
    request: &Request,
    results: &[ResolveResult],
    summary: &Summary,
    expected: Option<&str>,
) -> anyhow::Result<()> {
    let results = sorted(results);
    let data = ResolveOutput {
        name: &request.lookup.name,
        record_type: request.record_type.as_str(),
        results: &results,
        summary: expected.map(|_| summary),
    };

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&data)?);
        }
        OutputFormat::Csv => {
            output::write_results_csv(std::io::stdout().lock(), &results)?;
        }
        OutputFormat::Pretty => {
            print_pretty(request, &results, summary, expected);
        }
    }

    Ok(())
}

fn print_pretty(
    request: &Request,
    results: &[ResolveResult],
    summary: &Summary,
    expected: Option<&str>,
) {
    println!(
        "{} {} {}",
        "Lookup:".bold(),
        request.lookup.name.cyan(),
        request.record_type.as_str().yellow()
    );
    if request.lookup.dnssec {
        println!("{} requested", "DNSSEC:".bold());
    }
    println!();

    let rows: Vec<ResultRow> = results.iter().map(|r| ResultRow::new(r, expected)).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();

    let statuses = summary
        .by_status
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} {} ({})", "Resolvers:".bold(), summary.total, statuses);

    match (expected, summary.matching) {
        (Some(expected), Some(matching)) => {
            let line = format!(
                "propagated on {matching}/{} responding resolvers",
                summary.ok
            );
            let line = if summary.is_propagated() {
                line.green()
            } else {
                line.yellow()
            };
            println!("{} {} {}", "Expected:".bold(), expected.cyan(), line);
        }
        _ => {
            if summary.distinct_answer_sets > 1 {
                println!(
                    "{}",
                    format!(
                        "Resolvers disagree: {} different answer sets",
                        summary.distinct_answer_sets
                    )
                    .yellow()
                );
            }
        }
    }

    let validated = results.iter().filter(|r| r.authenticated_data).count();
    if validated > 0 {
        println!(
            "{} {validated} resolvers set the AD (authenticated data) flag",
            "DNSSEC:".bold()
        );
    }
}
