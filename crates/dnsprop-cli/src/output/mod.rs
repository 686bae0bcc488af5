//! Output formatting for different formats.

use std::io;

use chrono::SecondsFormat;
use clap::ValueEnum;
use dnsprop::ResolveResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, csv, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// One CSV row per resolver; answers joined with `;`.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    server: &'a str,
    region: &'a str,
    latitude: f64,
    longitude: f64,
    status: &'a str,
    rtt_ms: f64,
    answers: String,
    min_ttl: Option<u32>,
    authority: String,
    ad: bool,
    when: String,
}

/// Write results as CSV with a header row.
pub fn write_results_csv<W: io::Write>(writer: W, results: &[ResolveResult]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for r in results {
        csv.serialize(CsvRow {
            server: &r.server,
            region: &r.region,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status.as_str(),
            rtt_ms: r.rtt_ms,
            answers: r
                .answers
                .iter()
                .map(|a| a.value.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            min_ttl: r.answers.iter().map(|a| a.ttl).min(),
            authority: r.authority.join(";"),
            ad: r.authenticated_data,
            when: r.when.to_rfc3339_opts(SecondsFormat::Secs, true),
        })?;
    }
    csv.flush()?;
    Ok(())
}
