//! Command-line argument definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// DNS propagation checker
///
/// Asks many public resolvers around the world the same question at once
/// and shows what each of them answers.
/// Use --explain on any command to learn what it does.
#[derive(Parser, Debug)]
#[command(name = "dnsprop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does (educational mode)
    #[arg(long, global = true)]
    pub explain: bool,

    /// Increase verbosity (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "DNSPROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request deadline and per-query timeout (e.g. 2s, 1500ms)
    #[arg(long, global = true, env = "REQUEST_TIMEOUT", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Request DNSSEC records (EDNS0 DO bit)
    #[arg(long, global = true, env = "ENABLE_DNSSEC", value_parser = BoolishValueParser::new())]
    pub dnssec: bool,

    /// Cache expiry and cap on cached answer TTLs (e.g. 30s)
    #[arg(long, global = true, env = "CACHE_TTL", value_parser = humantime::parse_duration)]
    pub cache_ttl: Option<Duration>,

    /// Maximum number of cached results
    #[arg(long, global = true, env = "CACHE_MAX_ENTRIES")]
    pub cache_max_entries: Option<u64>,

    /// Default resolvers, comma-separated
    #[arg(long, global = true, env = "RESOLVERS", value_delimiter = ',')]
    pub resolvers: Option<Vec<String>>,

    /// Maximum number of servers per lookup
    #[arg(long, global = true, env = "MAX_SERVERS")]
    pub max_servers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query every resolver once and show the answers
    Resolve(ResolveArgs),

    /// Re-query until every resolver reports the expected value
    Watch(WatchArgs),

    /// Check that at least one resolver is reachable
    Ready,

    /// List known resolvers with their regions
    Servers,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Resolve command
// ============================================================================

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Domain name to look up (internationalized names are accepted)
    pub name: String,

    /// Record type: A, AAAA, CNAME, TXT, MX, NS, SOA
    #[arg(short = 't', long = "type", default_value = "A")]
    pub record_type: String,

    /// Resolver to ask instead of the configured list (repeatable)
    #[arg(short, long = "server")]
    pub servers: Vec<String>,

    /// Value every resolver should return once propagation is complete
    #[arg(short, long)]
    pub expect: Option<String>,
}

// ============================================================================
// Watch command
// ============================================================================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Domain name to watch
    pub name: String,

    /// Record type: A, AAAA, CNAME, TXT, MX, NS, SOA
    #[arg(short = 't', long = "type", default_value = "A")]
    pub record_type: String,

    /// Resolver to ask instead of the configured list (repeatable)
    #[arg(short, long = "server")]
    pub servers: Vec<String>,

    /// Value every resolver should return once propagation is complete
    #[arg(short, long)]
    pub expect: String,

    /// Pause between rounds
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// Give up after this many rounds (0 = never)
    #[arg(short, long, default_value = "0")]
    pub max_rounds: u32,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
