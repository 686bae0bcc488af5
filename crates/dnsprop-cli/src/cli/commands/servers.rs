//! `dnsprop servers` - The built-in resolver directory.

use anyhow::Result;
use colored::Colorize;
use dnsprop::geo::{self, KnownResolver};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::education::Explain;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ServerEntry {
    address: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
    configured: bool,
}

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lon")]
    longitude: String,
}

pub fn execute(ctx: &Context) -> Result<()> {
    if ctx.explain {
        Explain::servers().print();
    }

    let entries: Vec<ServerEntry> = geo::DIRECTORY
        .iter()
        .map(|r: &KnownResolver| ServerEntry {
            address: r.address,
            region: r.region,
            latitude: r.latitude,
            longitude: r.longitude,
            configured: ctx.config.resolvers.iter().any(|c| c.trim() == r.address),
        })
        .collect();

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&entries)?);
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(std::io::stdout().lock());
            for entry in &entries {
                csv.serialize(entry)?;
            }
            csv.flush()?;
        }
        OutputFormat::Pretty => {
            let rows: Vec<ServerRow> = entries
                .iter()
                .map(|e| ServerRow {
                    address: if e.configured {
                        e.address.to_string()
                    } else {
                        e.address.dimmed().to_string()
                    },
                    region: e.region.to_string(),
                    latitude: format!("{:.4}", e.latitude),
                    longitude: format!("{:.4}", e.longitude),
                })
                .collect();
            println!("{}", Table::new(&rows).with(Style::rounded()));
            println!();
            println!(
                "{} {} known, {} configured",
                "Resolvers:".bold(),
                entries.len(),
                ctx.config.resolvers.len()
            );
        }
    }

    Ok(())
}
