//! dnsprop - DNS propagation checker
//!
//! Asks many public resolvers the same question and shows what each one says.

use std::process::ExitCode;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dnsprop_cli::run().await
}
