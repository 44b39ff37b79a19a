//! Group Roster: Enumerate a Messaging Group and Export the Roster
//!
//! This binary runs one export pass against a messaging platform gateway:
//! it starts an authenticated session, resolves a group link or handle to a
//! concrete entity, enumerates the group's member list, and writes the
//! collected records to a spreadsheet workbook in the current directory
//! (falling back to UTF-8 CSV if the workbook cannot be written).
//!
//! ## Design Overview
//! - **Connecting/Resolving**: The `source` module talks to the platform
//!   gateway and maps its responses onto the pipeline's error taxonomy.
//! - **Enumerating**: The `collect` module drives the lazy member stream,
//!   skipping broken entries and honoring rate-limit waits.
//! - **Exporting**: The `export` module writes the workbook and, on
//!   failure, the delimited fallback.
//! - **Orchestration**: The `run` module sequences the stages and releases
//!   the session on every exit path.
//!
//! ## Usage
//! Run the binary and answer the four prompts (API id, API hash, phone
//! number, group link or handle):
//! ```sh
//! cargo run --release
//! ```
//! Logs go to the console and to `group_roster.log` in the current
//! directory; the level can be adjusted with `RUST_LOG`:
//! ```sh
//! export RUST_LOG=debug
//! cargo run --release
//! ```
//! The process always ends normally after the session is released, even
//! when the run only produced partial results; outcomes are reported
//! through the logs rather than an exit code.

use group_roster::config::RunConfig;
use group_roster::logging;
use group_roster::run::run_pipeline;
use group_roster::source::{GatewaySource, DEFAULT_GATEWAY_URL};
use std::path::Path;
use tracing::{error, info};

/// Log file written next to the exported roster.
const LOG_FILE: &str = "group_roster.log";

#[tokio::main]
async fn main() {
  // Keep the guard alive for the whole run so file logs are flushed.
  let _guard = match logging::init(Path::new("."), LOG_FILE) {
    Ok(guard) => guard,
    Err(e) => {
      eprintln!("Could not initialize logging: {:#}", e);
      return;
    }
  };

  // Configuration is acquired before any network activity; an unusable
  // value (e.g. a non-numeric API id) ends the run here.
  let config = match RunConfig::interactive() {
    Ok(config) => config,
    Err(e) => {
      error!("Invalid configuration: {:#}", e);
      return;
    }
  };

  let mut source = GatewaySource::new(
    DEFAULT_GATEWAY_URL,
    config.api_id,
    &config.api_hash,
    &config.phone,
  );
  let summary = run_pipeline(&mut source, &config, Path::new(".")).await;

  match summary.output {
    Some(path) => info!(
      "Run complete: {} member(s) exported to {}",
      summary.collected,
      path.display()
    ),
    None => info!("Run complete: no output file was written"),
  }
}
