use crate::collect::collect_members;
use crate::config::RunConfig;
use crate::export::export_members;
use crate::source::{GroupEntity, MembershipSource, SourceError};
use anyhow::{Context, Result as AnyhowResult};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Stages a run passes through, in order.
///
/// `Disconnected` is the terminal stage on every path; resolution failures
/// jump straight to it, skipping enumeration and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Connecting,
    Resolving,
    Enumerating,
    Exporting,
    Disconnected,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::Connecting => "connecting",
            RunStage::Resolving => "resolving",
            RunStage::Enumerating => "enumerating",
            RunStage::Exporting => "exporting",
            RunStage::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// What a run accomplished, for the closing log line.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// The resolved group, when resolution succeeded.
    pub group: Option<GroupEntity>,
    /// Number of records collected before enumeration ended.
    pub collected: usize,
    /// Path of the output file, when one was written.
    pub output: Option<PathBuf>,
}

/// Executes one full export run against a membership source.
///
/// Every error is logged and contained here; the session is disconnected on
/// every exit path and the function always returns a summary. No error is
/// propagated to the caller, matching a process whose only reporting channel
/// is its logs.
///
/// # Arguments
///
/// * `source` - The membership source to run against; connected and
///   disconnected by this function.
/// * `config` - Credentials and the target group reference.
/// * `out_dir` - Directory the output file is placed in.
pub async fn run_pipeline(
    source: &mut dyn MembershipSource,
    config: &RunConfig,
    out_dir: &Path,
) -> RunSummary {
    let mut summary = RunSummary::default();
    enter(RunStage::Idle);

    if let Err(e) = execute(source, config, out_dir, &mut summary).await {
        error!("Run failed: {:#}", e);
    }

    if let Err(e) = source.disconnect().await {
        warn!("Session shutdown reported an error: {}", e);
    }
    enter(RunStage::Disconnected);
    info!("Disconnected from the platform");
    summary
}

/// The fallible stages of a run, separated so the caller can guarantee the
/// disconnect regardless of where this unwinds.
async fn execute(
    source: &mut dyn MembershipSource,
    config: &RunConfig,
    out_dir: &Path,
    summary: &mut RunSummary,
) -> AnyhowResult<()> {
    enter(RunStage::Connecting);
    info!("Connecting to the platform...");
    source.connect().await.context("could not start a session")?;

    enter(RunStage::Resolving);
    info!("Resolving group reference...");
    let group = match source.resolve(&config.group_ref).await {
        Ok(group) => {
            info!("Group: {} (ID: {})", group.title, group.id);
            group
        }
        Err(SourceError::NotFound(reference)) => {
            error!("Could not find group: {}", reference);
            return Ok(());
        }
        Err(SourceError::AccessDenied) => {
            error!("Group is private or you have no access");
            return Ok(());
        }
        Err(e) => return Err(e).context("could not resolve the group reference"),
    };

    enter(RunStage::Enumerating);
    info!("Starting member enumeration...");
    let records = collect_members(&*source, &group).await;
    summary.collected = records.len();

    enter(RunStage::Exporting);
    summary.output = export_members(&records, &group.title, out_dir);
    summary.group = Some(group);
    Ok(())
}

fn enter(stage: RunStage) {
    debug!("Run stage: {}", stage);
}
