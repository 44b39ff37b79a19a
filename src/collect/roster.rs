use super::types::MemberRecord;
use crate::source::{GroupEntity, MembershipSource, SourceError};
use futures::StreamExt;
use tracing::{error, info, warn};

/// Progress is reported once per this many collected records.
const PROGRESS_EVERY: usize = 10;

/// Enumerates a group's members and collects export-ready records.
///
/// Drives the source's lazy member stream to the end, building one
/// [`MemberRecord`] per entry. Failures are contained per the pipeline's
/// error taxonomy:
///
/// - an entry that cannot be transformed is logged and skipped;
/// - a rate-limit signal logs the mandated wait, suspends the run for
///   exactly that duration, and then ends enumeration (the collected prefix
///   is still exported);
/// - any other stream error is logged and ends enumeration early.
///
/// # Arguments
///
/// * `source` - The connected membership source.
/// * `group` - The resolved group to enumerate.
///
/// # Returns
///
/// The records collected before enumeration ended, in encounter order. This
/// never fails; a run with partial results proceeds to export.
pub async fn collect_members(
    source: &dyn MembershipSource,
    group: &GroupEntity,
) -> Vec<MemberRecord> {
    let mut records = Vec::new();
    let mut stream = source.members(group);

    while let Some(item) = stream.next().await {
        match item {
            Ok(entry) => match MemberRecord::from_entry(&group.title, &entry) {
                Ok(record) => {
                    records.push(record);
                    if records.len() % PROGRESS_EVERY == 0 {
                        info!("Processed {} members...", records.len());
                    }
                }
                Err(e) => {
                    warn!("Skipping member entry: {}", e);
                }
            },
            Err(SourceError::RateLimited { wait }) => {
                warn!(
                    "Rate limited by the platform, waiting {} second(s)...",
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                break;
            }
            Err(e) => {
                error!("Member enumeration failed: {}", e);
                break;
            }
        }
    }

    records
}
