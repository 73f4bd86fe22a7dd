//! Correction execution

use std::time::Duration;

use dns_reconciler_provider::ZoneProvider;

use crate::error::{CoreError, CoreResult};
use crate::types::{ApplyReport, Correction, CorrectionAction, CorrectionFailure, RecordKey};

enum Outcome {
    Applied(usize),
    Failed(usize, CoreError),
    Skipped(usize),
}

/// Plan indexes grouped by correction key, in first-seen order.
fn group_by_key(corrections: &[Correction]) -> Vec<(&RecordKey, Vec<usize>)> {
    let mut groups: Vec<(&RecordKey, Vec<usize>)> = Vec::new();
    for (index, correction) in corrections.iter().enumerate() {
        match groups.iter_mut().find(|(key, _)| *key == &correction.key) {
            Some((_, indexes)) => indexes.push(index),
            None => groups.push((&correction.key, vec![index])),
        }
    }
    groups
}

async fn execute(
    provider: &dyn ZoneProvider,
    zone: &str,
    correction: &Correction,
    action_timeout: Duration,
) -> CoreResult<()> {
    let action = async {
        match &correction.action {
            CorrectionAction::Delete { remote_id, .. } => {
                provider.delete_record_set(zone, remote_id).await
            }
            CorrectionAction::Upsert { record_set } => {
                provider.upsert_record_set(zone, record_set).await
            }
        }
    };

    match tokio::time::timeout(action_timeout, action).await {
        Ok(result) => result.map_err(CoreError::from),
        Err(_) => Err(CoreError::Timeout {
            key: correction.key.to_string(),
            seconds: action_timeout.as_secs(),
        }),
    }
}

/// Run one key's corrections in order, stopping at the first failure.
async fn run_group(
    provider: &dyn ZoneProvider,
    zone: &str,
    corrections: &[Correction],
    indexes: &[usize],
    action_timeout: Duration,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(indexes.len());
    let mut failed = false;

    for &index in indexes {
        if failed {
            outcomes.push(Outcome::Skipped(index));
            continue;
        }

        let correction = &corrections[index];
        match execute(provider, zone, correction, action_timeout).await {
            Ok(()) => {
                log::info!("[{zone}] {correction}");
                outcomes.push(Outcome::Applied(index));
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[{zone}] {correction} failed: {e}");
                } else {
                    log::error!("[{zone}] {correction} failed: {e}");
                }
                failed = true;
                outcomes.push(Outcome::Failed(index, e));
            }
        }
    }

    outcomes
}

/// Execute corrections against `zone`.
///
/// Corrections sharing a key run sequentially in plan order; distinct keys run
/// concurrently. Each action is bounded by `action_timeout`. A failure stops
/// the rest of its key's corrections, which are reported as skipped. Nothing
/// is rolled back.
pub async fn apply_corrections(
    provider: &dyn ZoneProvider,
    zone: &str,
    corrections: &[Correction],
    action_timeout: Duration,
) -> ApplyReport {
    let groups = group_by_key(corrections);
    log::debug!(
        "[{zone}] Applying {} correction(s) in {} group(s)",
        corrections.len(),
        groups.len()
    );

    let runs = groups.iter().map(|(_, indexes)| {
        run_group(provider, zone, corrections, indexes, action_timeout)
    });
    let results = futures::future::join_all(runs).await;

    let mut report = ApplyReport::default();
    for outcome in results.into_iter().flatten() {
        match outcome {
            Outcome::Applied(index) => report.applied.push(index),
            Outcome::Skipped(index) => report.skipped.push(index),
            Outcome::Failed(index, error) => {
                let correction = &corrections[index];
                report.failures.push(CorrectionFailure {
                    index,
                    key: correction.key.clone(),
                    msg: correction.msg.clone(),
                    error,
                });
            }
        }
    }
    report.applied.sort_unstable();
    report.skipped.sort_unstable();
    report.failures.sort_by_key(|f| f.index);

    report
}
