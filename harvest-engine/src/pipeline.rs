//! Pipeline orchestrator: transactions in, records and sessions out.
//!
//! Single-threaded and strictly in input order; `source_entry` indices
//! and progress reporting both depend on positional order, and sequential
//! accumulation keeps reruns byte-identical.

use chrono::Duration;

use harvest_core::{ChatSession, ChatTurn, HarvestConfig, ResponseRenderer, Transaction};

use crate::subsystems::{cluster, decode, dedup::TurnAccumulator, extract::ExtractContext, scan};

/// Progress log cadence, in entries.
const PROGRESS_INTERVAL: usize = 100;

/// Counters from one recovery run.
#[derive(Debug, Clone, Default)]
pub struct RecoveryReport {
    pub entries_processed: usize,
    pub payloads_decoded: usize,
    pub turns_extracted: usize,
    pub duplicates_dropped: usize,
    pub records_recovered: usize,
    pub sessions_built: usize,
}

/// Everything a recovery run produces.
#[derive(Debug, Clone)]
pub struct RecoveryResult {
    /// Deduplicated turns in discovery order.
    pub records: Vec<ChatTurn>,
    /// The same turns, chronologically sorted and clustered.
    pub sessions: Vec<ChatSession>,
    pub report: RecoveryReport,
}

/// Run the full reconstruction pipeline over `transactions`.
///
/// Every per-transaction failure is absorbed locally; a malformed entry
/// among thousands never aborts the batch.
pub fn run_pipeline(
    transactions: &[Transaction],
    config: &HarvestConfig,
    renderer: &dyn ResponseRenderer,
) -> RecoveryResult {
    let mut accumulator = TurnAccumulator::new();
    let mut report = RecoveryReport::default();

    for (index, transaction) in transactions.iter().enumerate() {
        report.entries_processed += 1;

        if let Some(payload) = decode::decode_body(transaction) {
            report.payloads_decoded += 1;

            let ctx = ExtractContext {
                source_entry: index,
                session_hint: transaction.session_hint.as_deref(),
                renderer,
            };

            let kind = transaction.content_kind.to_ascii_lowercase();
            let turns = if kind.contains("json") {
                scan::scan_payload(&payload, &ctx)
            } else if kind.contains("html") {
                scan::scan_html(&payload, &ctx)
            } else {
                Vec::new()
            };

            report.turns_extracted += turns.len();
            for turn in turns {
                if !accumulator.insert(turn) {
                    report.duplicates_dropped += 1;
                }
            }
        }

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Processed {}/{} entries, {} records so far",
                index + 1,
                transactions.len(),
                accumulator.len()
            );
        }
    }

    let records = accumulator.into_turns();
    report.records_recovered = records.len();

    let gap = Duration::seconds(config.clustering.session_gap_seconds as i64);
    let sessions = cluster::cluster_sessions(records.clone(), gap);
    report.sessions_built = sessions.len();

    tracing::info!(
        "Recovery complete: {} records in {} sessions from {} entries ({} duplicates dropped)",
        report.records_recovered,
        report.sessions_built,
        report.entries_processed,
        report.duplicates_dropped
    );

    RecoveryResult {
        records,
        sessions,
        report,
    }
}
