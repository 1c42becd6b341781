//! Stdout executor and stderr summary.
//!
//! Stdout carries one JSON object per dispatched order and nothing else,
//! so it can be piped into whatever performs the profile's actions.

use anyhow::Result;
use applier_runtime::{DispatchOrder, ProfileEntry, SequencerReport, TerminalOutcome};
use std::fmt::Write as _;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Writes each order as a JSON line until the dispatcher is dropped.
///
/// Returns the number of orders written.
pub async fn write_orders<W>(mut orders: mpsc::UnboundedReceiver<DispatchOrder>, mut out: W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(order) = orders.recv().await {
        let mut line = serde_json::to_string(&order)?;
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        written += 1;
    }
    Ok(written)
}

/// One-line summary plus a line per request that did not dispatch.
pub fn summary(report: &SequencerReport) -> String {
    let mut applied = 0;
    let mut skipped = 0;
    let mut dropped = 0;
    let mut details = String::new();

    for record in &report.records {
        match &record.outcome {
            TerminalOutcome::Dispatched { .. } => applied += 1,
            TerminalOutcome::Skipped => {
                skipped += 1;
                let _ = writeln!(details, "  {}: skipped", record.request_id);
            }
            TerminalOutcome::DroppedMalformed { reason } => {
                dropped += 1;
                let _ = writeln!(details, "  {}: dropped ({reason})", record.request_id);
            }
            TerminalOutcome::DroppedResolution { code, message } => {
                dropped += 1;
                let _ = writeln!(details, "  {}: dropped [{code}] {message}", record.request_id);
            }
        }
    }

    format!("applied {applied}, skipped {skipped}, dropped {dropped}\n{details}")
}

/// Tab-separated `id name state` lines for `--list`.
pub fn profile_table(entries: &[ProfileEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let state = e.default_state.map_or("-", |s| s.as_str());
            format!("{}\t{}\t{}\n", e.id, e.name, state)
        })
        .collect()
}
