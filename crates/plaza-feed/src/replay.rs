use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::error::FeedError;
use crate::hub::NotificationHub;

/// Outcome of feeding a stream of JSON commands into a hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Apply newline-delimited JSON commands from `reader` to `hub`.
///
/// Blank lines are skipped. Lines that fail to decode are logged and counted
/// in `rejected`; only a failing reader aborts the replay.
pub async fn replay_lines<R>(hub: &NotificationHub, reader: R) -> Result<ReplaySummary, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match hub.apply_json(line).await {
            Ok(_) => summary.applied += 1,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}
