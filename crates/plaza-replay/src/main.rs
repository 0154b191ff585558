use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use plaza_feed::{FeedConfig, NotificationHub, replay_lines};

/// Replays newline-delimited feed commands (from the file given as the first
/// argument, or stdin) into a notification hub and prints the resulting feed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the final feed
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plaza_replay=debug,plaza_feed=debug,plaza_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = FeedConfig::from_env()?;
    let hub = NotificationHub::new(&config);

    let mut updates = hub.subscribe();
    let logger = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => info!(id = update.notification_id(), "feed update: {:?}", update),
                Err(RecvError::Lagged(skipped)) => warn!("update logger lagged, {} updates skipped", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match std::env::args().nth(1) {
        Some(path) => {
            info!("Replaying feed commands from {}", path);
            Box::new(BufReader::new(File::open(&path).await?))
        }
        None => {
            info!("Replaying feed commands from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let summary = replay_lines(&hub, input).await?;

    let feed = hub.snapshot().await;
    let unread = feed.iter().filter(|r| !r.read).count();
    info!(applied = summary.applied, rejected = summary.rejected, total = feed.len(), unread, "replay finished");

    // Dropping the last hub handle closes the update channel and stops the logger
    drop(hub);
    logger.await?;

    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}
