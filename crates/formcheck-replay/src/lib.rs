//! Replay of recorded session streams.
//!
//! Input is JSON lines of client messages (`frame` and `reset`). Every
//! accepted line produces one server message on the output, followed by a
//! final `summary` message.

pub mod config;
pub mod error;

pub use config::ReplayConfig;
pub use error::{ReplayError, ReplayResult};

use formcheck_core::{analyzer_for, Session};
use formcheck_models::{ClientMessage, ServerMessage};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Line counts for one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Lines read, including blank and malformed ones
    pub lines: u64,
    /// Server messages written, excluding the summary
    pub replies: u64,
    pub skipped: u64,
    pub stale: u64,
}

/// Build the session described by `config`.
pub fn open_session(config: &ReplayConfig) -> ReplayResult<Session> {
    let analyzer = analyzer_for(&config.exercise, config.analyzer.clone())?;
    Ok(Session::new(analyzer))
}

/// Feed every message from `reader` through `session` and write the replies
/// to `writer` as JSON lines.
pub async fn replay<R, W>(reader: R, mut writer: W, session: &mut Session) -> ReplayResult<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<ClientMessage>(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(line = stats.lines, error = %e, "Skipping malformed message");
                stats.skipped += 1;
                continue;
            }
        };

        let reply = session.handle(message);
        if matches!(reply, ServerMessage::Stale { .. }) {
            stats.stale += 1;
        }
        write_message(&mut writer, &reply).await?;
        stats.replies += 1;
    }

    write_message(&mut writer, &session.summary_message()).await?;
    writer.flush().await?;
    debug!(?stats, "Replay finished");
    Ok(stats)
}

/// Replay a JSON-lines file.
pub async fn replay_file<W>(
    path: impl AsRef<Path>,
    writer: W,
    session: &mut Session,
) -> ReplayResult<ReplayStats>
where
    W: AsyncWrite + Unpin,
{
    let file = tokio::fs::File::open(path.as_ref()).await?;
    replay(BufReader::new(file), writer, session).await
}

async fn write_message<W>(writer: &mut W, message: &ServerMessage) -> ReplayResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_vec(message)?;
    json.push(b'\n');
    writer.write_all(&json).await?;
    Ok(())
}
