//! Session replay binary.
//!
//! Usage: `formcheck-replay [INPUT]`. Reads JSON-lines client messages from
//! INPUT or stdin and writes server messages to stdout. Logs go to stderr.

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use formcheck_replay::{open_session, replay, replay_file, ReplayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ReplayConfig::from_env();
    init_tracing(config.log_json)?;

    let prometheus = if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    info!(exercise = %config.exercise, "Starting formcheck-replay");

    let mut session = open_session(&config).context("Invalid analyzer configuration")?;

    let stats = match std::env::args().nth(1) {
        Some(path) => replay_file(&path, stdout(), &mut session)
            .await
            .with_context(|| format!("Failed to replay {}", path))?,
        None => replay(BufReader::new(stdin()), stdout(), &mut session).await?,
    };

    let summary = session.summary();
    info!(
        session_id = %session.id(),
        valid_reps = summary.valid_reps,
        invalid_reps = summary.invalid_reps,
        discarded_reps = summary.discarded_reps,
        most_common_issue = ?summary.most_common_issue(),
        lines = stats.lines,
        skipped = stats.skipped,
        stale = stats.stale,
        "Replay complete"
    );
    if stats.skipped > 0 {
        warn!(skipped = stats.skipped, "Some input lines could not be parsed");
    }

    if let Some(handle) = prometheus {
        info!("Metrics:\n{}", handle.render());
    }

    Ok(())
}

/// Colored text for development, JSON for production. Both write to stderr.
fn init_tracing(json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "formcheck=info"
            .parse()
            .context("Invalid default log directive")?,
    );

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}
