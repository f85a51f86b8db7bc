//! Replay recorded detector output through the tracking pipeline.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use gazetrack_capture::ScriptedCapture;
use gazetrack_common::config::AppConfig;
use gazetrack_gaze_model::{parse_samples, Direction, RawSample};
use gazetrack_tracker::backends::ScriptedDetector;
use gazetrack_tracker::{DirectionStore, GazeTracker, TickOutcome, TrackingLoop};
use serde::Serialize;

#[derive(Serialize)]
struct ReplayLine {
    tick: u64,
    #[serde(flatten)]
    direction: Direction,
    detected: bool,
}

pub async fn run(
    mut config: AppConfig,
    samples_path: PathBuf,
    realtime: bool,
    poll_ms: u64,
    smoothing_factor: Option<f64>,
) -> anyhow::Result<()> {
    if let Some(alpha) = smoothing_factor {
        config.tracking.smoothing_factor = alpha;
    }
    config.tracking.validate()?;

    let content = std::fs::read_to_string(&samples_path)
        .with_context(|| format!("Failed to read {}", samples_path.display()))?;
    let samples = parse_samples(&content)?;
    tracing::info!(samples = samples.len(), path = %samples_path.display(), "Loaded raw samples");

    if realtime {
        replay_realtime(config, samples, poll_ms).await
    } else {
        replay_offline(&config, samples)
    }
}

/// One tick per sample, no pacing; output is deterministic.
fn replay_offline(
    config: &AppConfig,
    samples: Vec<RawSample>,
) -> anyhow::Result<()> {
    let ticks = samples.len();
    let store = Arc::new(DirectionStore::new());
    let mut tracking = TrackingLoop::new(
        Box::new(ScriptedCapture::blank(2, 2)),
        Box::new(ScriptedDetector::new(samples)),
        Arc::clone(&store),
        &config.tracking,
    );

    for tick in 1..=ticks as u64 {
        if let TickOutcome::Published { detected, direction } = tracking.tick() {
            let line = ReplayLine {
                tick,
                direction,
                detected,
            };
            println!("{}", serde_json::to_string(&line)?);
        }
    }

    let stats = tracking.stats();
    tracing::info!(
        ticks = stats.ticks,
        detections = stats.detections,
        misses = stats.misses,
        "Replay finished"
    );
    Ok(())
}

/// Run the background tracker and read it like a request-serving client.
async fn replay_realtime(
    config: AppConfig,
    samples: Vec<RawSample>,
    poll_ms: u64,
) -> anyhow::Result<()> {
    let tracker = Arc::new(GazeTracker::new(config.tracking.clone())?);
    let total = samples.len() as u64;

    tracker.start(
        Box::new(ScriptedCapture::blank(2, 2)),
        Box::new(ScriptedDetector::new(samples)),
    )?;
    eprintln!("Replaying in realtime. Press Ctrl+C to stop...");

    let polled = poll_until_published(
        &tracker,
        total,
        Duration::from_millis(poll_ms.max(1)),
        &mut std::io::stdout(),
    )
    .await;

    let stopper = Arc::clone(&tracker);
    let stats = tokio::task::spawn_blocking(move || stopper.stop()).await?;
    polled?;
    if let Some(stats) = stats {
        eprintln!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}

/// Print a snapshot every `period` until `total` directions have been
/// published or Ctrl+C arrives.
///
/// Every tick of a blank capture publishes once, so sequence `total` is the
/// tick that consumed the last sample.
async fn poll_until_published(
    tracker: &GazeTracker,
    total: u64,
    period: Duration,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = interval.tick() => {
                let snapshot = tracker.snapshot();
                writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
                if snapshot.sequence >= total {
                    break;
                }
            }
        }
    }
    Ok(())
}
