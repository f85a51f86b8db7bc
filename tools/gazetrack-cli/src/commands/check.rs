//! Check system capabilities.

use std::time::{Duration, Instant};

use anyhow::Context;
use gazetrack_capture::device::{all_required_available, check_capabilities, print_capability_report};
use gazetrack_capture::{CaptureSource, WebcamCapture};
use gazetrack_common::config::AppConfig;

pub fn run(config: &AppConfig, probe: Option<u32>) -> anyhow::Result<()> {
    println!("GazeTrack System Check");
    println!("{}", "=".repeat(50));

    let capabilities = check_capabilities(&config.camera);
    print_capability_report(&capabilities);

    println!();
    if all_required_available(&capabilities) {
        println!("All required capabilities are available. GazeTrack is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    if let Some(frames) = probe {
        println!();
        probe_camera(config, frames)?;
    }

    Ok(())
}

fn probe_camera(config: &AppConfig, frames: u32) -> anyhow::Result<()> {
    let mut capture =
        WebcamCapture::open(config.camera.clone()).context("Failed to open camera")?;

    let mut total = Duration::ZERO;
    let mut failures = 0u32;
    for _ in 0..frames {
        let started = Instant::now();
        match capture.read() {
            Ok(_) => total += started.elapsed(),
            Err(e) => {
                failures += 1;
                tracing::warn!(error = %e, "Probe read failed");
            }
        }
    }

    if let Err(e) = capture.release() {
        tracing::warn!(error = %e, "Camera release failed");
    }

    let ok = frames - failures;
    println!("Camera probe: {ok}/{frames} frames read");
    if ok > 0 {
        println!(
            "  Mean read time: {:.2} ms",
            total.as_secs_f64() * 1000.0 / f64::from(ok)
        );
    }
    Ok(())
}
