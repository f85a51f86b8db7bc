//! Camera device discovery and capability checks.

use std::path::{Path, PathBuf};
use std::process::Command;

use gazetrack_common::config::CameraConfig;

/// A system capability that GazeTrack may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities for the given camera configuration.
pub fn check_capabilities(camera: &CameraConfig) -> Vec<Capability> {
    vec![check_ffmpeg(), check_any_camera(), check_configured_camera(camera)]
}

/// Whether every required capability is available.
pub fn all_required_available(capabilities: &[Capability]) -> bool {
    capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available)
}

/// All `/dev/video*` nodes, sorted by path.
pub fn list_camera_devices() -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        return Vec::new();
    };
    let mut devices: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("video"))
        .map(|entry| entry.path())
        .collect();
    devices.sort();
    devices
}

/// Whether `binary` resolves on the current `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn check_ffmpeg() -> Capability {
    let available = command_exists("ffmpeg");
    Capability {
        name: "ffmpeg".to_string(),
        description: "Streams raw frames from the camera device".to_string(),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Install ffmpeg: sudo apt install ffmpeg".to_string())
        },
    }
}

fn check_any_camera() -> Capability {
    let devices = list_camera_devices();
    let available = !devices.is_empty();
    let listed = devices
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Capability {
        name: "Camera Devices".to_string(),
        description: if available {
            format!("Video4Linux devices: {listed}")
        } else {
            "Video4Linux devices under /dev/video*".to_string()
        },
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some(
                "Connect a webcam and verify /dev/video* exists (v4l2-ctl --list-devices)"
                    .to_string(),
            )
        },
    }
}

fn check_configured_camera(camera: &CameraConfig) -> Capability {
    let path = camera.device_path();
    let available = Path::new(&path).exists();
    Capability {
        name: "Configured Camera".to_string(),
        description: format!(
            "{} at {}x{} @ {} fps",
            path.display(),
            camera.width,
            camera.height,
            camera.fps
        ),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some(
                "Set camera.device_index in the config file to one of the listed devices"
                    .to_string(),
            )
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("GazeTrack System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
