//! FFprobe duration probing for uploaded videos.
//!
//! The store needs a duration at publish time and S3 does not supply one,
//! so we probe the staged file before it goes up.

use std::path::Path;

use serde::Deserialize;
use tokio::process::Command;

/// Error type for ffprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfprobeError {
    #[error("ffprobe binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Default, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub duration: Option<String>,
}

/// Container-level format info.
#[derive(Debug, Default, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

/// Run ffprobe against a local file and parse its JSON output.
pub async fn probe(path: &Path) -> Result<FfprobeOutput, FfprobeError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(FfprobeError::NotFound)?;

    if !output.status.success() {
        return Err(FfprobeError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    serde_json::from_slice(&output.stdout).map_err(|e| FfprobeError::ParseError(e.to_string()))
}

/// Parse the media duration in seconds from ffprobe output.
///
/// Prefers the container-level duration, falling back to the first video
/// stream. Returns 0.0 when neither is present.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    if let Some(d) = &probe.format.duration {
        if let Ok(secs) = d.parse::<f64>() {
            return secs;
        }
    }

    for stream in &probe.streams {
        if stream.codec_type.as_deref() == Some("video") {
            if let Some(d) = &stream.duration {
                if let Ok(secs) = d.parse::<f64>() {
                    return secs;
                }
            }
        }
    }

    0.0
}

/// Probe a file and return its duration in seconds.
pub async fn probe_duration(path: &Path) -> Result<f64, FfprobeError> {
    let output = probe(path).await?;
    Ok(parse_duration(&output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_format() {
        let out = FfprobeOutput {
            streams: vec![],
            format: FfprobeFormat {
                duration: Some("120.5".to_string()),
            },
        };
        assert!((parse_duration(&out) - 120.5).abs() < 0.001);
    }

    #[test]
    fn duration_falls_back_to_video_stream() {
        let out = FfprobeOutput {
            streams: vec![
                FfprobeStream {
                    codec_type: Some("audio".to_string()),
                    duration: Some("59.0".to_string()),
                },
                FfprobeStream {
                    codec_type: Some("video".to_string()),
                    duration: Some("60.0".to_string()),
                },
            ],
            format: FfprobeFormat { duration: None },
        };
        assert!((parse_duration(&out) - 60.0).abs() < 0.001);
    }

    #[test]
    fn missing_duration_is_zero() {
        let out = FfprobeOutput {
            streams: vec![],
            format: FfprobeFormat { duration: None },
        };
        assert_eq!(parse_duration(&out), 0.0);
    }

    #[test]
    fn parses_ffprobe_json() {
        let json = r#"{
            "streams": [{"codec_type": "video", "duration": "12.000000"}],
            "format": {"duration": "12.040000"}
        }"#;
        let out: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert!((parse_duration(&out) - 12.04).abs() < 0.001);
    }
}
