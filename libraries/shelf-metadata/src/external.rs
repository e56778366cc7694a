//! External duration probe
//!
//! Runs `ffprobe` (or a compatible tool) as a subprocess and reads the container
//! duration it prints. The child is killed if it outlives the configured timeout.

use shelf_core::ProbeFailure;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Subprocess-based duration probe
#[derive(Debug, Clone)]
pub struct ExternalProbe {
    program: PathBuf,
    timeout: Duration,
}

impl ExternalProbe {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Probe the duration of `path` in seconds
    pub async fn probe_duration(&self, path: &Path) -> Result<f64, ProbeFailure> {
        let mut command = Command::new(&self.program);
        command
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProbeFailure::ToolFailed(format!(
                    "{}: {}",
                    self.program.display(),
                    e
                )))
            }
            Err(_) => {
                debug!("{} timed out on {}", self.program.display(), path.display());
                return Err(ProbeFailure::TimedOut);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeFailure::ToolFailed(format!(
                "exit status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_duration_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the duration printed by the probe tool
///
/// Expects a positive number of seconds on the first non-empty line.
pub fn parse_duration_output(stdout: &str) -> Result<f64, ProbeFailure> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ProbeFailure::Unparseable(String::new()))?;

    match line.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(ProbeFailure::Unparseable(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_duration() {
        assert_eq!(parse_duration_output("1234.567000\n"), Ok(1234.567));
    }

    #[test]
    fn rejects_missing_or_invalid_output() {
        assert!(parse_duration_output("").is_err());
        assert!(parse_duration_output("N/A\n").is_err());
        assert!(parse_duration_output("0.000000").is_err());
    }

    #[tokio::test]
    async fn missing_tool_is_a_probe_failure() {
        let probe = ExternalProbe::new("/nonexistent/ffprobe", Duration::from_secs(1));
        let result = probe.probe_duration(Path::new("whatever.mp3")).await;
        assert!(matches!(result, Err(ProbeFailure::ToolFailed(_))));
    }
}
