use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::CheckError;

/// Value source that reads one numeric JMX attribute by driving an external
/// jmxterm jar over stdin/stdout. The core only consumes the returned number.
pub struct JmxValueSource {
    pub host: String,
    pub port: u16,
    pub jar: PathBuf,
}

impl JmxValueSource {
    pub async fn read(&self, mbean: &str) -> Result<f64, CheckError> {
        let script = format!(
            "open {}:{}\nget -s -b {}\nclose\n",
            self.host, self.port, mbean
        );
        debug!(host = %self.host, port = self.port, %mbean, "querying jmxterm");

        let mut child = Command::new("java")
            .arg("-jar")
            .arg(&self.jar)
            .args(["-v", "silent", "-n"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CheckError::Transport("jmxterm stdin unavailable".to_string()))?;
        stdin.write_all(script.as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(CheckError::Transport(format!(
                "jmxterm exited with {}",
                output.status
            )));
        }
        parse_jmx_value(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse jmxterm's single-value output. Non-numeric output is a decode
/// failure, never coerced to zero.
pub fn parse_jmx_value(raw: &str) -> Result<f64, CheckError> {
    let trimmed = raw.trim();
    trimmed.parse::<f64>().map_err(|_| {
        CheckError::Decode(format!("jmxterm returned non-numeric value {trimmed:?}"))
    })
}
