use thiserror::Error;

/// Probe failure taxonomy.
///
/// Transport and decode failures at the evaluation root are fatal and reported
/// as UNKNOWN; below the root they are localized to the affected subtree.
/// Config errors are detected before any fetch and always abort the run.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Connection refused/reset/timeout while reaching the remote system.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed or structurally unexpected payload.
    #[error("decode error: {0}")]
    Decode(String),

    /// Missing or invalid threshold/policy input.
    #[error("config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        CheckError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CheckError::Decode(err.to_string())
        } else {
            CheckError::Transport(err.to_string())
        }
    }
}
