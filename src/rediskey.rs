use redis::AsyncCommands;
use tracing::debug;

use crate::error::CheckError;
use crate::severity::Severity;

/// Connection parameters for the key check.
pub struct RedisKeyCheck {
    pub host: String,
    pub port: u16,
    pub database: i64,
    pub password: Option<String>,
}

impl RedisKeyCheck {
    fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.database
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.database),
        }
    }

    /// Fetch the key's value; `None` when the key is not set.
    pub async fn fetch(&self, key: &str) -> Result<Option<String>, CheckError> {
        debug!(host = %self.host, port = self.port, %key, "fetching key");
        let client = redis::Client::open(self.url().as_str())
            .map_err(|e| CheckError::Config(format!("redis target: {e}")))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CheckError::Transport(format!("{}:{}: {e}", self.host, self.port)))?;
        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            if e.kind() == redis::ErrorKind::TypeError {
                CheckError::Decode(format!("key {key}: {e}"))
            } else {
                CheckError::Transport(format!("{}:{}: {e}", self.host, self.port))
            }
        })
    }
}

/// Compare a fetched value against the expected one. An absent key is
/// UNKNOWN, not CRITICAL: absence of evidence is loss of visibility.
pub fn verdict(key: &str, value: Option<&str>, expected: &str) -> (Severity, String) {
    match value {
        None => (Severity::Unknown, format!("key {key} is not set")),
        Some(v) if v == expected => (Severity::Ok, format!("key {key} is {v}")),
        Some(v) => (
            Severity::Critical,
            format!("key {key} is {v} (expected {expected})"),
        ),
    }
}
