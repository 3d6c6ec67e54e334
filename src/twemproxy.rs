use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;

use crate::aggregate::{Discovery, Source};
use crate::error::CheckError;
use crate::fetch;

// Root-level metadata emitted by the stats socket; never traversed as pools.
const SKIP_ROOT_KEYS: [&str; 5] = ["service", "source", "version", "uptime", "timestamp"];

/// One snapshot of a twemproxy stats socket.
///
/// The socket streams a single JSON document of pool name → stat group →
/// per-server numeric values. The configured stat key names the group to
/// traverse under each pool; its per-server entries are the leaves. Pools
/// without that group contribute no leaves.
#[derive(Debug)]
pub struct TwemproxySource {
    doc: Map<String, Value>,
    stat_key: String,
}

impl TwemproxySource {
    /// Connect to the stats socket and read the whole document under `timeout`.
    pub async fn connect(
        host: &str,
        port: u16,
        stat_key: &str,
        timeout: Duration,
    ) -> Result<Self, CheckError> {
        let doc = fetch::read_json_socket(host, port, timeout).await?;
        Self::from_value(doc, stat_key)
    }

    /// Build from an already-read stats document.
    pub fn from_value(doc: Value, stat_key: &str) -> Result<Self, CheckError> {
        match doc {
            Value::Object(doc) => Ok(Self {
                doc,
                stat_key: stat_key.to_string(),
            }),
            other => Err(CheckError::Decode(format!(
                "stats document is not an object: {other}"
            ))),
        }
    }

    fn stat_group(&self, pool: &str) -> Option<&Map<String, Value>> {
        self.doc
            .get(pool)
            .and_then(Value::as_object)
            .and_then(|p| p.get(&self.stat_key))
            .and_then(Value::as_object)
    }
}

impl Source for TwemproxySource {
    async fn discover(&self, path: &[String]) -> Result<Discovery, CheckError> {
        match path {
            [] => {
                let pools: Vec<String> = self
                    .doc
                    .iter()
                    .filter(|(key, value)| {
                        !SKIP_ROOT_KEYS.contains(&key.as_str()) && value.is_object()
                    })
                    .map(|(key, _)| key.clone())
                    .collect();
                debug!(pools = pools.len(), "discovered pools");
                Ok(Discovery::Branch(pools))
            }
            [pool] => {
                let servers = self
                    .stat_group(pool)
                    .map(|group| group.keys().cloned().collect())
                    .unwrap_or_default();
                Ok(Discovery::Branch(servers))
            }
            [pool, server] => self
                .stat_group(pool)
                .and_then(|group| group.get(server))
                .cloned()
                .map(Discovery::Leaf)
                .ok_or_else(|| {
                    CheckError::Decode(format!("stat {pool}/{server} missing from the snapshot"))
                }),
            _ => Err(CheckError::Decode(format!(
                "unexpected resource depth {}",
                path.len()
            ))),
        }
    }
}
