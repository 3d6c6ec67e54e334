use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::aggregate::{Discovery, Source};
use crate::error::CheckError;
use crate::fetch::HttpFetcher;
use crate::policy::{DiscretePolicy, Policy};
use crate::severity::Severity;

#[derive(Debug, Deserialize)]
struct ClusterList {
    clusters: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConsumerList {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    consumers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConsumerStatusResponse {
    status: StatusBody,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

/// Severity table for burrow consumer states. Anything not listed maps to
/// UNKNOWN so that new or unexpected states surface instead of disappearing
/// into OK.
pub fn consumer_status_policy() -> Policy {
    Policy::Discrete(DiscretePolicy::from_table(&[
        ("OK", Severity::Ok),
        ("WARN", Severity::Warning),
        ("ERR", Severity::Warning),
        ("STOP", Severity::Warning),
        ("STALL", Severity::Warning),
        ("REWIND", Severity::Ok),
        ("NOTFOUND", Severity::Unknown),
    ]))
}

/// The resource hierarchy exposed by a burrow instance:
/// clusters, then consumer groups per cluster, then one status string per
/// group as the leaf.
pub struct BurrowSource {
    fetcher: HttpFetcher,
    base_uri: String,
}

impl BurrowSource {
    pub fn new(fetcher: HttpFetcher, base_uri: &str) -> Self {
        Self {
            fetcher,
            base_uri: base_uri.trim_end_matches('/').to_string(),
        }
    }
}

impl Source for BurrowSource {
    async fn discover(&self, path: &[String]) -> Result<Discovery, CheckError> {
        match path {
            [] => {
                let url = format!("{}/v2/kafka", self.base_uri);
                let list: ClusterList = self.fetcher.get_json(&url).await?;
                debug!(clusters = list.clusters.len(), "discovered clusters");
                Ok(Discovery::Branch(list.clusters))
            }
            [cluster] => {
                let url = format!("{}/v2/kafka/{cluster}/consumer", self.base_uri);
                let list: ConsumerList = self.fetcher.get_json(&url).await?;
                if list.error {
                    return Err(CheckError::Decode(format!(
                        "burrow error listing consumers for {cluster}: {}",
                        list.message.unwrap_or_default()
                    )));
                }
                debug!(%cluster, consumers = list.consumers.len(), "discovered consumers");
                Ok(Discovery::Branch(list.consumers))
            }
            [cluster, consumer] => {
                let url = format!(
                    "{}/v2/kafka/{cluster}/consumer/{consumer}/status",
                    self.base_uri
                );
                let response: ConsumerStatusResponse = self.fetcher.get_json(&url).await?;
                Ok(Discovery::Leaf(Value::String(response.status.status)))
            }
            _ => Err(CheckError::Decode(format!(
                "unexpected resource depth {}",
                path.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::aggregate::evaluate;
    use crate::report::render;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_full_hierarchy_evaluation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/kafka")
            .with_body(r#"{"error": false, "clusters": ["main", "backup"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/main/consumer")
            .with_body(r#"{"error": false, "consumers": ["indexer", "archiver"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/backup/consumer")
            .with_body(r#"{"error": false, "consumers": ["mirror"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/main/consumer/indexer/status")
            .with_body(r#"{"status": {"status": "OK"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/main/consumer/archiver/status")
            .with_body(r#"{"status": {"status": "STALL"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/backup/consumer/mirror/status")
            .with_body(r#"{"status": {"status": "OK"}}"#)
            .create_async()
            .await;

        let source = BurrowSource::new(fetcher(), &server.url());
        let root = evaluate(&source, &consumer_status_policy()).await.unwrap();
        assert_eq!(root.severity, Severity::Warning);

        let report = render(&root);
        assert_eq!(report.severity, Severity::Warning);
        assert!(report.message.contains("main/archiver WARNING (status STALL)"));
    }

    #[tokio::test]
    async fn test_cluster_error_response_is_localized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/kafka")
            .with_body(r#"{"clusters": ["main", "backup"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/main/consumer")
            .with_body(r#"{"error": true, "message": "cluster not monitored"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/backup/consumer")
            .with_body(r#"{"error": false, "consumers": ["mirror"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/kafka/backup/consumer/mirror/status")
            .with_body(r#"{"status": {"status": "OK"}}"#)
            .create_async()
            .await;

        let source = BurrowSource::new(fetcher(), &server.url());
        let root = evaluate(&source, &consumer_status_policy()).await.unwrap();

        // The broken cluster is UNKNOWN, the healthy one still evaluated
        assert_eq!(root.severity, Severity::Unknown);
        let report = render(&root);
        assert!(report.message.contains("main UNKNOWN"));
        assert!(report.message.contains("cluster not monitored"));
    }

    #[tokio::test]
    async fn test_root_connection_refused_is_fatal_transport() {
        let source = BurrowSource::new(fetcher(), "http://127.0.0.1:1");
        let err = evaluate(&source, &consumer_status_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_cluster_list_is_decode() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/kafka")
            .with_body("not json")
            .create_async()
            .await;

        let source = BurrowSource::new(fetcher(), &server.url());
        let err = evaluate(&source, &consumer_status_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Decode(_)));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_uri() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/kafka")
            .with_body(r#"{"clusters": []}"#)
            .create_async()
            .await;

        let source = BurrowSource::new(fetcher(), &format!("{}/", server.url()));
        let root = evaluate(&source, &consumer_status_policy()).await.unwrap();
        assert_eq!(root.severity, Severity::Ok);
        mock.assert_async().await;
    }
}
