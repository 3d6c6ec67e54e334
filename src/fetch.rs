use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::CheckError;

/// Shared HTTP fetcher: one client, one timeout, JSON bodies.
///
/// Probes make a handful of GETs per run and never retry; a failed fetch is
/// surfaced to the aggregator, not papered over.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// GET a URL and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CheckError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Transport(format!("{url} returned HTTP {status}")));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CheckError::Decode(format!("{url}: {e}")))
    }
}

/// Connect to `host:port`, read the stream to EOF under `timeout`, and decode
/// the accumulated bytes as one JSON document.
pub async fn read_json_socket(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<serde_json::Value, CheckError> {
    debug!(%host, port, "reading stats socket");
    let read = async {
        let mut stream = TcpStream::connect((host, port)).await?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, CheckError>(buf)
    };
    let buf = tokio::time::timeout(timeout, read)
        .await
        .map_err(|_| {
            CheckError::Transport(format!(
                "{host}:{port} timed out after {}s",
                timeout.as_secs()
            ))
        })??;
    serde_json::from_slice(&buf).map_err(|e| CheckError::Decode(format!("{host}:{port}: {e}")))
}

/// Outcome of probing one URL: up on a 2xx/3xx answer, down on anything else
/// including transport failures. The detail always names the host so failed
/// probes stay attributable in a combined message.
#[derive(Debug, Clone)]
pub struct UrlProbe {
    pub up: bool,
    pub detail: String,
}

/// GET a URL and classify the answer. Never fails: a transport error is a
/// down probe with the error as its detail.
pub async fn probe_url(client: &reqwest::Client, url: &str, whole_response: bool) -> UrlProbe {
    let host = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string());
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let mut detail = format!("{host}, {}, {} bytes", status.as_u16(), body.len());
            if whole_response {
                detail.push('\n');
                detail.push_str(&body);
            }
            UrlProbe {
                up: status.is_success() || status.is_redirection(),
                detail,
            }
        }
        Err(err) => UrlProbe {
            up: false,
            detail: format!("{host}: request error: {err}"),
        },
    }
}
