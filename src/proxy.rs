use std::time::Duration;

use crate::error::CheckError;
use crate::fetch::{probe_url, UrlProbe};
use crate::severity::Severity;

/// Forward-proxy check over two URLs.
///
/// The primary URL is the monitored path through the proxy; the secondary
/// tells proxy trouble apart from a dead upstream. Only the primary going
/// dark while the secondary answers is a proxy-level warning; both failing
/// is critical.
pub struct ProxyCheck {
    client: reqwest::Client,
    whole_response: bool,
}

impl ProxyCheck {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        insecure: bool,
        whole_response: bool,
    ) -> Result<Self, CheckError> {
        // Redirects are not followed: a 3xx answer already proves the path works
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(insecure)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CheckError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            whole_response,
        })
    }

    pub async fn run(&self, primary: &str, secondary: &str) -> (Severity, String) {
        let primary = probe_url(&self.client, primary, self.whole_response).await;
        let secondary = probe_url(&self.client, secondary, self.whole_response).await;
        verdict(&primary, &secondary)
    }
}

/// Fold the two probe outcomes into the final severity.
pub fn verdict(primary: &UrlProbe, secondary: &UrlProbe) -> (Severity, String) {
    if !primary.up && !secondary.up {
        (
            Severity::Critical,
            format!("{} {}", primary.detail, secondary.detail),
        )
    } else if !primary.up {
        (
            Severity::Warning,
            format!(
                "secondary responding but primary is not: {} {}",
                primary.detail, secondary.detail
            ),
        )
    } else {
        (
            Severity::Ok,
            format!("{} {}", primary.detail, secondary.detail),
        )
    }
}
