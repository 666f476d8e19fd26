use std::time::Duration;

use async_trait::async_trait;
use rotor_core::RemoteOperation;
use rotor_model::Outcome;
use tracing::{debug, trace};

use crate::errors::RemoteError;

mod response;
pub use response::classify;
use response::classify_transport;

/// Connection settings for [`GraphCommentOperation`].
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Scheme and host of the API, without trailing path (e.g. `https://graph.facebook.com`).
    pub base_url: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Posts a comment on a Graph object: `POST {base}/{target}/comments`
/// with form fields `access_token` and `message`.
pub struct GraphCommentOperation {
    client: reqwest::Client,
    base_url: String,
}

impl GraphCommentOperation {
    pub fn new(cfg: GraphConfig) -> Result<Self, RemoteError> {
        let base_url = cfg.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::InvalidBaseUrl(cfg.base_url));
        }
        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, target: &str) -> String {
        format!("{}/{}/comments", self.base_url, target)
    }
}

#[async_trait]
impl RemoteOperation for GraphCommentOperation {
    fn name(&self) -> &'static str {
        "graph-comment"
    }

    async fn attempt(&self, credential: &str, target: &str, message: &str) -> Outcome {
        let url = self.endpoint(target);
        trace!(target: "rotor.remote.graph", %url, "posting comment");

        let response = match self
            .client
            .post(&url)
            .form(&[("access_token", credential), ("message", message)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return classify_transport(&e),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_transport(&e),
        };

        let outcome = classify(status, &body);
        debug!(target: "rotor.remote.graph", status, outcome = outcome.as_label(), "comment posted");
        outcome
    }
}
