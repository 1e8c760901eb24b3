pub mod error;
pub mod types;

pub use error::{Result, TaoPassError};
pub use types::{TaoPassData, TaoPassResponse};

use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://taodaxiang.com/taopass/parse/get";

pub struct TaoPassClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TaoPassClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Expand a taokouling token into its product reference.
    ///
    /// The API takes a form-encoded body (`content=<token>`) and always
    /// answers HTTP 200; failures are signalled by a non-zero `code` in the
    /// JSON body, surfaced here as [`TaoPassError::Rejected`].
    pub async fn parse(&self, content: &str) -> Result<TaoPassData> {
        tracing::debug!(endpoint = %self.endpoint, "Expanding taokouling token");

        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("content", content)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TaoPassError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: TaoPassResponse = resp.json().await?;
        if payload.code != 0 {
            return Err(TaoPassError::Rejected { code: payload.code });
        }

        payload.data.ok_or_else(|| TaoPassError::Api {
            status: status.as_u16(),
            message: "missing data payload in successful response".to_string(),
        })
    }
}
