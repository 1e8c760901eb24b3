// Trait abstraction for the resolver's outbound calls.
//
// ContentFetcher puts all three network touchpoints — promo API, shortlink
// redirect page, product page — behind one seam, so the whole pipeline runs
// against an in-memory mock in tests: no network, no live vendor pages.

use async_trait::async_trait;
use taopass_client::{TaoPassClient, TaoPassData};

use crate::config::Config;
use crate::error::Result;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Expand a taokouling token via the promo API.
    async fn taopass(&self, token: &str) -> Result<TaoPassData>;

    /// Fetch the shortlink redirect page HTML for a code.
    async fn shortlink_page(&self, code: &str) -> Result<String>;

    /// Fetch a product page's raw HTML.
    async fn product_page(&self, url: &str) -> Result<String>;
}

/// Production fetcher doing real HTTP. Request timeouts are bounded by the
/// race deadline so a losing call cannot outlive the resolution by much
/// even without cancellation.
pub struct HttpFetcher {
    taopass: TaoPassClient,
    client: reqwest::Client,
    shortlink_base: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.deadline)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            taopass: TaoPassClient::new(&config.taopass_endpoint, config.deadline),
            client,
            shortlink_base: config.shortlink_base.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn taopass(&self, token: &str) -> Result<TaoPassData> {
        Ok(self.taopass.parse(token).await?)
    }

    async fn shortlink_page(&self, code: &str) -> Result<String> {
        self.fetch_html(&format!("{}/{code}", self.shortlink_base)).await
    }

    async fn product_page(&self, url: &str) -> Result<String> {
        self.fetch_html(url).await
    }
}
