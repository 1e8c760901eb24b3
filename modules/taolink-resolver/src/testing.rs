// Test mocks for the resolution pipeline.
//
// One mock for the single trait boundary: MockFetcher (ContentFetcher),
// HashMap-based registration with builder `.on_*()` methods. Per-channel
// delays let tests script settlement order for race assertions, and a call
// counter lets them prove that no network activity happened at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use taopass_client::{TaoPassData, TaoPassError};

use crate::error::{ResolveError, Result};
use crate::traits::ContentFetcher;

/// HashMap-based content fetcher. Returns a `Network` error for anything
/// unregistered.
pub struct MockFetcher {
    taopass: HashMap<String, TaoPassData>,
    taopass_rejected: HashMap<String, i64>,
    shortlink_pages: HashMap<String, String>,
    product_pages: HashMap<String, String>,
    taopass_delay: Option<Duration>,
    shortlink_delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            taopass: HashMap::new(),
            taopass_rejected: HashMap::new(),
            shortlink_pages: HashMap::new(),
            product_pages: HashMap::new(),
            taopass_delay: None,
            shortlink_delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn on_taopass(mut self, token: &str, data: TaoPassData) -> Self {
        self.taopass.insert(token.to_string(), data);
        self
    }

    /// Register a token the promo API answers with a non-zero code for.
    pub fn on_taopass_rejected(mut self, token: &str, code: i64) -> Self {
        self.taopass_rejected.insert(token.to_string(), code);
        self
    }

    pub fn on_shortlink_page(mut self, code: &str, html: &str) -> Self {
        self.shortlink_pages.insert(code.to_string(), html.to_string());
        self
    }

    pub fn on_product_page(mut self, url: &str, html: &str) -> Self {
        self.product_pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Delay every taopass answer, registered or not.
    pub fn taopass_delay(mut self, delay: Duration) -> Self {
        self.taopass_delay = Some(delay);
        self
    }

    /// Delay every shortlink page answer, registered or not.
    pub fn shortlink_delay(mut self, delay: Duration) -> Self {
        self.shortlink_delay = Some(delay);
        self
    }

    /// Total outbound calls made through this fetcher.
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn taopass(&self, token: &str) -> Result<TaoPassData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.taopass_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(code) = self.taopass_rejected.get(token) {
            return Err(TaoPassError::Rejected { code: *code }.into());
        }
        self.taopass.get(token).cloned().ok_or_else(|| {
            ResolveError::Network(format!("MockFetcher: no taopass answer registered for {token}"))
        })
    }

    async fn shortlink_page(&self, code: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.shortlink_delay {
            tokio::time::sleep(delay).await;
        }
        self.shortlink_pages.get(code).cloned().ok_or_else(|| {
            ResolveError::Network(format!(
                "MockFetcher: no shortlink page registered for {code}"
            ))
        })
    }

    async fn product_page(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.product_pages.get(url).cloned().ok_or_else(|| {
            ResolveError::Network(format!("MockFetcher: no product page registered for {url}"))
        })
    }
}

/// Minimal taopass payload for tests that only care about the URL.
pub fn taopass_data(url: &str) -> TaoPassData {
    TaoPassData {
        url: url.to_string(),
        content: None,
        pic_url: None,
        expire: None,
    }
}
