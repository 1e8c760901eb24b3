//! The two resolution strategies and the race that arbitrates them.
//!
//! Only strategies whose classifier pattern matched are started. They race
//! each other and a fixed deadline, and the first settlement (success or
//! failure) decides the overall outcome. Deliberately fail-fast, not
//! first-success: a fast failure beats a slow success. Losing branches are
//! dropped, which cancels their in-flight requests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::select_all;
use tracing::{debug, info, warn};

use crate::canonical::canonicalize;
use crate::classifier::classify;
use crate::config::Config;
use crate::error::{ResolveError, Result};
use crate::price::scan_prices;
use crate::shortlink;
use crate::traits::{ContentFetcher, HttpFetcher};
use crate::types::{CodeKind, ResolvedProduct};

/// Hours the upstream expiry timestamps sit ahead of UTC.
const EXPIRE_ZONE_OFFSET_HOURS: i64 = 8;

pub struct Resolver {
    fetcher: Arc<dyn ContentFetcher>,
    deadline: Duration,
}

impl Resolver {
    /// Production resolver doing real HTTP.
    pub fn new(config: &Config) -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new(config)), config.deadline)
    }

    pub fn with_fetcher(fetcher: Arc<dyn ContentFetcher>, deadline: Duration) -> Self {
        Self { fetcher, deadline }
    }

    /// Resolve a chat message (or photo caption) to a product reference.
    ///
    /// `Ok(None)` means nothing actionable: no candidate pattern in the
    /// text, or the deadline elapsed with no strategy settling. Both are
    /// silent outcomes for the caller. `Err` is a settled strategy failure
    /// and is meant to be reported back to the user.
    pub async fn resolve_message(&self, text: Option<&str>) -> Result<Option<ResolvedProduct>> {
        let candidates = classify(text);
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut kinds: Vec<CodeKind> = Vec::new();
        let mut strategies: Vec<
            Pin<Box<dyn Future<Output = Result<ResolvedProduct>> + Send + '_>>,
        > = Vec::new();
        for candidate in candidates {
            debug!(kind = ?candidate.kind, token = %candidate.token, "Starting strategy");
            kinds.push(candidate.kind);
            match candidate.kind {
                CodeKind::SymbolEmbedded => {
                    strategies.push(Box::pin(self.resolve_taopass(candidate.token)));
                }
                CodeKind::Shortlink => {
                    strategies.push(Box::pin(self.resolve_shortlink(candidate.token)));
                }
            }
        }

        match tokio::time::timeout(self.deadline, select_all(strategies)).await {
            Ok((outcome, index, _losers)) => match outcome {
                Ok(product) => {
                    info!(kind = ?kinds[index], url = %product.url, "Resolved product");
                    Ok(Some(product))
                }
                Err(e) => {
                    warn!(kind = ?kinds[index], error = %e, "Strategy settled with failure");
                    Err(e)
                }
            },
            Err(_) => {
                info!(deadline_ms = self.deadline.as_millis() as u64, "Resolution deadline elapsed");
                Ok(None)
            }
        }
    }

    async fn resolve_taopass(&self, token: String) -> Result<ResolvedProduct> {
        let data = self.fetcher.taopass(&token).await?;
        let url = canonicalize(&data.url)?;
        let expiry = data.expire.as_deref().and_then(parse_expire);
        let price_summary = self.lookup_price(&url).await?;

        Ok(ResolvedProduct {
            url,
            title: data.content,
            pic_url: data.pic_url,
            price_summary,
            expiry,
        })
    }

    async fn resolve_shortlink(&self, code: String) -> Result<ResolvedProduct> {
        let html = self.fetcher.shortlink_page(&code).await?;
        let page = shortlink::parse_redirect_page(&html).ok_or_else(|| {
            ResolveError::ProductUnavailable(
                "This product has been deleted (from shortlink parsing)".to_string(),
            )
        })?;
        let url = canonicalize(&page.url)?;
        let price_summary = self.lookup_price(&url).await?;

        Ok(ResolvedProduct {
            url,
            title: page.extra.title,
            pic_url: page.extra.pic,
            price_summary,
            expiry: None,
        })
    }

    async fn lookup_price(&self, url: &str) -> Result<Option<String>> {
        let html = self.fetcher.product_page(url).await?;
        Ok(scan_prices(&html))
    }
}

/// Upstream expiry strings are naive `YYYY-MM-DD HH:MM:SS` local times from
/// a zone eight hours ahead of UTC. An unparseable value loses the expiry,
/// never the resolution.
fn parse_expire(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S").ok()?;
    Some((naive - chrono::Duration::hours(EXPIRE_ZONE_OFFSET_HOURS)).and_utc())
}
