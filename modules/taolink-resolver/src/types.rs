use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which resolution strategy a classified code belongs to. The two patterns
/// are independent; one message may yield both kinds at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// A taokouling token flanked by currency/decorative symbols,
    /// resolvable through the promo API.
    SymbolEmbedded,
    /// An `m.tb.cn` shortlink code, resolvable by scraping its redirect page.
    Shortlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCode {
    pub kind: CodeKind,
    pub token: String,
}

/// A fully resolved product reference, ready for the chat adapter to render.
/// `url` is always canonical and absolute.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedProduct {
    pub url: String,
    pub title: Option<String>,
    pub pic_url: Option<String>,
    pub price_summary: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}
