use serde::Deserialize;

/// Envelope for every taopass API response. `code` is zero on success;
/// any other value means the code could not be expanded.
#[derive(Debug, Clone, Deserialize)]
pub struct TaoPassResponse {
    pub code: i64,
    pub data: Option<TaoPassData>,
}

/// The expanded product reference behind a taokouling code.
#[derive(Debug, Clone, Deserialize)]
pub struct TaoPassData {
    /// Product URL as the upstream knows it — mobile hosts, tracking
    /// parameters and all. Callers canonicalize it themselves.
    pub url: String,
    /// Promo text attached to the code, used as the product title.
    pub content: Option<String>,
    #[serde(rename = "picUrl")]
    pub pic_url: Option<String>,
    /// Expiry as a naive `YYYY-MM-DD HH:MM:SS` string in the upstream's
    /// local zone.
    pub expire: Option<String>,
}
