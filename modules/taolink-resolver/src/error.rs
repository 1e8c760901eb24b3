use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// A resolution strategy's failure outcome. Both kinds surface to the
/// caller as-is; the chat adapter decides how to report them.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The upstream knows the code but the product behind it is gone.
    #[error("{0}")]
    ProductUnavailable(String),

    /// Transport-level failure on any outbound call, including malformed
    /// responses and unparseable product links.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Network(err.to_string())
    }
}

impl From<taopass_client::TaoPassError> for ResolveError {
    fn from(err: taopass_client::TaoPassError) -> Self {
        match err {
            taopass_client::TaoPassError::Rejected { .. } => ResolveError::ProductUnavailable(
                "This product has been deleted (from taodaxiang.com)".to_string(),
            ),
            other => ResolveError::Network(other.to_string()),
        }
    }
}
