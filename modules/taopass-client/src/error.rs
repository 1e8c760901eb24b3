use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaoPassError>;

#[derive(Debug, Error)]
pub enum TaoPassError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered but refused the code (`code != 0` in the body).
    /// Upstream reports this for deleted or expired products.
    #[error("Code rejected by taopass API (code {code})")]
    Rejected { code: i64 },
}

impl From<reqwest::Error> for TaoPassError {
    fn from(err: reqwest::Error) -> Self {
        TaoPassError::Network(err.to_string())
    }
}
