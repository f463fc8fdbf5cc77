use thiserror::Error;

/// Errors raised while talking to the PNCP consultation API.
#[derive(Debug, Error)]
pub enum PncpError {
    /// Network, timeout or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 5xx response; treated as transient.
    #[error("server error {status} from {url}")]
    ServerError { status: u16, url: String },

    /// 4xx response; retrying would return the same answer.
    #[error("request rejected with {status} by {url}")]
    ClientError { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("pagination limit reached for {endpoint}: exceeded {max_pages} pages")]
    PaginationLimit { endpoint: String, max_pages: u32 },
}
