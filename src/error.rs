/// All errors that can occur while scraping or persisting Liquipedia data.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The MediaWiki API answered but without the expected payload
    /// (missing page, missing revision, malformed envelope).
    #[error("api response missing {context} for {title}")]
    Api {
        title: String,
        context: &'static str,
    },

    /// Failed to decode a JSON payload.
    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A record could not be written to the SQLite sink.
    #[error("sqlite write failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while writing the JSON sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
