#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to load sheet '{sheet}': server responded with {status}")]
    Status {
        sheet: String,
        status: reqwest::StatusCode,
    },
}
