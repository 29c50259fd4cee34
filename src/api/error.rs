use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The fetch rejected outright: connection refused, DNS failure, or the
    /// per-resource timeout elapsed.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The fetch resolved but the upstream answered with a non-2xx status.
    #[error("Upstream returned status {status}")]
    UpstreamError { status: u16 },

    /// A 2xx response whose body failed to parse as the expected JSON shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::NetworkUnavailable(err.to_string())
    }
}
