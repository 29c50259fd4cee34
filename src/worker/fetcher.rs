//! The network seam.
//!
//! Every component that talks to the network does so through `Fetcher`, so
//! the precache loader and the interceptor can be driven by a scripted mock
//! in tests. `HttpFetcher` is the real implementation; Clone is cheap since
//! reqwest::Client uses Arc internally for connection pooling.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;

use crate::api::FetchError;
use crate::worker::request::{Request, Response};

pub trait Fetcher: Clone + Send + Sync + 'static {
    fn fetch(
        &self,
        req: Request,
    ) -> impl Future<Output = Result<Response, FetchError>> + Send;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` applies per resource; an elapsed timeout is reported as
    /// `FetchError::NetworkUnavailable`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, req: Request) -> Result<Response, FetchError> {
        let mut builder = self.client.get(&req.url);
        for (name, value) in &req.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                builder = builder.header(name, value);
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
