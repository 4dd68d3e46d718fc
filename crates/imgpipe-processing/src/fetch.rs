//! Source image download

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use imgpipe_core::{Config, FetchError};
use reqwest::{Client, Url};
use std::time::Duration;

/// Retrieves the raw bytes of a source image.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Fetcher over a shared `reqwest::Client`
///
/// No request timeout is applied unless one is configured. Bodies larger than
/// `max_bytes` are rejected, first from `Content-Length` and then while reading.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(client: Client, max_bytes: u64) -> Self {
        Self { client, max_bytes }
    }

    /// Build the client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Self::build_client(config.fetch_timeout())?;
        Ok(Self::new(client, config.max_download_bytes))
    }

    pub fn build_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    fn parse_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Only allow HTTP/HTTPS
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        Ok(parsed)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = Self::parse_url(url)?;
        let start = std::time::Instant::now();

        let mut response = self.client.get(parsed).send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Failed to download source image");
            FetchError::Request {
                url: url.to_string(),
                source: Box::new(e),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url = %url, status = status.as_u16(), "Source image request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size: length,
                    max: self.max_bytes,
                });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: Box::new(e),
        })? {
            let size = (body.len() + chunk.len()) as u64;
            if size > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size,
                    max: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::info!(
            url = %url,
            size_bytes = body.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Downloaded source image"
        );

        Ok(body.freeze())
    }
}
