use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, Url};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::TransportError;

/// Performs the HTTP GET behind every Newznab request.
///
/// The client receives this as a parameter, so tests can hand it a canned
/// implementation instead of touching the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, returning the full body of a `200 OK` response.
    async fn get(&self, url: &Url) -> Result<Bytes, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with other code.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Bytes, TransportError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status(status.to_string()));
        }

        Ok(response.bytes().await?)
    }
}
