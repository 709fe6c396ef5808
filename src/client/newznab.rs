use reqwest::Url;

use super::transport::{HttpTransport, Transport};
use crate::config::ServerConfig;
use crate::error::{Result, TransportError};
use crate::nzb::{charset, Nzb};
use crate::query::{encode_url, param, redact_api_key, Param};

/// Client for a single Newznab server.
///
/// Every search adds `extended=1`, the API key and the request type to the
/// caller's parameters. Search results are returned as the server sent
/// them, transcoded to UTF-8 from their declared encoding; NZB downloads
/// are decoded and re-encoded as JSON.
pub struct NewznabClient<T = HttpTransport> {
    base_url: String,
    api_key: String,
    transport: T,
}

impl NewznabClient<HttpTransport> {
    /// Client using the HTTP transport configured from `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(&config.url, &config.api_key, transport))
    }
}

impl<T: Transport> NewznabClient<T> {
    pub fn new(base_url: &str, api_key: &str, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The server's capabilities manifest (`t=caps`).
    pub async fn caps(&self) -> Result<String> {
        let url = encode_url(&self.base_url, &[param::request_type("caps")])?;
        self.get_text(&url).await
    }

    /// General search across all media.
    pub async fn search(&self, params: &[Param]) -> Result<String> {
        self.search_as("search", params).await
    }

    pub async fn tv_search(&self, params: &[Param]) -> Result<String> {
        self.search_as("tvsearch", params).await
    }

    pub async fn movie_search(&self, params: &[Param]) -> Result<String> {
        self.search_as("movie", params).await
    }

    pub async fn music_search(&self, params: &[Param]) -> Result<String> {
        self.search_as("music", params).await
    }

    pub async fn book_search(&self, params: &[Param]) -> Result<String> {
        self.search_as("book", params).await
    }

    /// Download and decode the NZB with the given id.
    pub async fn fetch_nzb(&self, id: &str) -> Result<Nzb> {
        let url = encode_url(
            &self.base_url,
            &[
                param::apikey(&self.api_key),
                param::nzb_id(id),
                param::request_type("get"),
            ],
        )?;
        let body = self.get(&url).await?;
        Ok(Nzb::from_bytes(&body)?)
    }

    /// Download the NZB with the given id as indented JSON.
    pub async fn get_nzb(&self, id: &str) -> Result<String> {
        let nzb = self.fetch_nzb(id).await?;
        Ok(nzb.to_json()?)
    }

    async fn search_as(&self, kind: &str, params: &[Param]) -> Result<String> {
        let mut all = params.to_vec();
        all.push(param::extended());
        all.push(param::apikey(&self.api_key));
        all.push(param::request_type(kind));

        let url = encode_url(&self.base_url, &all)?;
        self.get_text(&url).await
    }

    async fn get(&self, url: &Url) -> Result<bytes::Bytes> {
        tracing::debug!("GET {}", redact_api_key(url));
        Ok(self.transport.get(url).await?)
    }

    async fn get_text(&self, url: &Url) -> Result<String> {
        let body = self.get(url).await?;
        charset::transcode(&body)
            .map(|text| text.into_owned())
            .map_err(|_| TransportError::Body.into())
    }
}
