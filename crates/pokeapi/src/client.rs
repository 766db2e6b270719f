//! PokeAPI client.
//!
//! Async HTTP client using `reqwest`. No retries: every failure is returned
//! to the caller as an [`Error`].

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::types::{Pokemon, PokemonPage};

/// Errors from the PokeAPI client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// PokeAPI client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl Client {
    /// Creates a new client from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// Returns the configured first-page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!(url, "GET");
        let mut req = self.http.get(url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url, error = %e, "request failed");
                return Err(e.into());
            }
        };
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(url, status = status.as_u16(), "unexpected status");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(url, error = %e, "failed to decode response");
            Error::Json(e)
        })
    }

    /// Fetches one page of the species listing.
    ///
    /// Without a cursor the first page is requested with the configured page
    /// size and offset 0. With a cursor, that URL is fetched as-is; it already
    /// carries the server's own paging parameters.
    pub async fn list_pokemon(&self, cursor: Option<&str>) -> Result<PokemonPage, Error> {
        let page: PokemonPage = match cursor {
            Some(url) => self.get(url, &[]).await?,
            None => {
                let url = format!("{}/pokemon", self.base_url);
                let params = [
                    ("limit", self.page_size.to_string()),
                    ("offset", "0".to_string()),
                ];
                self.get(&url, &params).await?
            }
        };
        debug!(
            count = page.results.len(),
            has_next = page.next.is_some(),
            "fetched listing page"
        );
        Ok(page)
    }

    /// Fetches a single species by its detail URL.
    pub async fn get_pokemon(&self, url: &str) -> Result<Pokemon, Error> {
        let pokemon: Pokemon = self.get(url, &[]).await?;
        debug!(name = %pokemon.name, "fetched detail");
        Ok(pokemon)
    }
}
