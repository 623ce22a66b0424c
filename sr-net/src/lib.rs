//! HTTP side of skin rendering: profile lookups and texture downloads.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use sr_utils::{RenderConfig, SkinError, SkinResult};
use tracing::debug;

mod profile;
mod texture;


pub use profile::*;
pub use texture::*;

const USER_AGENT: &str = concat!("skinrender/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct NetClient {
    http: Client,
    name_service_url: String,
    session_service_url: String,
    cape_service_url: String,
    timeout: Duration,
}

impl NetClient {
    pub fn new(config: &RenderConfig) -> SkinResult<Self> {
        let timeout = config.network_timeout();
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SkinError::fetch_failed(format!("http client: {e}")))?;
        Ok(Self {
            http,
            name_service_url: trim_base(&config.name_service_url),
            session_service_url: trim_base(&config.session_service_url),
            cape_service_url: trim_base(&config.cape_service_url),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url`, returning the status and the whole body.
    async fn fetch(&self, url: &str) -> SkinResult<(StatusCode, Vec<u8>)> {
        debug!(%url, "GET");
        self.deadline(url, async {
            let response = self.http.get(url).send().await.map_err(|e| transport(url, e))?;
            let status = response.status();
            let body = response.bytes().await.map_err(|e| transport(url, e))?;
            Ok((status, body.to_vec()))
        })
        .await
    }

    async fn deadline<T>(
        &self,
        url: &str,
        fut: impl Future<Output = SkinResult<T>>,
    ) -> SkinResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SkinError::timeout(format!("GET {url}"))),
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn transport(url: &str, err: reqwest::Error) -> SkinError {
    if err.is_timeout() {
        SkinError::timeout(format!("GET {url}"))
    } else {
        SkinError::fetch_failed(format!("GET {url}: {err}"))
    }
}
