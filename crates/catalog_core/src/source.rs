use std::time::Duration;

use async_trait::async_trait;
use catalog_types::{
    domain::ProductId,
    protocol::{ListPagePayload, RequestDescriptor},
};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Where product pages and single products come from.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// `GET /products` with the descriptor as query parameters.
    async fn list_products(&self, request: &RequestDescriptor)
        -> Result<ListPagePayload, FetchError>;
    /// `GET /products/:id`, returned unshaped.
    async fn product(&self, id: &ProductId) -> Result<Value, FetchError>;
}

pub struct HttpProductSource {
    http: Client,
    base_url: Url,
}

impl HttpProductSource {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(server_url.trim())
            .map_err(|e| FetchError::InvalidEndpoint(format!("{server_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidEndpoint(server_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn list_products(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ListPagePayload, FetchError> {
        let url = self.endpoint(&["products"])?;
        debug!(%url, ?request, "catalog: requesting product page");
        let response = self.http.get(url).query(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn product(&self, id: &ProductId) -> Result<Value, FetchError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        debug!(%url, "catalog: requesting product detail");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { id: id.clone() });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
