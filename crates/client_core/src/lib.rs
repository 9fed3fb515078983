use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Intern, InternId},
    protocol::{intern_path, CreateThreadRequest, ThreadCreated, INTERNS_PATH, THREADS_PATH},
};
use tracing::{debug, warn};

pub mod controller;
pub mod error;
pub mod filters;
pub mod ports;
pub mod query_cache;

pub use controller::{
    events::{PageCommand, PageEvent},
    orchestration::InternsPage,
    reducer::{InternRow, PageState, PageView},
};
pub use error::ApiFailure;
pub use filters::{FilterField, InternFilters, INTERNS_SCOPE};
pub use ports::{Confirmer, FixedConfirmer, Navigator, Notifier, PagePorts};
pub use query_cache::{QueryCache, QueryKey};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend operations the interns page relies on.
#[async_trait]
pub trait InternsApi: Send + Sync {
    /// `query` is an already-encoded query string, possibly empty.
    async fn list_interns(&self, query: &str) -> Result<Vec<Intern>, ApiFailure>;
    async fn delete_intern(&self, intern_id: InternId) -> Result<(), ApiFailure>;
    async fn create_thread(&self, intern_id: InternId) -> Result<ThreadCreated, ApiFailure>;
}

#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct HttpInternsApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpInternsApi {
    pub fn new(options: ApiOptions) -> Result<Self, ApiFailure> {
        let http = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token: options.token.filter(|token| !token.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}{INTERNS_PATH}", self.base_url)
        } else {
            format!("{}{INTERNS_PATH}?{query}", self.base_url)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiFailure> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "api request rejected");
        Err(ApiFailure::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl InternsApi for HttpInternsApi {
    async fn list_interns(&self, query: &str) -> Result<Vec<Intern>, ApiFailure> {
        let url = self.list_url(query);
        debug!(%url, "fetching interns");
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    async fn delete_intern(&self, intern_id: InternId) -> Result<(), ApiFailure> {
        let url = format!("{}{}", self.base_url, intern_path(intern_id));
        debug!(%url, intern_id = intern_id.0, "deleting intern");
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn create_thread(&self, intern_id: InternId) -> Result<ThreadCreated, ApiFailure> {
        let url = format!("{}{THREADS_PATH}", self.base_url);
        debug!(%url, intern_id = intern_id.0, "starting thread");
        let response = self
            .send(self.http.post(url).json(&CreateThreadRequest { intern_id }))
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
