//! Typed resource client for the board API.
//!
//! One accessor per resource (`client.boards()`, `client.cards()`, ...) and
//! one method per verb. Every method issues exactly one request through
//! [`ApiClient::execute`], which attaches the session cookie, decodes the
//! JSON body and folds any failure into [`ClientError::RequestFailed`].
//! There are no retries and no timeouts beyond reqwest's defaults.

pub mod assignees;
pub mod auth;
pub mod boards;
pub mod cards;
pub mod comments;
pub mod invites;
pub mod lists;
pub mod members;

use std::sync::Arc;

use anyhow::Context;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ClientError;

pub use assignees::AssigneesApi;
pub use auth::AuthApi;
pub use boards::BoardsApi;
pub use cards::CardsApi;
pub use comments::CommentsApi;
pub use invites::InvitesApi;
pub use lists::ListsApi;
pub use members::MembersApi;

const GENERIC_FAILURE: &str = "Request failed";

/// Cheap-to-clone handle; clones share the HTTP pool and the cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    origin: Url,
    jar: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_cookies(base_url, None)
    }

    /// Build a client and seed its jar from a saved `Cookie` header value.
    pub fn with_cookies(base_url: &str, cookie_header: Option<&str>) -> anyhow::Result<Self> {
        let origin = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        let jar = Arc::new(Jar::default());
        if let Some(header) = cookie_header {
            for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &origin);
            }
        }
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(concat!("trellis/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            origin,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current `Cookie` header for the API origin, if the backend set any.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn boards(&self) -> BoardsApi<'_> {
        BoardsApi { client: self }
    }

    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi { client: self }
    }

    pub fn cards(&self) -> CardsApi<'_> {
        CardsApi { client: self }
    }

    pub fn comments(&self) -> CommentsApi<'_> {
        CommentsApi { client: self }
    }

    pub fn members(&self) -> MembersApi<'_> {
        MembersApi { client: self }
    }

    pub fn assignees(&self) -> AssigneesApi<'_> {
        AssigneesApi { client: self }
    }

    pub fn invites(&self) -> InvitesApi<'_> {
        InvitesApi { client: self }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Base URL extended by `segments`, each percent-encoded as exactly one
    /// path segment.
    pub(crate) fn segment_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::request_failed(e.to_string(), None))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::request_failed("API base URL cannot take a path", None))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn builder(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.builder_at(method, self.url(endpoint))
    }

    fn builder_at(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.execute(self.builder(Method::GET, endpoint)).await
    }

    pub(crate) async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.builder(Method::POST, endpoint).json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, ClientError> {
        self.execute(self.builder(Method::POST, endpoint)).await
    }

    pub(crate) async fn post_empty_at<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        self.execute(self.builder_at(Method::POST, url)).await
    }

    pub(crate) async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.builder(Method::PUT, endpoint).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.execute(self.builder(Method::DELETE, endpoint)).await
    }

    /// Send the request and decode a 2xx JSON body as `T`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "request did not reach the backend");
            ClientError::request_failed(e.to_string(), None)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            ClientError::request_failed(e.to_string(), Some(status.as_u16()))
        })?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &bytes);
            tracing::debug!(status = status.as_u16(), %message, "backend rejected request");
            return Err(ClientError::request_failed(message, Some(status.as_u16())));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::request_failed(
                format!("Malformed response body: {}", e),
                Some(status.as_u16()),
            )
        })
    }
}

/// Best-effort message extraction from a non-2xx body.
///
/// Looks for `message`, then `detail`, then `error`. A body that is not JSON
/// yields the generic failure text; JSON without any of those fields yields
/// `HTTP <status>`.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return GENERIC_FAILURE.to_string(),
    };

    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
