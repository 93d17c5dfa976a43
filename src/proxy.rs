//! Same-origin request proxy.
//!
//! Everything under `/api/` is relayed to the configured backend base URL:
//! `GET /api/boards/3?x=1` becomes `GET {backend}/boards/3?x=1`. The proxy
//! keeps no state between requests. The backend's status and JSON body come
//! back unchanged; only a failure to get a usable answer at all is replaced
//! by a fixed 500 response.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};

pub struct ProxyState {
    http: reqwest::Client,
    backend_url: String,
}

pub type SharedProxy = Arc<ProxyState>;

impl ProxyState {
    pub fn new(backend_url: &str) -> anyhow::Result<SharedProxy> {
        reqwest::Url::parse(backend_url)
            .with_context(|| format!("Invalid backend URL: {}", backend_url))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("trellis-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Arc::new(Self {
            http,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }))
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Backend URL for an inbound request. The query string is kept on reads only.
    fn target(&self, method: &Method, uri: &Uri) -> String {
        let path = uri.path().strip_prefix("/api").unwrap_or(uri.path());
        match uri.query() {
            Some(query) if *method == Method::GET => {
                format!("{}{}?{}", self.backend_url, path, query)
            }
            _ => format!("{}{}", self.backend_url, path),
        }
    }
}

/// Generic body returned when the backend could not be reached or answered
/// with something that is not JSON.
pub fn fallback_message(method: &Method) -> &'static str {
    match *method {
        Method::POST => "Failed to create resource",
        Method::PUT => "Failed to update resource",
        Method::DELETE => "Failed to delete resource",
        _ => "Failed to fetch data",
    }
}

enum ProxyError {
    BadRequest(String),
    Upstream(&'static str),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ProxyError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

pub fn proxy_router() -> Router<SharedProxy> {
    // Other verbs are answered with 405 by the router.
    Router::new().route(
        "/api/{*path}",
        get(forward).post(forward).put(forward).delete(forward),
    )
}

async fn forward(
    State(state): State<SharedProxy>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let target = state.target(&method, &uri);
    let mut request = state.http.request(method.clone(), &target);

    if let Some(cookie) = headers.get(header::COOKIE) {
        request = request.header(header::COOKIE, cookie.clone());
    }

    if matches!(method, Method::POST | Method::PUT) && !body.is_empty() {
        let json: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ProxyError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        request = request.json(&json);
    }

    tracing::debug!(%method, %target, "forwarding");
    let upstream = request.send().await.map_err(|e| {
        tracing::error!(%method, %target, error = %e, "backend unreachable");
        ProxyError::Upstream(fallback_message(&method))
    })?;

    let status = upstream.status();
    let set_cookies: Vec<_> = upstream
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::error!(%method, %target, error = %e, "failed to read backend response");
        ProxyError::Upstream(fallback_message(&method))
    })?;

    let mut response = if bytes.is_empty() {
        Response::builder()
            .status(status)
            .body(Body::empty())
            .map_err(|_| ProxyError::Upstream(fallback_message(&method)))?
    } else {
        let json: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(
                %method,
                %target,
                status = status.as_u16(),
                error = %e,
                "backend sent non-JSON body"
            );
            ProxyError::Upstream(fallback_message(&method))
        })?;
        (status, Json(json)).into_response()
    };

    for cookie in set_cookies {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
