//! Hyper-backed implementation of [`ComponentsApi`].
//!
//! Thin transport: build the request, decode the `{success, message,
//! data}` envelope, fold it into the failure taxonomy. Anything that
//! never yields a parseable envelope is a transport failure.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{header, Method, Request};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use pagecraft_common::{ApiEnvelope, ReorderItem, Section};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::contract::{require_data, require_ok, ComponentsApi, SectionPatch};
use crate::ApiFailure;

const ADMIN_PATH: &str = "/page-components/admin";

#[derive(Serialize)]
struct ReorderBody {
    items: Vec<ReorderItem>,
}

#[derive(Clone)]
pub struct HttpComponentsApi {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpComponentsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiEnvelope<T>, ApiFailure> {
        let uri = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %uri, "admin api request");

        let mut builder = Request::builder()
            .method(method)
            .uri(&uri)
            .header(header::ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(ApiFailure::transport)?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(ApiFailure::transport)?;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(ApiFailure::transport)?
            .to_bytes();

        serde_json::from_slice(&bytes).map_err(|_| ApiFailure::Transport {
            detail: format!("unexpected response (status {status})"),
        })
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, ApiFailure> {
        serde_json::to_vec(body).map_err(ApiFailure::transport)
    }
}

#[async_trait]
impl ComponentsApi for HttpComponentsApi {
    async fn list(&self, page_key: &str) -> Result<Vec<Section>, ApiFailure> {
        let path = format!("{ADMIN_PATH}?page_key={}", query_escape(page_key));
        let envelope = self.send(Method::GET, &path, None).await?;
        require_data(envelope)
    }

    async fn update(&self, id: i64, patch: SectionPatch) -> Result<Section, ApiFailure> {
        let body = Self::encode(&patch)?;
        let envelope = self
            .send(Method::PUT, &format!("{ADMIN_PATH}/{id}"), Some(body))
            .await?;
        require_data(envelope)
    }

    async fn duplicate(&self, id: i64) -> Result<Section, ApiFailure> {
        let envelope = self
            .send(Method::POST, &format!("{ADMIN_PATH}/{id}/duplicate"), None)
            .await?;
        require_data(envelope)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiFailure> {
        let envelope: ApiEnvelope<Value> = self
            .send(Method::DELETE, &format!("{ADMIN_PATH}/{id}"), None)
            .await?;
        require_ok(envelope)
    }

    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<(), ApiFailure> {
        let body = Self::encode(&ReorderBody { items })?;
        let envelope: ApiEnvelope<Value> = self
            .send(Method::POST, &format!("{ADMIN_PATH}/reorder"), Some(body))
            .await?;
        require_ok(envelope)
    }
}

/// Percent-encode a page key for the query string. Page keys are slugs in
/// practice; this keeps arbitrary input from breaking the URI.
fn query_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_escape_passes_slugs_through() {
        assert_eq!(query_escape("home"), "home");
        assert_eq!(query_escape("tools.image-resize_v2"), "tools.image-resize_v2");
    }

    #[test]
    fn test_query_escape_encodes_reserved_bytes() {
        assert_eq!(query_escape("a b&c"), "a%20b%26c");
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let api = HttpComponentsApi::new("http://localhost:9000/");
        assert_eq!(api.base_url, "http://localhost:9000");
    }
}
