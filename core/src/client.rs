//! Request building, execution and response decoding for the case API.
//!
//! # Design
//! `Client` holds the base URL, the page size and a `Transport`. Building a
//! request (`new_request`) is pure and validates the base URL, so a bad
//! configuration fails before any I/O. `execute` performs the round trip
//! under a `Context` and decodes the body, returning the raw response next to
//! the decoded value.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cases::CasesServiceOp;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone)]
pub struct Client<T> {
    base_url: String,
    page_size: i64,
    transport: T,
}

impl Client<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::with_timeout(Duration::from_millis(config.timeout_ms))?;
        Ok(Self::new(&config.base_url, config.page_size, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(base_url: &str, page_size: i64, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
            transport,
        }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn cases(&self) -> CasesServiceOp<'_, T> {
        CasesServiceOp::new(self)
    }

    /// Build a body-less request for `path`, relative to the base URL.
    pub fn new_request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest, ApiError> {
        self.build(method, path, None)
    }

    /// Build a request carrying `body` encoded as JSON.
    pub fn new_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
        self.build(method, path, Some(body))
    }

    fn build(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid url {url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidRequest(format!(
                "unsupported url scheme {:?}",
                parsed.scheme()
            )));
        }

        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send `request` and decode the response body as `D`.
    ///
    /// The context is checked before sending and raced against the round
    /// trip. Errors from status checking or decoding carry the response.
    pub async fn execute<D: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: HttpRequest,
    ) -> Result<(D, HttpResponse), ApiError> {
        ctx.check()?;
        debug!(method = %request.method, url = %request.url, "Sending request");

        let response = tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            result = self.transport.send(request) => result?,
        };
        debug!(status = response.status, bytes = response.body.len(), "Received response");

        self.parse_response(response)
    }

    pub fn parse_response<D: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<(D, HttpResponse), ApiError> {
        let response = check_status(response)?;
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok((value, response)),
            Err(source) => Err(ApiError::Deserialization { source, response }),
        }
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 404 {
        return Err(ApiError::NotFound { response });
    }
    Err(ApiError::Status { response })
}
