//! The seam between the gateway and the network.
//!
//! A `Transport` executes one `HttpRequest` and reports either the response
//! or the error that prevented one. It never interprets status codes; 4xx
//! and 5xx responses come back as `Ok` data.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, Payload, TransportResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// `reqwest`-backed transport.
///
/// Credentialed requests go through a client with a cookie store, so session
/// cookies set by the server are replayed on later calls. Uncredentialed
/// requests use a separate client that never stores or sends cookies.
/// No timeout is configured; reqwest's defaults apply.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    credentialed: Client,
    anonymous: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            credentialed: Client::builder().cookie_store(true).build()?,
            anonymous: Client::builder().build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, TransportError> {
        let client = if request.with_credentials {
            &self.credentialed
        } else {
            &self.anonymous
        };

        let url = request.full_url();
        trace!(method = request.method.as_str(), %url, "sending request");

        let mut builder = client.request(method(request.method), url);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body: Payload::Raw(text),
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}
