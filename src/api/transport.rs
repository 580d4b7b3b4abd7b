//! HTTP transport used by the dispatcher.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use std::future::Future;
use std::time::Duration;

use super::error::{ApiError, Result};

/// An outgoing request with an absolute URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: Method,
  pub url: String,
  pub headers: HeaderMap,
}

/// A response with its body read as text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub body: String,
}

/// Something that can perform a single HTTP exchange.
pub trait Transport: Send + Sync {
  fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
  client: Client,
}

impl HttpTransport {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("myq/", env!("CARGO_PKG_VERSION")))
      .timeout(timeout)
      .build()?;

    Ok(Self { client })
  }
}

impl Transport for HttpTransport {
  fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send {
    let builder = self
      .client
      .request(request.method, &request.url)
      .headers(request.headers);

    async move {
      let response = builder.send().await.map_err(ApiError::Network)?;
      let status = response.status();
      let body = response.text().await.map_err(ApiError::Network)?;
      Ok(HttpResponse { status, body })
    }
  }
}
