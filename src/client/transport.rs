//! The network seam under [`SchoolDiggerClient`](super::SchoolDiggerClient).
//!
//! Production traffic goes through [`ReqwestTransport`]; tests substitute
//! their own implementation to count calls or inject connection failures.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use url::Url;

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failure below HTTP: the exchange never produced a status line.
#[derive(Debug, Clone)]
pub struct TransportFailure {
    pub cause: String,
    pub timed_out: bool,
}

impl TransportFailure {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            timed_out: false,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "timed out: {}", self.cause)
        } else {
            f.write_str(&self.cause)
        }
    }
}

pub trait Transport: Send + Sync + fmt::Debug {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("schooldigger-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawResponse, TransportFailure>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(failure_from_reqwest)?;
            let status = response.status().as_u16();
            let body = response.text().await;
            complete_exchange(status, body, failure_from_reqwest)
        })
    }
}

/// Pair a status with its body. Only a successful response needs the body
/// intact; an error status is still an HTTP answer when the body is lost.
fn complete_exchange<E>(
    status: u16,
    body: Result<String, E>,
    failure: impl FnOnce(E) -> TransportFailure,
) -> Result<RawResponse, TransportFailure> {
    match body {
        Ok(body) => Ok(RawResponse { status, body }),
        Err(err) if (200..300).contains(&status) => Err(failure(err)),
        Err(err) => {
            let lost = failure(err);
            tracing::debug!(status, cause = %lost, "Error response body could not be read");
            Ok(RawResponse {
                status,
                body: String::new(),
            })
        }
    }
}

fn failure_from_reqwest(err: reqwest::Error) -> TransportFailure {
    // reqwest embeds the full URL (credentials included) in its Display output.
    let err = err.without_url();
    TransportFailure {
        timed_out: err.is_timeout(),
        cause: err.to_string(),
    }
}
