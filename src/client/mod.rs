//! Authenticated access to the SchoolDigger REST API.
//!
//! [`SchoolDiggerClient::call`] injects credentials, bounds every attempt with
//! a timeout, retries transport failures and translates HTTP outcomes into
//! [`SchoolDiggerError`]. [`SchoolDiggerClient::execute`] runs a whole tool
//! call: validate, fetch, normalize.

pub mod config;
pub mod credentials;
pub mod transport;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, SchoolDiggerError};
use crate::normalize::{normalize, Normalized};
use crate::operations::{ApiRequest, Operation};

pub use config::{ClientConfig, RetryConfig};
pub use credentials::Credentials;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportFailure};

#[derive(Debug, Clone)]
pub struct SchoolDiggerClient {
    credentials: Credentials,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl SchoolDiggerClient {
    /// Client backed by reqwest with the configured timeout.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout).map_err(|e| {
            SchoolDiggerError::Configuration(format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate, fetch and normalize one operation.
    pub async fn execute(&self, operation: &Operation) -> Result<Normalized> {
        let request = operation.to_request()?;
        let raw = self.call(&request).await?;
        normalize(operation.kind(), &raw)
    }

    /// Issue an authenticated GET and decode the JSON body.
    pub async fn call(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.build_url(request)?;
        let retry = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(path = %request.path, attempt, "GET SchoolDigger");

            match self.transport.get(&url).await {
                Ok(response) if response.is_success() => {
                    return serde_json::from_str(&response.body).map_err(|e| {
                        SchoolDiggerError::Parse(format!("{} returned invalid JSON: {e}", request.path))
                    });
                }
                Ok(response) => {
                    warn!(
                        path = %request.path,
                        status = response.status,
                        "SchoolDigger request failed"
                    );
                    return Err(SchoolDiggerError::upstream(response.status, &response.body));
                }
                Err(failure) if attempt <= retry.max_retries => {
                    let backoff = retry.backoff_for_attempt(attempt - 1);
                    warn!(
                        path = %request.path,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %failure,
                        "Transport failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(failure) => {
                    return Err(SchoolDiggerError::Transport {
                        cause: failure.to_string(),
                        attempts: attempt,
                    });
                }
            }
        }
    }

    fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.config.base_url.join(&request.path).map_err(|e| {
            SchoolDiggerError::validation("path", format!("cannot build URL for '{}': {e}", request.path))
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("appID", self.credentials.api_id())
                .append_pair("appKey", self.credentials.api_key());
            for (key, value) in &request.query {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a script of transport outcomes and records every URL.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<std::result::Result<RawResponse, TransportFailure>>>,
        seen: Mutex<Vec<Url>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<std::result::Result<RawResponse, TransportFailure>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn get<'a>(
            &'a self,
            url: &'a Url,
        ) -> BoxFuture<'a, std::result::Result<RawResponse, TransportFailure>> {
            self.seen.lock().unwrap().push(url.clone());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportFailure::new("script exhausted")));
            Box::pin(async move { next })
        }
    }

    fn ok(body: &str) -> std::result::Result<RawResponse, TransportFailure> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn fast_config() -> ClientConfig {
        ClientConfig {
            retry: RetryConfig {
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> SchoolDiggerClient {
        SchoolDiggerClient::with_transport(
            Credentials::new("id-1", "key-1").unwrap(),
            fast_config(),
            transport,
        )
    }

    fn request() -> ApiRequest {
        ApiRequest {
            path: "schools".into(),
            query: vec![("st", "CA".into()), ("city", "Palo Alto".into())],
        }
    }

    #[tokio::test]
    async fn credentials_come_first_in_query() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok("{}")]));
        client(transport.clone()).call(&request()).await.unwrap();

        let url = transport.seen.lock().unwrap()[0].clone();
        assert_eq!(url.path(), "/v2.3/schools");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("appID".into(), "id-1".into()));
        assert_eq!(pairs[1], ("appKey".into(), "key-1".into()));
        assert_eq!(pairs[3], ("city".into(), "Palo Alto".into()));
    }

    #[tokio::test]
    async fn retries_transport_failures_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::new("connection reset by peer")),
            Err(TransportFailure::new("connection reset by peer")),
            ok(r#"{"numberOfSchools": 0, "schoolList": []}"#),
        ]));
        let value = client(transport.clone()).call(&request()).await.unwrap();
        assert_eq!(value["numberOfSchools"], 0);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::new("reset")),
            Err(TransportFailure::new("reset")),
            Err(TransportFailure::new("reset")),
            ok("{}"),
        ]));
        let err = client(transport.clone()).call(&request()).await.unwrap_err();
        match err {
            SchoolDiggerError::Transport { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(RawResponse {
                status: 500,
                body: "Internal Server Error".into(),
            }),
            ok("{}"),
        ]));
        let err = client(transport.clone()).call(&request()).await.unwrap_err();
        match err {
            SchoolDiggerError::Upstream {
                status_code,
                body_excerpt,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(body_excerpt, "Internal Server Error");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok("<html>oops</html>"), ok("{}")]));
        let err = client(transport.clone()).call(&request()).await.unwrap_err();
        assert!(matches!(err, SchoolDiggerError::Parse(_)));
        assert_eq!(transport.calls(), 1);
    }
}
