use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{BrowserEngine, ResultRecord, ServiceHealth};

/// How a call to the local helper failed. `Rejected` carries the service's
/// own failure message; `Transport` covers network errors, non-success
/// statuses and unparseable bodies.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
}

/// Normalized result of looking up one registration code.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome {
    Success(ResultRecord),
    NeedCaptcha,
    NotFound,
    Failure(String),
}

/// HTTP surface of the local lookup helper. All lookups run inside the
/// helper's own browser-automation session; this client only speaks the
/// documented contract.
pub struct ServiceClient {
    base_url: String,
    http: reqwest::Client,
}

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    browser_ready: bool,
}

#[derive(Serialize)]
struct InitializeRequest {
    browser: BrowserEngine,
}

#[derive(Deserialize)]
struct InitializeResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    code: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    success: bool,
    data: Option<ResultRecord>,
    #[serde(default)]
    need_captcha: bool,
    #[serde(default)]
    not_found: bool,
    message: Option<String>,
}

#[derive(Serialize)]
struct BatchQueryRequest<'a> {
    codes: &'a [String],
}

#[derive(Deserialize)]
struct BatchQueryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<BatchItem>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(default)]
    success: bool,
    data: Option<ResultRecord>,
    message: Option<String>,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One health probe. Any failure mode (unreachable host, non-success
    /// status, malformed payload) collapses to an error; the caller treats
    /// all of them as disconnected.
    pub async fn health(&self) -> Result<ServiceHealth, CallError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CallError::Transport(format!(
                "health returned {}",
                response.status()
            )));
        }

        let payload: HealthResponse = response
            .json()
            .await
            .map_err(|e| CallError::Transport(format!("malformed health payload: {}", e)))?;

        Ok(ServiceHealth {
            reachable: true,
            browser_ready: payload.browser_ready,
        })
    }

    /// Asks the helper to start an automation session for `engine`. Safe to
    /// repeat; a later call simply replaces the session.
    pub async fn initialize(&self, engine: BrowserEngine) -> Result<(), CallError> {
        debug!("initialize: engine={}", engine.as_str());
        let response = self
            .http
            .post(format!("{}/initialize", self.base_url))
            .json(&InitializeRequest { browser: engine })
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Transport(format!(
                "initialize returned {}: {}",
                status, body
            )));
        }

        let reply: InitializeResponse = response
            .json()
            .await
            .map_err(|e| CallError::Transport(format!("malformed initialize reply: {}", e)))?;

        if reply.success {
            Ok(())
        } else {
            Err(CallError::Rejected(
                reply.message.unwrap_or_else(|| "initialize failed".to_string()),
            ))
        }
    }

    /// Looks up a single registration code. Every failure mode folds into the
    /// outcome; callers never retry automatically.
    pub async fn query(&self, code: &str) -> QueryOutcome {
        debug!("query: code=\"{}\"", code);
        let response = match self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&QueryRequest { code })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return QueryOutcome::Failure(e.to_string()),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return QueryOutcome::Failure(format!("query returned {}: {}", status, body));
        }

        let reply: QueryResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => return QueryOutcome::Failure(format!("malformed query reply: {}", e)),
        };

        if reply.success {
            match reply.data {
                Some(record) => QueryOutcome::Success(record),
                None => QueryOutcome::Failure("reply carried no record".to_string()),
            }
        } else if reply.need_captcha {
            QueryOutcome::NeedCaptcha
        } else if reply.not_found {
            QueryOutcome::NotFound
        } else {
            QueryOutcome::Failure(
                reply.message.unwrap_or_else(|| "query failed".to_string()),
            )
        }
    }

    /// Submits the whole batch in one round trip. The service does not echo
    /// codes back, so the returned outcomes correspond positionally to
    /// `codes`.
    pub async fn batch_query(&self, codes: &[String]) -> Result<Vec<QueryOutcome>, CallError> {
        debug!("batch_query: {} codes", codes.len());
        let response = self
            .http
            .post(format!("{}/batch_query", self.base_url))
            .json(&BatchQueryRequest { codes })
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Transport(format!(
                "batch_query returned {}: {}",
                status, body
            )));
        }

        let reply: BatchQueryResponse = response
            .json()
            .await
            .map_err(|e| CallError::Transport(format!("malformed batch reply: {}", e)))?;

        if !reply.success {
            return Err(CallError::Rejected(
                reply.message.unwrap_or_else(|| "batch query failed".to_string()),
            ));
        }

        Ok(reply
            .results
            .into_iter()
            .map(|item| {
                if item.success {
                    match item.data {
                        Some(record) => QueryOutcome::Success(record),
                        None => QueryOutcome::Failure("reply carried no record".to_string()),
                    }
                } else {
                    QueryOutcome::Failure(
                        item.message.unwrap_or_else(|| "lookup failed".to_string()),
                    )
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_health_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"browser_ready": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let health = ServiceClient::new(server.uri()).health().await.unwrap();
        assert!(health.reachable);
        assert!(health.browser_ready);
    }

    #[tokio::test]
    async fn test_health_browser_ready_defaults_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let health = ServiceClient::new(server.uri()).health().await.unwrap();
        assert!(health.reachable);
        assert!(!health.browser_ready);
    }

    #[tokio::test]
    async fn test_health_error_status_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"browser_ready": true})),
            )
            .mount(&server)
            .await;

        // Body content must not matter once the status is non-success.
        let result = ServiceClient::new(server.uri()).health().await;
        assert!(matches!(result, Err(CallError::Transport(_))));
    }

    #[tokio::test]
    async fn test_health_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json"))
            .mount(&server)
            .await;

        let result = ServiceClient::new(server.uri()).health().await;
        assert!(matches!(result, Err(CallError::Transport(_))));
    }

    #[tokio::test]
    async fn test_health_unreachable_host() {
        let client = ServiceClient::new("http://127.0.0.1:1");
        assert!(matches!(client.health().await, Err(CallError::Transport(_))));
    }

    #[tokio::test]
    async fn test_initialize_sends_engine_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initialize"))
            .and(body_json(serde_json::json!({"browser": "edge"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = ServiceClient::new(server.uri())
            .initialize(BrowserEngine::Edge)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_initialize_rejected_carries_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initialize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "message": "driver missing"}),
            ))
            .mount(&server)
            .await;

        let result = ServiceClient::new(server.uri())
            .initialize(BrowserEngine::Firefox)
            .await;
        match result {
            Err(CallError::Rejected(msg)) => assert_eq!(msg, "driver missing"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_initialize_transport_error() {
        let client = ServiceClient::new("http://127.0.0.1:1");
        let result = client.initialize(BrowserEngine::Chrome).await;
        assert!(matches!(result, Err(CallError::Transport(_))));
    }

    #[tokio::test]
    async fn test_query_success_keeps_field_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(serde_json::json!({"code": "C1030522000160"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"登记编码": "C1030522000160", "产品名称": "稳健增利", "风险等级": "二级"}
            })))
            .mount(&server)
            .await;

        let outcome = ServiceClient::new(server.uri()).query("C1030522000160").await;
        match outcome {
            QueryOutcome::Success(record) => {
                let fields: Vec<&String> = record.keys().collect();
                assert_eq!(fields, ["登记编码", "产品名称", "风险等级"]);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_need_captcha() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "need_captcha": true}),
            ))
            .mount(&server)
            .await;

        let outcome = ServiceClient::new(server.uri()).query("X").await;
        assert_eq!(outcome, QueryOutcome::NeedCaptcha);
    }

    #[tokio::test]
    async fn test_query_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "not_found": true}),
            ))
            .mount(&server)
            .await;

        let outcome = ServiceClient::new(server.uri()).query("X").await;
        assert_eq!(outcome, QueryOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_query_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "message": "session expired"}),
            ))
            .mount(&server)
            .await;

        let outcome = ServiceClient::new(server.uri()).query("X").await;
        assert_eq!(outcome, QueryOutcome::Failure("session expired".to_string()));
    }

    #[tokio::test]
    async fn test_query_transport_error_is_failure_outcome() {
        let outcome = ServiceClient::new("http://127.0.0.1:1").query("X").await;
        assert!(matches!(outcome, QueryOutcome::Failure(_)));
    }

    #[tokio::test]
    async fn test_batch_query_positional_outcomes() {
        let server = MockServer::start().await;
        let codes = vec!["A1".to_string(), "A2".to_string(), "A3".to_string()];
        Mock::given(method("POST"))
            .and(path("/batch_query"))
            .and(body_json(serde_json::json!({"codes": ["A1", "A2", "A3"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "results": [
                    {"success": true, "data": {"产品名称": "第一"}},
                    {"success": false, "message": "页面超时"},
                    {"success": true, "data": {"产品名称": "第三"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcomes = ServiceClient::new(server.uri())
            .batch_query(&codes)
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], QueryOutcome::Success(_)));
        assert_eq!(outcomes[1], QueryOutcome::Failure("页面超时".to_string()));
        assert!(matches!(outcomes[2], QueryOutcome::Success(_)));
    }

    #[tokio::test]
    async fn test_batch_query_rejected_as_whole() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/batch_query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "message": "browser session lost"}),
            ))
            .mount(&server)
            .await;

        let result = ServiceClient::new(server.uri())
            .batch_query(&["A1".to_string()])
            .await;
        match result {
            Err(CallError::Rejected(msg)) => assert_eq!(msg, "browser session lost"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
