use log::{info, warn};
use thiserror::Error;

use crate::client::{CallError, QueryOutcome, ServiceClient};
use crate::state::{BrowserEngine, ResultRecord, ServiceHealth};

/// Hard ceiling on one batch submission, enforced before any request leaves
/// the machine.
pub const MAX_BATCH_CODES: usize = 50;

/// Everything a user action can fail with. Each variant maps to one
/// transient status message; none of them are fatal to the session.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("service not connected")]
    NotConnected,
    #[error("browser not initialized")]
    NotInitialized,
    #[error("no registration code entered")]
    EmptyCode,
    #[error("no valid registration codes in input")]
    EmptyBatch,
    #[error("batch limited to {MAX_BATCH_CODES} codes, got {0}")]
    BatchTooLarge(usize),
    #[error("{0}")]
    Service(String),
    #[error("{0}")]
    Transport(String),
}

impl From<CallError> for CommandError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Rejected(msg) => CommandError::Service(msg),
            CallError::Transport(msg) => CommandError::Transport(msg),
        }
    }
}

/// Outcome list of one batch submission, positionally matched to the codes
/// that were sent.
pub struct BatchReport {
    pub outcomes: Vec<QueryOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, QueryOutcome::Success(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Successful records in submission order; this becomes the new result
    /// set when at least one lookup succeeded.
    pub fn records(&self) -> Vec<ResultRecord> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                QueryOutcome::Success(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Splits the batch textarea into trimmed, non-empty lines and enforces the
/// `[1, MAX_BATCH_CODES]` bound. Runs before any network traffic.
pub fn parse_batch_input(raw: &str) -> Result<Vec<String>, CommandError> {
    let codes: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if codes.is_empty() {
        return Err(CommandError::EmptyBatch);
    }
    if codes.len() > MAX_BATCH_CODES {
        return Err(CommandError::BatchTooLarge(codes.len()));
    }
    Ok(codes)
}

/// Starts (or restarts) the helper's automation session. Fails fast without
/// a request while the service is unreachable.
pub async fn initialize_browser(
    client: &ServiceClient,
    engine: BrowserEngine,
    health: ServiceHealth,
) -> Result<(), CommandError> {
    if !health.reachable {
        return Err(CommandError::NotConnected);
    }
    info!("initialize_browser: engine={}", engine.as_str());
    client.initialize(engine).await?;
    Ok(())
}

pub async fn query_single(
    client: &ServiceClient,
    raw: &str,
    health: ServiceHealth,
) -> Result<QueryOutcome, CommandError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(CommandError::EmptyCode);
    }
    if !health.browser_ready {
        return Err(CommandError::NotInitialized);
    }
    Ok(client.query(code).await)
}

pub async fn query_batch(
    client: &ServiceClient,
    raw: &str,
    health: ServiceHealth,
) -> Result<BatchReport, CommandError> {
    if raw.trim().is_empty() {
        return Err(CommandError::EmptyBatch);
    }
    if !health.browser_ready {
        return Err(CommandError::NotInitialized);
    }
    let codes = parse_batch_input(raw)?;

    let outcomes = client.batch_query(&codes).await?;
    if outcomes.len() != codes.len() {
        // The contract promises one outcome per code; log the mismatch but
        // keep whatever positional prefix lines up.
        warn!(
            "batch reply length {} does not match {} submitted codes",
            outcomes.len(),
            codes.len()
        );
    }
    Ok(BatchReport { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connected_ready() -> ServiceHealth {
        ServiceHealth { reachable: true, browser_ready: true }
    }

    #[test]
    fn test_parse_batch_input_trims_and_filters() {
        let raw = "  C101\n\n\tC202  \n   \nC303\n";
        let codes = parse_batch_input(raw).unwrap();
        assert_eq!(codes, ["C101", "C202", "C303"]);
    }

    #[test]
    fn test_parse_batch_input_rejects_empty() {
        assert!(matches!(
            parse_batch_input("  \n \n"),
            Err(CommandError::EmptyBatch)
        ));
    }

    #[test]
    fn test_parse_batch_input_rejects_oversize() {
        let raw: String = (0..51).map(|i| format!("C{}\n", i)).collect();
        assert!(matches!(
            parse_batch_input(&raw),
            Err(CommandError::BatchTooLarge(51))
        ));
    }

    #[test]
    fn test_parse_batch_input_allows_exactly_fifty() {
        let raw: String = (0..50).map(|i| format!("C{}\n", i)).collect();
        assert_eq!(parse_batch_input(&raw).unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_initialize_refused_while_disconnected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initialize"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri());
        let result =
            initialize_browser(&client, BrowserEngine::Firefox, ServiceHealth::disconnected())
                .await;
        assert!(matches!(result, Err(CommandError::NotConnected)));
    }

    #[tokio::test]
    async fn test_query_single_requires_initialized_browser() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri());
        let health = ServiceHealth { reachable: true, browser_ready: false };
        let result = query_single(&client, "ABC123", health).await;
        assert!(matches!(result, Err(CommandError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_query_single_rejects_blank_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri());
        let result = query_single(&client, "   ", connected_ready()).await;
        assert!(matches!(result, Err(CommandError::EmptyCode)));
    }

    #[tokio::test]
    async fn test_query_batch_oversize_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/batch_query"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let raw: String = (0..51).map(|i| format!("C{}\n", i)).collect();
        let client = ServiceClient::new(server.uri());
        let result = query_batch(&client, &raw, connected_ready()).await;
        assert!(matches!(result, Err(CommandError::BatchTooLarge(51))));
    }

    #[tokio::test]
    async fn test_query_batch_partitions_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/batch_query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "results": [
                    {"success": true, "data": {"编码": "A1"}},
                    {"success": true, "data": {"编码": "A2"}},
                    {"success": false, "message": "timeout"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri());
        let report = query_batch(&client, "A1\nA2\nA3", connected_ready())
            .await
            .unwrap();
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.records().len(), 2);
        assert_eq!(
            crate::state::display_value(report.records()[0].get("编码")),
            "A1"
        );
    }

    #[tokio::test]
    async fn test_query_single_success_passes_record_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"登记编码": "ABC123"}
            })))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri());
        let outcome = query_single(&client, " ABC123 ", connected_ready())
            .await
            .unwrap();
        assert!(matches!(outcome, QueryOutcome::Success(_)));
    }
}
