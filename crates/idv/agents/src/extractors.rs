//! Document extractor servers.
//!
//! `extract_customer_info` parses identity fields out of raw document
//! text, stores the record in the hub, and returns it. Extraction
//! latency is simulated with a fixed delay to model real parsing I/O;
//! tests construct the servers with a zero delay.

use crate::extract::ExtractionProfile;
use async_trait::async_trait;
use idv_hub::DataHub;
use idv_protocol::{ToolArguments, ToolError, ToolHandler, ToolRegistry, ToolServer};
use idv_types::{CustomerRecord, RequestId};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct ExtractCustomerInfo {
    hub: Arc<DataHub>,
    profile: ExtractionProfile,
    server_name: &'static str,
    delay: Duration,
}

#[async_trait]
impl ToolHandler for ExtractCustomerInfo {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let request_id = RequestId::from(args.str_arg("request_id")?);
        let content = args.str_arg("document_content")?;

        tracing::info!(
            server = self.server_name,
            request_id = %request_id,
            "Processing document"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (name, address) = self.profile.extract(content);
        let record = CustomerRecord::new(name, address, self.profile.kind, self.profile.confidence)
            .with_metadata("source", self.profile.source)
            .with_metadata("server", self.server_name);

        self.hub
            .store_customer_info(request_id.clone(), record.clone())
            .await;
        tracing::info!(
            server = self.server_name,
            request_id = %request_id,
            customer = %record.name,
            "Extracted and stored customer record"
        );

        serde_json::to_value(record).map_err(|err| ToolError::Execution(err.to_string()))
    }
}

/// Format check for bank statements. Out of the verification core;
/// a deliberate content-substring stub.
struct ValidateDocument;

#[async_trait]
impl ToolHandler for ValidateDocument {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let content = args.str_arg("document_content")?;
        let valid = content.contains("BANK") && content.contains("Name:");
        Ok(json!({
            "valid": valid,
            "confidence": if valid { 0.9 } else { 0.3 },
            "issues": if valid { json!([]) } else { json!(["Missing required fields"]) },
        }))
    }
}

/// Credit score analysis stub with a fixed payload.
struct CalculateCreditScore;

#[async_trait]
impl ToolHandler for CalculateCreditScore {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        args.str_arg("document_content")?;
        Ok(json!({
            "score": 720,
            "rating": "Good",
            "factors": ["Payment history", "Credit utilization"],
        }))
    }
}

/// Extractor for bank statements.
pub struct BankStatementServer {
    registry: ToolRegistry,
}

impl BankStatementServer {
    pub const NAME: &'static str = "bank_statement";

    pub fn new(hub: Arc<DataHub>) -> Self {
        Self::with_extraction_delay(hub, Duration::from_millis(1000))
    }

    pub fn with_extraction_delay(hub: Arc<DataHub>, delay: Duration) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(
            "extract_customer_info",
            Arc::new(ExtractCustomerInfo {
                hub,
                profile: ExtractionProfile::bank_statement(),
                server_name: Self::NAME,
                delay,
            }),
        );
        registry.register("validate_document", Arc::new(ValidateDocument));
        Self { registry }
    }
}

#[async_trait]
impl ToolServer for BankStatementServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

/// Extractor for credit reports.
pub struct CreditReportServer {
    registry: ToolRegistry,
}

impl CreditReportServer {
    pub const NAME: &'static str = "credit_report";

    pub fn new(hub: Arc<DataHub>) -> Self {
        Self::with_extraction_delay(hub, Duration::from_millis(1200))
    }

    pub fn with_extraction_delay(hub: Arc<DataHub>, delay: Duration) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(
            "extract_customer_info",
            Arc::new(ExtractCustomerInfo {
                hub,
                profile: ExtractionProfile::credit_report(),
                server_name: Self::NAME,
                delay,
            }),
        );
        registry.register("calculate_credit_score", Arc::new(CalculateCreditScore));
        Self { registry }
    }
}

#[async_trait]
impl ToolServer for CreditReportServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_types::{DocumentKind, ProtocolRequest};

    fn bank(hub: &Arc<DataHub>) -> BankStatementServer {
        BankStatementServer::with_extraction_delay(Arc::clone(hub), Duration::ZERO)
    }

    #[tokio::test]
    async fn extraction_stores_the_record_and_returns_it() {
        let hub = Arc::new(DataHub::new());
        let server = bank(&hub);

        let request = ProtocolRequest::tool_call(
            "extract_customer_info",
            json!({
                "request_id": "req-1",
                "document_content": "Name: John Smith\nAddress: 1 Main St\n\nAcct",
            }),
            "c-1",
        );
        let response = server.handle_request(request).await;
        assert!(!response.is_error());

        let result = response.result.unwrap();
        assert_eq!(result["name"], "John Smith");
        assert_eq!(result["address"], "1 Main St");
        assert_eq!(result["document_kind"], "bank_statement");
        assert_eq!(result["confidence_score"], 0.95);

        let stored = hub.get_customer_info(&RequestId::from("req-1")).await;
        let record = &stored[&DocumentKind::BankStatement];
        assert_eq!(record.name, "John Smith");
        assert_eq!(record.metadata["source"], "bank_statement_parser");
    }

    #[tokio::test]
    async fn credit_extraction_uses_its_confidence_constant() {
        let hub = Arc::new(DataHub::new());
        let server = CreditReportServer::with_extraction_delay(Arc::clone(&hub), Duration::ZERO);

        let response = server
            .handle_request(ProtocolRequest::tool_call(
                "extract_customer_info",
                json!({
                    "request_id": "req-2",
                    "document_content": "Consumer Name: John Smith\nCurrent Address: 1 Main St\n\nSSN",
                }),
                "c-2",
            ))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["confidence_score"], 0.92);
        assert_eq!(result["document_kind"], "credit_report");
        assert!(!hub.is_data_complete(&RequestId::from("req-2")).await);
    }

    #[tokio::test]
    async fn missing_document_content_is_a_protocol_failure_without_side_effects() {
        let hub = Arc::new(DataHub::new());
        let server = bank(&hub);

        let response = server
            .handle_request(ProtocolRequest::tool_call(
                "extract_customer_info",
                json!({"request_id": "req-3"}),
                "c-3",
            ))
            .await;

        assert_eq!(
            response.error.as_deref(),
            Some("Missing required argument: document_content")
        );
        assert!(hub.get_customer_info(&RequestId::from("req-3")).await.is_empty());
    }

    #[tokio::test]
    async fn validate_document_flags_missing_fields() {
        let hub = Arc::new(DataHub::new());
        let server = bank(&hub);

        let ok = server
            .handle_request(ProtocolRequest::tool_call(
                "validate_document",
                json!({"document_content": "BANK OF EXAMPLE\nName: X"}),
                "c-4",
            ))
            .await
            .result
            .unwrap();
        assert_eq!(ok["valid"], true);
        assert_eq!(ok["confidence"], 0.9);

        let bad = server
            .handle_request(ProtocolRequest::tool_call(
                "validate_document",
                json!({"document_content": "not a statement"}),
                "c-5",
            ))
            .await
            .result
            .unwrap();
        assert_eq!(bad["valid"], false);
        assert_eq!(bad["issues"][0], "Missing required fields");
    }

    #[tokio::test]
    async fn calculate_credit_score_returns_the_stub_payload() {
        let hub = Arc::new(DataHub::new());
        let server = CreditReportServer::with_extraction_delay(hub, Duration::ZERO);

        let result = server
            .handle_request(ProtocolRequest::tool_call(
                "calculate_credit_score",
                json!({"document_content": "anything"}),
                "c-6",
            ))
            .await
            .result
            .unwrap();
        assert_eq!(result["score"], 720);
        assert_eq!(result["rating"], "Good");
    }
}
