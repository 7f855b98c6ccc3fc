//! The coordinator server: cross-document verification.

use async_trait::async_trait;
use idv_hub::DataHub;
use idv_match::{compare_field, similarity, verify, MatchThresholds};
use idv_protocol::{ToolArguments, ToolError, ToolHandler, ToolRegistry, ToolServer};
use idv_types::{DocumentKind, RequestId};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct VerifyDocuments {
    hub: Arc<DataHub>,
    wait_timeout: Duration,
}

#[async_trait]
impl ToolHandler for VerifyDocuments {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let request_id = RequestId::from(args.str_arg("request_id")?);
        tracing::info!(server = CoordinatorServer::NAME, request_id = %request_id, "Verifying documents");

        // Bounded event wait; completes immediately when both records
        // already landed, and tolerates out-of-band arrivals.
        self.hub
            .wait_for_documents(&request_id, self.wait_timeout)
            .await
            .map_err(|err| ToolError::Execution(err.to_string()))?;

        let mut records = self.hub.get_customer_info(&request_id).await;
        let bank = records
            .remove(&DocumentKind::BankStatement)
            .ok_or_else(|| ToolError::NotFound(format!("No bank statement record for request {request_id}")))?;
        let credit = records
            .remove(&DocumentKind::CreditReport)
            .ok_or_else(|| ToolError::NotFound(format!("No credit report record for request {request_id}")))?;

        let result = verify(request_id.clone(), bank, credit);
        self.hub.store_verification_result(result.clone()).await;
        tracing::info!(
            server = CoordinatorServer::NAME,
            request_id = %request_id,
            name_match = ?result.name_match,
            address_match = ?result.address_match,
            "Verification completed"
        );

        serde_json::to_value(result).map_err(|err| ToolError::Execution(err.to_string()))
    }
}

struct CompareFields;

#[async_trait]
impl ToolHandler for CompareFields {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let field1 = args.str_arg("field1")?;
        let field2 = args.str_arg("field2")?;
        let field_type = args.str_arg("field_type")?;

        let thresholds = match field_type {
            "name" => MatchThresholds::NAME,
            _ => MatchThresholds::ADDRESS,
        };
        let comparison = compare_field(field1, field2, thresholds);

        Ok(json!({
            "similarity": comparison.similarity,
            "match_result": comparison.result,
            "field_type": field_type,
        }))
    }
}

struct CalculateSimilarity;

#[async_trait]
impl ToolHandler for CalculateSimilarity {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let str1 = args.str_arg("str1")?;
        let str2 = args.str_arg("str2")?;
        Ok(json!(similarity(str1, str2)))
    }
}

/// Coordinates verification once both extractions have landed.
pub struct CoordinatorServer {
    registry: ToolRegistry,
}

impl CoordinatorServer {
    pub const NAME: &'static str = "coordinator";

    /// Default bound on the completion wait.
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(hub: Arc<DataHub>) -> Self {
        Self::with_wait_timeout(hub, Self::DEFAULT_WAIT_TIMEOUT)
    }

    pub fn with_wait_timeout(hub: Arc<DataHub>, wait_timeout: Duration) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(
            "verify_documents",
            Arc::new(VerifyDocuments { hub, wait_timeout }),
        );
        registry.register("compare_fields", Arc::new(CompareFields));
        registry.register("calculate_similarity", Arc::new(CalculateSimilarity));
        Self { registry }
    }
}

#[async_trait]
impl ToolServer for CoordinatorServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
