//! The supervisor server: decisioning over verification results.

use async_trait::async_trait;
use chrono::Utc;
use idv_hub::DataHub;
use idv_match::decide;
use idv_protocol::{ToolArguments, ToolError, ToolHandler, ToolRegistry, ToolServer};
use idv_types::RequestId;
use serde_json::{json, Value};
use std::sync::Arc;

struct MakeDecision {
    hub: Arc<DataHub>,
}

#[async_trait]
impl ToolHandler for MakeDecision {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let request_id = RequestId::from(args.str_arg("request_id")?);
        tracing::info!(
            server = SupervisorServer::NAME,
            request_id = %request_id,
            "Reviewing verification result"
        );

        let result = self
            .hub
            .get_verification_result(&request_id)
            .await
            .ok_or_else(|| {
                ToolError::NotFound(format!(
                    "No verification result found for request {request_id}"
                ))
            })?;

        let decision = decide(&result);
        self.hub.store_supervisor_decision(decision.clone()).await;
        tracing::info!(
            server = SupervisorServer::NAME,
            request_id = %request_id,
            action = ?decision.action,
            reason = %decision.reason,
            "Decision made"
        );

        serde_json::to_value(decision).map_err(|err| ToolError::Execution(err.to_string()))
    }
}

struct ReviewCase {
    hub: Arc<DataHub>,
}

#[async_trait]
impl ToolHandler for ReviewCase {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let request_id = RequestId::from(args.str_arg("request_id")?);
        let result = self.hub.get_verification_result(&request_id).await;

        let confidence = result.as_ref().map(|r| r.confidence_score).unwrap_or(0.0);
        let recommendation = match &result {
            Some(r) if r.confidence_score < 0.8 => "Requires additional documentation",
            _ => "Approve",
        };

        Ok(json!({
            "request_id": request_id,
            "review_status": "completed",
            "confidence": confidence,
            "recommendation": recommendation,
        }))
    }
}

struct EscalateCase;

#[async_trait]
impl ToolHandler for EscalateCase {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError> {
        let request_id = args.str_arg("request_id")?;
        let reason = args.str_arg("reason")?;
        tracing::info!(
            server = SupervisorServer::NAME,
            request_id,
            reason,
            "Escalating case"
        );

        Ok(json!({
            "request_id": request_id,
            "escalated": true,
            "reason": reason,
            "escalated_at": Utc::now(),
        }))
    }
}

/// Rules on verification outcomes and records the final decision.
pub struct SupervisorServer {
    registry: ToolRegistry,
}

impl SupervisorServer {
    pub const NAME: &'static str = "supervisor";

    pub fn new(hub: Arc<DataHub>) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register("make_decision", Arc::new(MakeDecision { hub: Arc::clone(&hub) }));
        registry.register("review_case", Arc::new(ReviewCase { hub }));
        registry.register("escalate_case", Arc::new(EscalateCase));
        Self { registry }
    }
}

#[async_trait]
impl ToolServer for SupervisorServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
