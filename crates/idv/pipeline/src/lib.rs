//! End-to-end document verification pipeline.
//!
//! Wires the extraction, coordinator, and supervisor servers onto a shared
//! [`DataHub`] and drives a request through them with a [`ToolClient`]:
//! both extractions fan out concurrently, verification waits on the hub for
//! completeness, and the supervisor turns the verification result into a
//! [`SupervisorDecision`].

#![deny(unsafe_code)]

use futures::future::join;
use idv_agents::{BankStatementServer, CoordinatorServer, CreditReportServer, SupervisorServer};
use idv_hub::DataHub;
use idv_protocol::{ToolClient, ToolError};
use idv_types::{FullReport, RequestId, SupervisorDecision, VerificationJob};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Timing knobs for the servers the pipeline hosts. The defaults mirror
/// production document sources; tests shrink them to zero.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// Simulated extraction latency for bank statements.
    pub bank_extraction_delay: Duration,
    /// Simulated extraction latency for credit reports.
    pub credit_extraction_delay: Duration,
    /// Bound on how long verification waits for both documents.
    pub verification_wait_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bank_extraction_delay: Duration::from_millis(1000),
            credit_extraction_delay: Duration::from_millis(1200),
            verification_wait_timeout: CoordinatorServer::DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// A fully wired verification system: one hub, four servers, one client.
pub struct VerificationPipeline {
    hub: Arc<DataHub>,
    client: ToolClient,
}

impl VerificationPipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let hub = Arc::new(DataHub::new());
        let mut client = ToolClient::new();

        client.register_server(Arc::new(BankStatementServer::with_extraction_delay(
            Arc::clone(&hub),
            config.bank_extraction_delay,
        )));
        client.register_server(Arc::new(CreditReportServer::with_extraction_delay(
            Arc::clone(&hub),
            config.credit_extraction_delay,
        )));
        client.register_server(Arc::new(CoordinatorServer::with_wait_timeout(
            Arc::clone(&hub),
            config.verification_wait_timeout,
        )));
        client.register_server(Arc::new(SupervisorServer::new(Arc::clone(&hub))));

        Self { hub, client }
    }

    /// The hub backing this pipeline. Exposed so callers can inspect
    /// intermediate state or subscribe to events.
    pub fn hub(&self) -> &Arc<DataHub> {
        &self.hub
    }

    /// Run one request through extraction, verification, and decision.
    ///
    /// The two extractions run concurrently; verification starts only after
    /// both succeed, so its completeness wait never spends its full timeout
    /// on the happy path.
    pub async fn process_documents(
        &self,
        request_id: RequestId,
        bank_statement: &str,
        credit_report: &str,
    ) -> Result<SupervisorDecision, ToolError> {
        tracing::info!(request_id = %request_id, "Starting document verification");

        let bank = self.client.call_tool(
            BankStatementServer::NAME,
            "extract_customer_info",
            json!({ "request_id": request_id, "document_content": bank_statement }),
        );
        let credit = self.client.call_tool(
            CreditReportServer::NAME,
            "extract_customer_info",
            json!({ "request_id": request_id, "document_content": credit_report }),
        );
        // Both extractions run to completion even if one fails; a failure
        // surfaces only after the sibling has finished.
        let (bank, credit) = join(bank, credit).await;
        bank?;
        credit?;

        let verification = self
            .client
            .call_tool(
                CoordinatorServer::NAME,
                "verify_documents",
                json!({ "request_id": request_id }),
            )
            .await?;
        tracing::debug!(
            request_id = %request_id,
            overall_match = verification.get("overall_match").and_then(serde_json::Value::as_bool),
            "Verification complete"
        );

        let decision = self
            .client
            .call_tool(
                SupervisorServer::NAME,
                "make_decision",
                json!({ "request_id": request_id }),
            )
            .await?;
        let decision: SupervisorDecision = serde_json::from_value(decision)
            .map_err(|e| ToolError::Execution(format!("Malformed decision payload: {e}")))?;

        tracing::info!(
            request_id = %request_id,
            action = ?decision.action,
            reason = %decision.reason,
            "Decision reached"
        );
        Ok(decision)
    }

    /// Run an externally supplied job. The job id becomes the request id,
    /// and documents are pulled from the two known task names; unknown
    /// tasks are ignored.
    pub async fn run_job(&self, job: &VerificationJob) -> Result<SupervisorDecision, ToolError> {
        let bank = Self::job_document(job, "verify_bank_statement")?;
        let credit = Self::job_document(job, "verify_credit_report")?;

        let outcome = self
            .process_documents(RequestId::new(job.job_id.clone()), bank, credit)
            .await;
        if let Err(error) = &outcome {
            tracing::warn!(job_id = %job.job_id, %error, "Job failed");
        }
        outcome
    }

    fn job_document<'a>(
        job: &'a VerificationJob,
        tool_name: &str,
    ) -> Result<&'a str, ToolError> {
        let task = job
            .task(tool_name)
            .ok_or_else(|| ToolError::MissingArgument(format!("task {tool_name}")))?;
        task.arguments
            .get("document_content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ToolError::MissingArgument(format!("{tool_name}.document_content"))
            })
    }

    /// Everything the hub holds for a request, including stages that never
    /// ran. Useful after a failed run to see how far processing got.
    pub async fn full_report(&self, request_id: &RequestId) -> FullReport {
        FullReport {
            request_id: request_id.clone(),
            customer_data: self.hub.get_customer_info(request_id).await,
            verification: self.hub.get_verification_result(request_id).await,
            decision: self.hub.get_supervisor_decision(request_id).await,
        }
    }

    /// Tool listing for every registered server, keyed by server name.
    pub async fn server_capabilities(&self) -> Result<BTreeMap<String, Vec<String>>, ToolError> {
        let mut capabilities = BTreeMap::new();
        for name in self.client.server_names() {
            let tools = self.client.list_tools(&name).await?;
            capabilities.insert(name, tools);
        }
        Ok(capabilities)
    }
}

impl Default for VerificationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
