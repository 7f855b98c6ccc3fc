//! Job-source and report shapes at the pipeline boundary.

use crate::{CustomerRecord, DocumentKind, RequestId, SupervisorDecision, VerificationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One task inside an externally supplied job. Consumers key on
/// `tool_name`; unknown names are skipped rather than rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobTask {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// A verification job as delivered by an external job source
/// (e.g. a filesystem watcher). Tasks may be missing or extra.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationJob {
    pub job_id: String,
    #[serde(default)]
    pub tasks: Vec<JobTask>,
}

impl VerificationJob {
    /// First task with the given tool name, if any.
    pub fn task(&self, tool_name: &str) -> Option<&JobTask> {
        self.tasks.iter().find(|t| t.tool_name == tool_name)
    }
}

/// Everything known about a request, read directly from the hub.
///
/// Stages that never ran are `None`, never defaulted, so partial progress
/// stays visible after a failed or skipped step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FullReport {
    pub request_id: RequestId,
    pub customer_data: HashMap<DocumentKind, CustomerRecord>,
    pub verification: Option<VerificationResult>,
    pub decision: Option<SupervisorDecision>,
}
