//! Supervisor decisions.

use crate::RequestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final action taken on a verified request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    AutoApprove,
    Reject,
    ManualReview,
}

/// The supervisor's ruling for one request. At most one per request id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupervisorDecision {
    pub request_id: RequestId,
    pub approved: bool,
    pub action: DecisionAction,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl SupervisorDecision {
    pub fn new(
        request_id: RequestId,
        approved: bool,
        action: DecisionAction,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            approved,
            action,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}
