//! Verification outcomes produced by the coordinator.

use crate::{CustomerRecord, RequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Banded classification of a single field comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    ExactMatch,
    PartialMatch,
    Mismatch,
}

impl MatchResult {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, MatchResult::Mismatch)
    }
}

/// Raw inputs and similarity scores behind a verification result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationDetails {
    pub bank_statement: CustomerRecord,
    pub credit_report: CustomerRecord,
    pub name_similarity: f64,
    pub address_similarity: f64,
}

/// Cross-document verification outcome for one request.
///
/// At most one exists per request id; the latest stored result overwrites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub request_id: RequestId,
    pub name_match: MatchResult,
    pub address_match: MatchResult,
    /// Always `name_match != Mismatch && address_match != Mismatch`.
    pub overall_match: bool,
    /// Mean of the two field similarities.
    pub confidence_score: f64,
    pub details: VerificationDetails,
    pub timestamp: DateTime<Utc>,
}

impl VerificationResult {
    /// Build a result, deriving `overall_match` from the field
    /// classifications so the invariant cannot be constructed away.
    pub fn new(
        request_id: RequestId,
        name_match: MatchResult,
        address_match: MatchResult,
        confidence_score: f64,
        details: VerificationDetails,
    ) -> Self {
        Self {
            request_id,
            name_match,
            address_match,
            overall_match: !name_match.is_mismatch() && !address_match.is_mismatch(),
            confidence_score,
            details,
            timestamp: Utc::now(),
        }
    }
}
