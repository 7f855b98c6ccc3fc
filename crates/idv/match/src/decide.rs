//! The supervisor's rule table.

use idv_types::{DecisionAction, MatchResult, SupervisorDecision, VerificationResult};

/// Map a verification result to a decision. Rules are evaluated in
/// order; the first match wins.
///
/// 1. Both fields exact: approve automatically.
/// 2. Name mismatch: reject, regardless of the address. Name is the
///    critical field.
/// 3. Partial name, or address anything but exact: manual review.
/// 4. Fallback: manual review. Rule 3 already covers every remaining
///    combination, so this only answers for future rule changes.
pub fn decide(result: &VerificationResult) -> SupervisorDecision {
    let request_id = result.request_id.clone();

    if result.name_match == MatchResult::ExactMatch
        && result.address_match == MatchResult::ExactMatch
    {
        return SupervisorDecision::new(
            request_id,
            true,
            DecisionAction::AutoApprove,
            "All fields match exactly",
        );
    }

    if result.name_match == MatchResult::Mismatch {
        return SupervisorDecision::new(
            request_id,
            false,
            DecisionAction::Reject,
            "Name mismatch detected",
        );
    }

    if result.name_match == MatchResult::PartialMatch
        || result.address_match != MatchResult::ExactMatch
    {
        return SupervisorDecision::new(
            request_id,
            false,
            DecisionAction::ManualReview,
            format!(
                "Partial match detected (confidence: {:.2}%)",
                result.confidence_score * 100.0
            ),
        );
    }

    SupervisorDecision::new(
        request_id,
        false,
        DecisionAction::ManualReview,
        "Unable to determine automatically",
    )
}
