//! Field comparison and verification assembly.

use crate::similarity;
use idv_types::{CustomerRecord, MatchResult, RequestId, VerificationDetails, VerificationResult};

/// Exclusive banding thresholds for one field.
#[derive(Clone, Copy, Debug)]
pub struct MatchThresholds {
    /// `similarity >= exact` classifies as ExactMatch.
    pub exact: f64,
    /// `partial <= similarity < exact` classifies as PartialMatch.
    pub partial: f64,
}

impl MatchThresholds {
    /// Names are the critical field and carry tighter bands.
    pub const NAME: MatchThresholds = MatchThresholds {
        exact: 0.95,
        partial: 0.75,
    };
    pub const ADDRESS: MatchThresholds = MatchThresholds {
        exact: 0.90,
        partial: 0.70,
    };
}

/// Band a similarity score for a field.
pub fn classify(similarity: f64, thresholds: MatchThresholds) -> MatchResult {
    if similarity >= thresholds.exact {
        MatchResult::ExactMatch
    } else if similarity >= thresholds.partial {
        MatchResult::PartialMatch
    } else {
        MatchResult::Mismatch
    }
}

/// A single field comparison: the raw score and its classification.
#[derive(Clone, Copy, Debug)]
pub struct FieldComparison {
    pub similarity: f64,
    pub result: MatchResult,
}

pub fn compare_field(a: &str, b: &str, thresholds: MatchThresholds) -> FieldComparison {
    let similarity = similarity(a, b);
    FieldComparison {
        similarity,
        result: classify(similarity, thresholds),
    }
}

/// Cross-check the two records and assemble the verification result.
///
/// Overall confidence is the mean of the two field similarities;
/// `overall_match` follows from the field classifications.
pub fn verify(
    request_id: RequestId,
    bank: CustomerRecord,
    credit: CustomerRecord,
) -> VerificationResult {
    let name = compare_field(&bank.name, &credit.name, MatchThresholds::NAME);
    let address = compare_field(&bank.address, &credit.address, MatchThresholds::ADDRESS);
    let confidence = (name.similarity + address.similarity) / 2.0;

    let details = VerificationDetails {
        bank_statement: bank,
        credit_report: credit,
        name_similarity: name.similarity,
        address_similarity: address.similarity,
    };

    VerificationResult::new(request_id, name.result, address.result, confidence, details)
}
