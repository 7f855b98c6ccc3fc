//! Anchor-based field extraction from raw document text.

use idv_types::DocumentKind;
use regex::Regex;

/// Per-document-kind extraction rules: the field anchors, the fixed
/// extractor confidence, and a provenance label. Regexes compile once
/// at server construction.
pub(crate) struct ExtractionProfile {
    pub kind: DocumentKind,
    pub confidence: f64,
    pub source: &'static str,
    name_re: Regex,
    address_re: Regex,
}

impl ExtractionProfile {
    pub fn bank_statement() -> Self {
        Self {
            kind: DocumentKind::BankStatement,
            confidence: 0.95,
            source: "bank_statement_parser",
            name_re: Regex::new(r"Name:\s*(.+?)(?:\n|$)").expect("static regex"),
            address_re: Regex::new(r"(?s)Address:\s*(.+?)(?:\n\n|Account)").expect("static regex"),
        }
    }

    pub fn credit_report() -> Self {
        Self {
            kind: DocumentKind::CreditReport,
            confidence: 0.92,
            source: "credit_report_parser",
            name_re: Regex::new(r"Consumer Name:\s*(.+?)(?:\n|$)").expect("static regex"),
            address_re: Regex::new(r"(?s)Current Address:\s*(.+?)(?:\n\n|SSN)")
                .expect("static regex"),
        }
    }

    /// Extract `(name, address)`. Anchors are case-sensitive, the first
    /// match wins, and a missing field degrades to `"Unknown"` rather
    /// than failing.
    pub fn extract(&self, content: &str) -> (String, String) {
        let name = self
            .name_re
            .captures(content)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let address = self
            .address_re
            .captures(content)
            .map(|c| c[1].trim().replace('\n', ", "))
            .unwrap_or_else(|| "Unknown".to_string());

        (name, address)
    }
}
