//! Customer records extracted from source documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifies one verification job across every component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("req-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The closed set of source document kinds a job cross-checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    BankStatement,
    CreditReport,
}

impl DocumentKind {
    /// Every kind a job must produce before verification can run.
    pub const ALL: [DocumentKind; 2] = [DocumentKind::BankStatement, DocumentKind::CreditReport];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::BankStatement => "bank_statement",
            DocumentKind::CreditReport => "credit_report",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity fields extracted from a single document.
///
/// Immutable once stored: the hub keeps one record per
/// `(request id, document kind)` pair and a later extraction overwrites
/// the whole record, never patches it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer name as it appears on the document.
    pub name: String,
    /// Customer address as it appears on the document.
    pub address: String,
    /// Which document this record came from.
    pub document_kind: DocumentKind,
    /// When extraction completed.
    pub extracted_at: DateTime<Utc>,
    /// Extractor confidence in [0, 1].
    pub confidence_score: f64,
    /// Free-form provenance (source parser, server name).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CustomerRecord {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        document_kind: DocumentKind,
        confidence_score: f64,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            document_kind,
            extracted_at: Utc::now(),
            confidence_score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
