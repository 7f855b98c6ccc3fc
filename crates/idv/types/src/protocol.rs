//! Request/response envelope for named-tool invocation.
//!
//! Every operation between components travels in this envelope. A response
//! carries exactly one of `result` or `error`; the constructors are the
//! only way to build one, so the invariant holds by construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool-protocol request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: String,
}

impl ProtocolRequest {
    pub fn new(method: impl Into<String>, params: Value, id: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params,
            id: id.into(),
        }
    }

    /// Envelope for `tools/call` with the given tool name and arguments.
    pub fn tool_call(tool: &str, arguments: Value, id: impl Into<String>) -> Self {
        Self::new(
            "tools/call",
            serde_json::json!({ "name": tool, "arguments": arguments }),
            id,
        )
    }

    /// Envelope for `tools/list`.
    pub fn tool_list(id: impl Into<String>) -> Self {
        Self::new("tools/list", Value::Null, id)
    }
}

/// A single tool-protocol response, correlated to its request by `id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub id: String,
}

impl ProtocolResponse {
    pub fn ok(result: Value, id: impl Into<String>) -> Self {
        Self {
            result: Some(result),
            error: None,
            id: id.into(),
        }
    }

    pub fn err(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
            id: id.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_carry_exactly_one_of_result_or_error() {
        let ok = ProtocolResponse::ok(serde_json::json!({"tools": []}), "req-1");
        assert!(ok.result.is_some() && ok.error.is_none());

        let err = ProtocolResponse::err("Tool frobnicate not found", "req-2");
        assert!(err.result.is_none() && err.error.is_some());
        assert!(err.is_error());
    }

    #[test]
    fn tool_call_envelope_shape() {
        let req = ProtocolRequest::tool_call(
            "extract_customer_info",
            serde_json::json!({"request_id": "r1"}),
            "req-3",
        );
        assert_eq!(req.method, "tools/call");
        assert_eq!(req.params["name"], "extract_customer_info");
        assert_eq!(req.params["arguments"]["request_id"], "r1");
    }
}
