//! Typed access to tool-call arguments.
//!
//! Arguments travel as a JSON object. Handlers declare the keys they
//! expect through these accessors and fail with a protocol error when a
//! required key is absent, instead of relying on dynamic expansion.

use crate::ToolError;
use serde_json::{Map, Value};

/// The `arguments` object of a `tools/call` request.
#[derive(Clone, Debug, Default)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    /// Accept a JSON object or null (treated as empty); anything else is
    /// a protocol failure.
    pub fn new(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self(Map::new())),
            _ => Err(ToolError::InvalidArgument {
                key: "arguments".into(),
                expected: "object",
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Required string argument.
    pub fn str_arg(&self, key: &str) -> Result<&str, ToolError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ToolError::InvalidArgument {
                key: key.into(),
                expected: "string",
            }),
            None => Err(ToolError::MissingArgument(key.into())),
        }
    }

    /// Optional string argument; absent is `None`, wrong shape is an error.
    pub fn opt_str_arg(&self, key: &str) -> Result<Option<&str>, ToolError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ToolError::InvalidArgument {
                key: key.into(),
                expected: "string",
            }),
            None => Ok(None),
        }
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
