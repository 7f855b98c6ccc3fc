//! The tool server capability.
//!
//! A server is a fixed name plus a registry mapping tool names to
//! asynchronous handlers, populated once at construction. The protocol
//! surface (`tools/list`, `tools/call`, `resources/list`) is a provided
//! trait method, so the four concrete servers only supply their name and
//! registry.

use crate::{ToolArguments, ToolError};
use async_trait::async_trait;
use idv_types::{ProtocolRequest, ProtocolResponse};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// One named, independently invocable asynchronous operation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, args: ToolArguments) -> Result<Value, ToolError>;
}

/// Name → handler table owned by a server.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Called during server construction, before any
    /// request is served.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) {
        let name = name.into();
        tracing::debug!(tool = %name, "Registered tool");
        self.tools.insert(name, handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.get(name)
    }

    /// Registered tool names, sorted for stable listings.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

/// Capability surface shared by every agent server.
///
/// Implementors provide `name` and `registry`; dispatch itself never
/// fails — every failure path produces a response with `error` set.
#[async_trait]
pub trait ToolServer: Send + Sync {
    /// Fixed server name used by the client directory.
    fn name(&self) -> &str;

    /// The server's tool table.
    fn registry(&self) -> &ToolRegistry;

    /// Registered resource names. Reserved surface; empty by default.
    fn resource_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Dispatch one protocol request.
    async fn handle_request(&self, request: ProtocolRequest) -> ProtocolResponse {
        tracing::debug!(
            server = self.name(),
            method = %request.method,
            request_id = %request.id,
            "Received request"
        );

        match request.method.as_str() {
            "tools/list" => {
                ProtocolResponse::ok(json!({ "tools": self.registry().tool_names() }), request.id)
            }
            "tools/call" => {
                let tool_name = match request.params.get("name").and_then(Value::as_str) {
                    Some(name) => name,
                    None => {
                        return ProtocolResponse::err(
                            ToolError::MissingArgument("name".into()).to_string(),
                            request.id,
                        )
                    }
                };

                let handler = match self.registry().get(tool_name) {
                    Some(handler) => Arc::clone(handler),
                    None => {
                        return ProtocolResponse::err(
                            ToolError::ToolNotFound(tool_name.into()).to_string(),
                            request.id,
                        )
                    }
                };

                let raw_args = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(Value::Null);
                let args = match ToolArguments::new(raw_args) {
                    Ok(args) => args,
                    Err(err) => return ProtocolResponse::err(err.to_string(), request.id),
                };

                match handler.invoke(args).await {
                    Ok(result) => ProtocolResponse::ok(result, request.id),
                    Err(err) => {
                        tracing::warn!(
                            server = self.name(),
                            tool = tool_name,
                            error = %err,
                            "Tool execution failed"
                        );
                        ProtocolResponse::err(err.to_string(), request.id)
                    }
                }
            }
            "resources/list" => {
                ProtocolResponse::ok(json!({ "resources": self.resource_names() }), request.id)
            }
            other => ProtocolResponse::err(
                ToolError::UnknownMethod(other.into()).to_string(),
                request.id,
            ),
        }
    }
}
