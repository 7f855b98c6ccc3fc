//! Client-side directory of tool servers.

use crate::{ToolError, ToolServer};
use idv_types::{ProtocolRequest, ProtocolResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Directory of registered servers plus a monotonically increasing
/// request-id counter. Registration happens during setup; calls only
/// need `&self`.
#[derive(Default)]
pub struct ToolClient {
    servers: HashMap<String, Arc<dyn ToolServer>>,
    request_counter: AtomicU64,
}

impl ToolClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server under its own name.
    pub fn register_server(&mut self, server: Arc<dyn ToolServer>) {
        tracing::info!(server = server.name(), "Registered server");
        self.servers.insert(server.name().to_string(), server);
    }

    pub fn server_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.servers.keys().cloned().collect();
        names.sort();
        names
    }

    fn next_request_id(&self) -> String {
        let n = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("req-{n}")
    }

    fn server(&self, name: &str) -> Result<&Arc<dyn ToolServer>, ToolError> {
        self.servers
            .get(name)
            .ok_or_else(|| ToolError::ServerNotFound(name.into()))
    }

    /// Invoke a named tool on a named server. A response with `error` set
    /// becomes an execution failure for the caller.
    pub async fn call_tool(
        &self,
        server_name: &str,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, ToolError> {
        let server = self.server(server_name)?;
        let request = ProtocolRequest::tool_call(tool_name, arguments, self.next_request_id());
        let response = server.handle_request(request).await;
        Self::into_result(response)
    }

    /// List the tools a server exposes.
    pub async fn list_tools(&self, server_name: &str) -> Result<Vec<String>, ToolError> {
        let server = self.server(server_name)?;
        let request = ProtocolRequest::tool_list(self.next_request_id());
        let response = server.handle_request(request).await;
        let result = Self::into_result(response)?;

        let names = result
            .get("tools")
            .and_then(Value::as_array)
            .map(|tools| {
                tools
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    fn into_result(response: ProtocolResponse) -> Result<Value, ToolError> {
        match response.error {
            Some(message) => Err(ToolError::Execution(message)),
            None => Ok(response.result.unwrap_or(Value::Null)),
        }
    }
}
