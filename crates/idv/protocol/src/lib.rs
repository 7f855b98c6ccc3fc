//! Named-tool dispatch protocol.
//!
//! Every agent in the system exposes its operations as named tools behind
//! the same capability surface: a server owns a registry of asynchronous
//! handlers and answers `tools/list`, `tools/call`, and `resources/list`
//! envelopes. Servers never fail past their own boundary — every failure
//! becomes a response with `error` set — and the client translates a set
//! `error` back into a typed failure for its caller.

#![deny(unsafe_code)]

mod args;
mod client;
mod error;
mod server;

pub use args::ToolArguments;
pub use client::ToolClient;
pub use error::{ErrorKind, ToolError};
pub use server::{ToolHandler, ToolRegistry, ToolServer};
