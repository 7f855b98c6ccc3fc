//! The four agent servers.
//!
//! Two extractors produce customer records from raw document text, the
//! coordinator cross-checks them, and the supervisor rules on the
//! outcome. Each server is an independent [`idv_protocol::ToolServer`]
//! holding a shared reference to the data hub; none of them ever calls
//! another directly.

#![deny(unsafe_code)]

mod coordinator;
mod extract;
mod extractors;
mod supervisor;

pub use coordinator::CoordinatorServer;
pub use extractors::{BankStatementServer, CreditReportServer};
pub use supervisor::SupervisorServer;
