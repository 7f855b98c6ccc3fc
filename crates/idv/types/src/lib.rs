//! Shared data model for the identity verification core.
//!
//! Value types exchanged between the extractors, the coordinator, the
//! supervisor, and the orchestration pipeline. Nothing in this crate owns
//! behavior beyond constructors and predicates; the data hub owns all
//! stored instances and hands out clones.

#![deny(unsafe_code)]

mod decision;
mod job;
mod protocol;
mod record;
mod verification;

pub use decision::{DecisionAction, SupervisorDecision};
pub use job::{FullReport, JobTask, VerificationJob};
pub use protocol::{ProtocolRequest, ProtocolResponse};
pub use record::{CustomerRecord, DocumentKind, RequestId};
pub use verification::{MatchResult, VerificationDetails, VerificationResult};
