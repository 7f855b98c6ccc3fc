//! Verification and decision engines.
//!
//! Pure logic only: similarity scoring, per-field match classification,
//! assembly of a verification result, and the supervisor's rule table.
//! The coordinator and supervisor servers call into this crate; nothing
//! here touches the hub or the protocol.

#![deny(unsafe_code)]

mod decide;
mod similarity;
mod verify;

pub use decide::decide;
pub use similarity::similarity;
pub use verify::{classify, compare_field, verify, FieldComparison, MatchThresholds};
