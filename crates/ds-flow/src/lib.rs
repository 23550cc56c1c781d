//! # ds-flow
//!
//! The user-facing flows of diffshame, built from the storage, capture and
//! analysis crates:
//!
//! - [`CaptureFlow`]: select a sector, photograph it, optionally compare it
//!   with last month's photo, and store it
//! - [`CompareFlow`]: compare two photos that are already stored
//!
//! Every failure is caught at the flow boundary: the flow moves back to its
//! nearest stable state, records a [`FlowNotice`], and returns the error.
//! Nothing is retried automatically.

pub mod capture;
pub mod compare;
pub mod error;

pub use capture::{AnalysisTicket, CaptureFlow, Delivery, FlowOptions, Selection};
pub use compare::CompareFlow;
pub use error::{FlowError, FlowNotice};
