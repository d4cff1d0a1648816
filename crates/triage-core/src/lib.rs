//! Core types and traits shared by every part of the triage system.
//!
//! This crate defines:
//!
//! - [`EmergencyReport`] / [`ReportDraft`] - an incoming emergency and the raw input it is built from
//! - [`ClassificationResult`] - the structured decision produced by the classifier
//! - [`SelectionOutcome`] / [`ResponderReply`] - what a responder did with a report
//! - [`EmergencyResponse`] - the message a responder sends back to the coordinator
//! - [`ResponseSink`] - where responders deliver their responses
//! - [`InboundContent`] - the session-framed input the coordinator accepts
//!
//! # Example
//!
//! ```rust
//! use triage_core::{EmergencyType, SeverityBand};
//!
//! assert_eq!(SeverityBand::from_score(7.5), SeverityBand::Critical);
//! assert_eq!(EmergencyType::from("flood"), EmergencyType::Flood);
//! ```

mod classification;
mod error;
mod inbound;
mod outcome;
mod report;
mod resource;
mod response;
mod trait_def;

pub use classification::ClassificationResult;
pub use error::TriageError;
pub use inbound::InboundContent;
pub use outcome::{ResponderReply, SelectionOutcome};
pub use report::{EmergencyReport, EmergencyType, Location, ReportDraft, SeverityBand, DEFAULT_LOCATION};
pub use resource::ResourceKind;
pub use response::{EmergencyResponse, ResponderCategory};
pub use trait_def::{LoggingSink, NoOpSink, ResponseSink};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
