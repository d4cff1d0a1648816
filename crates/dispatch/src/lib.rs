//! Dispatch coordination for the emergency triage system.
//!
//! This crate provides the [`DispatchCoordinator`], which classifies
//! incoming reports, routes them to responder categories, and tracks each
//! report until every dispatched responder has answered.
//!
//! # Architecture
//!
//! ```text
//! Citizen text / structured report
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                   COORDINATOR (one task)                 │
//! │                                                          │
//! │  1. Classify (keyword scorer over the fact table)        │
//! │  2. Route: Medical / ResourceAllocation / Shelter        │
//! │  3. try_send one copy to each category                   │
//! │  4. Record responses, last write wins                    │
//! │  5. Periodic sweep marks overdue reports Stale           │
//! └──────────────────────────────────────────────────────────┘
//!          ↓ report                         ↑ EmergencyResponse
//! ┌──────────────┐  ┌──────────────────────┐  ┌──────────────┐
//! │   Medical    │  │  ResourceAllocation  │  │   Shelter    │
//! │ hospitals +  │  │       depots         │  │   shelters   │
//! │ ambulances   │  │                      │  │              │
//! └──────────────┘  └──────────────────────┘  └──────────────┘
//! ```
//!
//! The [`PriorityOptimizer`] ranks batches of reports by triage score and
//! is usable on its own.
//!
//! # Example
//!
//! ```rust,no_run
//! use dispatch::TriageSystem;
//! use triage_core::ReportDraft;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = TriageSystem::from_env()?;
//!
//!     let receipt = system
//!         .coordinator()
//!         .submit(ReportDraft::text("Flood water rising, families need evacuation").with_affected_count(40))
//!         .await?;
//!     println!("{} dispatched to {:?}", receipt.report.id(), receipt.dispatched);
//!
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod actor;
mod config;
mod coordinator;
mod dispatcher;
mod error;
mod optimizer;
mod routing;
mod session;
mod state;
mod status;
mod system;

pub use actor::{spawn_coordinator, CoordinatorHandle, CoordinatorMailbox, CoordinatorMessage};
pub use config::DispatchConfig;
pub use coordinator::{DispatchCoordinator, InboundReply, ResponseOutcome, SubmitReceipt};
pub use dispatcher::{ActorDispatcher, Dispatcher, LoggingDispatcher, NoOpDispatcher};
pub use error::DispatchError;
pub use optimizer::{PriorityOptimizer, RankedReport};
pub use routing::RoutingRules;
pub use session::{CitizenSession, SessionSummary, INTAKE_PROMPT};
pub use state::{DispatchRecord, ReportState, TrackedReport};
pub use status::{StatusReport, StatusSummary, StatusTopic};
pub use system::TriageSystem;
