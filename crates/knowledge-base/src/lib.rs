//! Emergency knowledge base and keyword classifier.
//!
//! The [`KnowledgeBase`] is a static fact table: which resources each
//! emergency type requires, what it may escalate into, which types should
//! be handled together, and the coefficients used for triage. It is loaded
//! once at startup (see [`KnowledgeBase::from_env`]) and shared read-only.
//!
//! The [`Classifier`] turns free text into a
//! [`ClassificationResult`](triage_core::ClassificationResult) using the
//! keyword sets declared in the same table.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use knowledge_base::{Classifier, KnowledgeBase};
//! use triage_core::EmergencyType;
//!
//! let kb = Arc::new(KnowledgeBase::builtin().unwrap());
//! let result = Classifier::new(kb).classify("smoke and flames on the third floor");
//! assert_eq!(result.inferred_type, EmergencyType::Fire);
//! ```

mod classifier;
mod error;
mod facts;
mod knowledge;

pub use classifier::Classifier;
pub use error::KnowledgeError;
pub use facts::QuantityTier;
pub use knowledge::{KnowledgeBase, TypeFacts, FACTS_PATH_ENV};
