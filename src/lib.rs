//! Financial Advisory Smart Router
//!
//! A gateway that routes user chat queries to specialized backend agents
//! (investment analysis, advisor lookup, market research) over an agent
//! communication protocol and synthesizes their answers:
//! - Discovers agents once at startup and keeps a read-only registry
//! - Routes each query to exactly one agent via an ordered keyword table
//! - Dispatches with a fixed 90 second bound and failure isolation
//! - Merges outcomes into a single labeled response, degrading gracefully
//!
//! PIPELINE:
//! QUERY → ROUTE → DISPATCH → SYNTHESIZE → RESPONSE

pub mod acp;
pub mod api;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod router;
pub mod stats;
pub mod synthesizer;
pub mod uploads;

pub use error::{Result, RouterError};

// Re-export common types
pub use models::*;
pub use orchestrator::Orchestrator;
pub use registry::AgentRegistry;
