//! Core data models for the smart router

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Agent Metadata =================
//

/// Descriptive metadata for one discovered agent.
/// Built once at registry-construction time, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub name: String,
    pub description: String,
    pub port: u16,
}

//
// ================= Routing =================
//

/// The Router's choice of which agent should answer a query.
/// Transient: lives only for the duration of one orchestration call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingDecision {
    pub agent_name: String,
    pub query_text: String,
    pub priority: u32,
    pub rank: u32,
}

//
// ================= Dispatch =================
//

/// The result of invoking one agent for one decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentOutcome {
    pub agent_name: String,
    pub result_text: String,
    pub succeeded: bool,
}

impl AgentOutcome {
    pub fn success(agent_name: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            result_text: result_text.into(),
            succeeded: true,
        }
    }

    /// Deterministic placeholder used whenever an agent call fails.
    pub fn unavailable(agent_name: impl Into<String>) -> Self {
        let agent_name = agent_name.into();
        let result_text = format!("{} is currently unavailable.", agent_name);
        Self {
            agent_name,
            result_text,
            succeeded: false,
        }
    }
}

//
// ================= Statistics =================
//

/// Point-in-time view of the orchestrator's call counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    /// Percentage in [0, 100].
    pub success_rate: f64,
    pub available_agents: Vec<String>,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "calls={} ok={} failed={} success_rate={:.2}%",
            self.total_calls, self.successful_calls, self.failed_calls, self.success_rate
        )
    }
}
