//! Orchestrator facade
//!
//! The single entry point composing Router → Dispatcher → Synthesizer.
//! `run()` is total: every failure below this boundary is recovered into a
//! degraded textual response, never propagated to the caller.

use crate::dispatcher::Dispatcher;
use crate::models::StatsSnapshot;
use crate::registry::AgentRegistry;
use crate::router;
use crate::stats::CallStats;
use crate::synthesizer;
use crate::{Result, RouterError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Returned when the router produced zero decisions.
pub const NO_SUITABLE_AGENT_MESSAGE: &str =
    "No suitable agents found for this query. Please rephrase your financial question.";

/// Returned on any unexpected internal fault.
pub const SYSTEM_ERROR_MESSAGE: &str = "System error occurred. Please try again.";

pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    dispatcher: Dispatcher,
    stats: Arc<CallStats>,
}

impl Orchestrator {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        let stats = Arc::new(CallStats::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::clone(&stats));

        info!(
            agent_count = registry.len(),
            agents = ?registry.agent_names(),
            "Orchestrator initialized"
        );

        Self {
            registry,
            dispatcher,
            stats,
        }
    }

    /// Execute one query end to end. Always returns a user-facing string.
    pub async fn run(&self, query: &str) -> String {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        info!(request_id = %request_id, query = %query, "Orchestration started");

        let response = match self.run_inner(query).await {
            Ok(response) => response,
            Err(RouterError::NoSuitableAgent) => NO_SUITABLE_AGENT_MESSAGE.to_string(),
            Err(e) => {
                error!(request_id = %request_id, error = %e, "Orchestration failed");
                SYSTEM_ERROR_MESSAGE.to_string()
            }
        };

        info!(
            request_id = %request_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_len = response.len(),
            "Orchestration complete"
        );

        response
    }

    async fn run_inner(&self, query: &str) -> Result<String> {
        let decisions = router::decide(query, &self.registry);

        if decisions.is_empty() {
            return Err(RouterError::NoSuitableAgent);
        }

        let outcomes = self.dispatcher.execute(&decisions).await;

        Ok(synthesizer::combine(&outcomes, query))
    }

    /// Read-only view of the call counters plus the registered agent set.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_calls: self.stats.total_calls(),
            successful_calls: self.stats.successful_calls(),
            failed_calls: self.stats.failed_calls(),
            success_rate: self.stats.success_rate(),
            available_agents: self.registry.agent_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support::{mock_registry, MockTransport};

    #[tokio::test]
    async fn test_investment_query_end_to_end() {
        let registry = Arc::new(mock_registry().await);
        let orchestrator = Orchestrator::new(registry);

        let response = orchestrator
            .run("I want to invest $50,000 in a balanced portfolio")
            .await;

        assert!(response.starts_with("**INVESTMENT ANALYSIS**"));
        assert!(response.contains("I want to invest $50,000"));
    }

    #[tokio::test]
    async fn test_advisor_query_end_to_end() {
        let registry = Arc::new(mock_registry().await);
        let orchestrator = Orchestrator::new(registry);

        let response = orchestrator
            .run("Find me a financial advisor in Charlotte, NC")
            .await;

        assert!(response.starts_with("**ADVISOR RECOMMENDATIONS**"));
    }

    #[tokio::test]
    async fn test_market_query_wins_over_investment_keyword() {
        let registry = Arc::new(mock_registry().await);
        let orchestrator = Orchestrator::new(registry);

        let response = orchestrator
            .run("Research current renewable energy investment trends")
            .await;

        assert!(response.starts_with("**MARKET RESEARCH**"));
    }

    #[tokio::test]
    async fn test_no_registered_agents_yields_rephrase_message() {
        let registry = Arc::new(AgentRegistry::discover(vec![]).await);
        let orchestrator = Orchestrator::new(registry);

        let response = orchestrator.run("I want to invest in stocks").await;
        assert_eq!(response, NO_SUITABLE_AGENT_MESSAGE);
    }

    #[tokio::test]
    async fn test_failing_agent_yields_degraded_response() {
        let registry = Arc::new(
            AgentRegistry::discover(vec![MockTransport::failing_runs(
                8000,
                vec!["investment_agent"],
            )])
            .await,
        );
        let orchestrator = Orchestrator::new(registry);

        let response = orchestrator.run("I want to invest in stocks").await;
        assert_eq!(response, crate::synthesizer::ALL_AGENTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stats_after_mixed_calls() {
        let registry = Arc::new(
            AgentRegistry::discover(vec![
                MockTransport::serving(8000, vec!["investment_agent", "advisor_finder"]),
                MockTransport::failing_runs(8001, vec!["market_researcher"]),
            ])
            .await,
        );
        let orchestrator = Orchestrator::new(registry);

        orchestrator.run("I want to invest in stocks").await;
        orchestrator.run("find advisor near me").await;
        orchestrator.run("what are the market trends?").await;

        let stats = orchestrator.stats();
        assert_eq!(stats.total_calls, 3);
        assert_eq!(stats.successful_calls, 2);
        assert_eq!(stats.failed_calls, 1);
        assert!((stats.success_rate - 66.666).abs() < 0.01);
        assert_eq!(stats.available_agents.len(), 3);
    }
}
