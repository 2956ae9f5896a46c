//! Dispatcher
//!
//! Executes routing decisions against the registry with failure isolation:
//! one agent timing out or erroring never aborts the other decisions, it
//! just yields an unavailable outcome for that agent. Outcomes are returned
//! in the same order as their originating decisions so that synthesis is
//! deterministic.

use crate::acp::AGENT_CALL_TIMEOUT;
use crate::models::{AgentOutcome, RoutingDecision};
use crate::registry::AgentRegistry;
use crate::stats::CallStats;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
    stats: Arc<CallStats>,
}

impl Dispatcher {
    pub fn new(registry: Arc<AgentRegistry>, stats: Arc<CallStats>) -> Self {
        Self { registry, stats }
    }

    /// Execute all decisions, one agent call each, bounded by the fixed
    /// 90 second timeout. Decisions run concurrently; outcomes come back
    /// in decision order.
    pub async fn execute(&self, decisions: &[RoutingDecision]) -> Vec<AgentOutcome> {
        self.stats.record_dispatch(decisions.len() as u64);

        let mut handles = Vec::with_capacity(decisions.len());

        for decision in decisions {
            let agent_name = decision.agent_name.clone();
            let query = decision.query_text.clone();
            let transport = self
                .registry
                .get(&agent_name)
                .map(|entry| Arc::clone(&entry.transport));

            handles.push(tokio::spawn(async move {
                let Some(transport) = transport else {
                    warn!(agent = %agent_name, "Decision targets unregistered agent");
                    return AgentOutcome::unavailable(agent_name);
                };

                match transport
                    .run_sync(&agent_name, &query, AGENT_CALL_TIMEOUT)
                    .await
                {
                    Ok(text) => {
                        info!(agent = %agent_name, "Agent call succeeded");
                        AgentOutcome::success(agent_name, text)
                    }
                    Err(e) => {
                        warn!(agent = %agent_name, error = %e, "Agent call failed");
                        AgentOutcome::unavailable(agent_name)
                    }
                }
            }));
        }

        let mut outcomes = Vec::with_capacity(decisions.len());
        for (handle, decision) in handles.into_iter().zip(decisions) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(agent = %decision.agent_name, error = %e, "Agent task panicked");
                    AgentOutcome::unavailable(decision.agent_name.clone())
                }
            };

            if outcome.succeeded {
                self.stats.record_success();
            } else {
                self.stats.record_failure();
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support::{mock_registry, MockTransport};
    use crate::registry::AgentRegistry;

    fn decision(agent: &str, query: &str, rank: u32) -> RoutingDecision {
        RoutingDecision {
            agent_name: agent.to_string(),
            query_text: query.to_string(),
            priority: 1,
            rank,
        }
    }

    #[tokio::test]
    async fn test_single_decision_success() {
        let registry = Arc::new(mock_registry().await);
        let stats = Arc::new(CallStats::new());
        let dispatcher = Dispatcher::new(registry, Arc::clone(&stats));

        let outcomes = dispatcher
            .execute(&[decision("investment_agent", "invest $50k", 0)])
            .await;

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].succeeded);
        assert!(outcomes[0].result_text.contains("invest $50k"));
        assert_eq!(stats.total_calls(), 1);
        assert_eq!(stats.successful_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_order_preserved() {
        // investment_agent on 8000 fails every run; market_researcher on
        // 8001 answers normally.
        let registry = Arc::new(
            AgentRegistry::discover(vec![
                MockTransport::failing_runs(8000, vec!["investment_agent"]),
                MockTransport::serving(8001, vec!["market_researcher"]),
            ])
            .await,
        );
        let stats = Arc::new(CallStats::new());
        let dispatcher = Dispatcher::new(registry, Arc::clone(&stats));

        let outcomes = dispatcher
            .execute(&[
                decision("investment_agent", "query a", 0),
                decision("market_researcher", "query b", 1),
            ])
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].agent_name, "investment_agent");
        assert!(!outcomes[0].succeeded);
        assert_eq!(
            outcomes[0].result_text,
            "investment_agent is currently unavailable."
        );
        assert_eq!(outcomes[1].agent_name, "market_researcher");
        assert!(outcomes[1].succeeded);

        assert_eq!(stats.total_calls(), 2);
        assert_eq!(stats.successful_calls(), 1);
        assert_eq!(stats.failed_calls(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_agent_yields_unavailable_outcome() {
        let registry = Arc::new(AgentRegistry::discover(vec![]).await);
        let stats = Arc::new(CallStats::new());
        let dispatcher = Dispatcher::new(registry, Arc::clone(&stats));

        let outcomes = dispatcher
            .execute(&[decision("investment_agent", "anything", 0)])
            .await;

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].succeeded);
        assert_eq!(stats.failed_calls(), 1);
    }
}
