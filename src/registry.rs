//! Agent registry
//!
//! Built once at startup by asking each configured connection which agents
//! it serves, then matching the answers against the expected agent-name →
//! port associations. Read-only for the remainder of the process lifetime.

use crate::acp::AgentTransport;
use crate::models::AgentDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Expected agent-name → port associations. An agent is registered only if
/// a responding connection on the expected port actually serves the name.
const EXPECTED_AGENTS: &[(&str, u16)] = &[
    ("investment_agent", 8000),
    ("advisor_finder", 8000),
    ("market_researcher", 8001),
];

/// One registry entry: descriptor plus the connection that serves it.
#[derive(Clone)]
pub struct RegisteredAgent {
    pub descriptor: AgentDescriptor,
    pub transport: Arc<dyn AgentTransport>,
}

/// Startup-built, read-only directory of available agents.
pub struct AgentRegistry {
    agents: HashMap<String, RegisteredAgent>,
}

impl AgentRegistry {
    /// Discover agents across the given connections.
    ///
    /// A connection that fails its listing call yields zero agents from it,
    /// never a registry-wide failure. A duplicate agent name across
    /// connections is a configuration error: the first registration wins
    /// and the conflicting entry is rejected.
    pub async fn discover(connections: Vec<Arc<dyn AgentTransport>>) -> Self {
        info!(connection_count = connections.len(), "Discovering agents");

        let mut agents: HashMap<String, RegisteredAgent> = HashMap::new();

        for connection in connections {
            let listing = match connection.list_agents().await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(
                        port = connection.port(),
                        error = %e,
                        "Agent listing failed, skipping connection"
                    );
                    continue;
                }
            };

            for descriptor in listing {
                let expected_port = EXPECTED_AGENTS
                    .iter()
                    .find(|(name, _)| *name == descriptor.name)
                    .map(|(_, port)| *port);

                match expected_port {
                    Some(port) if port == connection.port() => {}
                    Some(port) => {
                        warn!(
                            agent = %descriptor.name,
                            expected_port = port,
                            actual_port = connection.port(),
                            "Agent answered on unexpected port, not registering"
                        );
                        continue;
                    }
                    None => {
                        warn!(agent = %descriptor.name, "Unknown agent name, not registering");
                        continue;
                    }
                }

                if agents.contains_key(&descriptor.name) {
                    error!(
                        agent = %descriptor.name,
                        port = connection.port(),
                        "Duplicate agent name, rejecting conflicting entry"
                    );
                    continue;
                }

                info!(
                    agent = %descriptor.name,
                    port = connection.port(),
                    "Found agent"
                );

                agents.insert(
                    descriptor.name.clone(),
                    RegisteredAgent {
                        descriptor,
                        transport: Arc::clone(&connection),
                    },
                );
            }
        }

        info!(agent_count = agents.len(), "Agent discovery complete");

        Self { agents }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAgent> {
        self.agents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Registered agent names, sorted for deterministic output.
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{mock_registry, MockTransport};
    use super::*;

    #[tokio::test]
    async fn test_discovers_expected_agents() {
        let registry = mock_registry().await;

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("investment_agent"));
        assert!(registry.contains("advisor_finder"));
        assert!(registry.contains("market_researcher"));
        assert_eq!(
            registry.agent_names(),
            vec!["advisor_finder", "investment_agent", "market_researcher"]
        );
    }

    #[tokio::test]
    async fn test_failed_connection_does_not_abort_discovery() {
        let registry = AgentRegistry::discover(vec![
            MockTransport::serving(8000, vec!["investment_agent", "advisor_finder"]),
            MockTransport::unreachable(8001),
        ])
        .await;

        assert_eq!(registry.len(), 2);
        assert!(!registry.contains("market_researcher"));
    }

    #[tokio::test]
    async fn test_wrong_port_not_registered() {
        // market_researcher is expected on 8001, not 8000.
        let registry = AgentRegistry::discover(vec![MockTransport::serving(
            8000,
            vec!["market_researcher"],
        )])
        .await;

        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_first_registration() {
        let registry = AgentRegistry::discover(vec![
            MockTransport::serving(8000, vec!["investment_agent"]),
            MockTransport::serving(8000, vec!["investment_agent"]),
        ])
        .await;

        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_agent_name_ignored() {
        let registry = AgentRegistry::discover(vec![MockTransport::serving(
            8000,
            vec!["crypto_oracle"],
        )])
        .await;

        assert!(registry.is_empty());
    }
}
