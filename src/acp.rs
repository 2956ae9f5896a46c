//! ACP client for backend agent servers
//!
//! Each backend agent (investment analysis, advisor lookup, market research)
//! runs as a separate ACP server process. This module wraps one connection to
//! such a server and exposes two operations: a discovery listing call and a
//! single fallible, time-bounded run call.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::RouterError;
use crate::models::AgentDescriptor;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Fixed per-call bound. A call exceeding this is abandoned and reported as
/// a timeout, regardless of whether the remote side eventually completes.
pub const AGENT_CALL_TIMEOUT: Duration = Duration::from_secs(90);

/// Seam between the routing core and the network.
/// Production uses [`AcpClient`]; tests substitute mock transports.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Port this connection is configured against (used by discovery to
    /// match expected agent-name → port associations).
    fn port(&self) -> u16;

    /// Discovery listing call: which agents does this connection serve?
    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>>;

    /// Run one agent synchronously, bounded by `timeout`.
    async fn run_sync(&self, agent_name: &str, input: &str, timeout: Duration) -> Result<String>;
}

/// HTTP connection to one ACP agent server.
pub struct AcpClient {
    client: Client,
    base_url: String,
    port: u16,
}

impl AcpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        let port = parse_port(&base_url)?;

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(RouterError::HttpError)?;

        Ok(Self {
            client,
            base_url,
            port,
        })
    }

}

/// Extract the port from a base URL like `http://localhost:8001`.
/// ACP servers are always addressed with an explicit port.
fn parse_port(base_url: &str) -> Result<u16> {
    let authority = base_url
        .split("://")
        .nth(1)
        .unwrap_or(base_url)
        .split('/')
        .next()
        .unwrap_or_default();

    authority
        .rsplit(':')
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .ok_or_else(|| {
            RouterError::ConfigError(format!("Agent URL has no explicit port: {}", base_url))
        })
}

#[async_trait]
impl AgentTransport for AcpClient {
    fn port(&self) -> u16 {
        self.port
    }

    async fn list_agents(&self) -> Result<Vec<AgentDescriptor>> {
        let url = format!("{}/agents", self.base_url);
        debug!(url = %url, "Listing agents");

        let response = self.client.get(&url).send().await.map_err(|e| {
            RouterError::DiscoveryError(format!("Listing failed for {}: {}", self.base_url, e))
        })?;

        if !response.status().is_success() {
            return Err(RouterError::DiscoveryError(format!(
                "Listing returned {} for {}",
                response.status(),
                self.base_url
            )));
        }

        let listing: AgentListing = response.json().await.map_err(|e| {
            RouterError::DiscoveryError(format!("Invalid listing response: {}", e))
        })?;

        Ok(listing
            .agents
            .into_iter()
            .map(|a| AgentDescriptor {
                name: a.name,
                description: a.description.unwrap_or_default(),
                port: self.port,
            })
            .collect())
    }

    async fn run_sync(&self, agent_name: &str, input: &str, timeout: Duration) -> Result<String> {
        let url = format!("{}/runs", self.base_url);

        let request = RunRequest {
            agent_name: agent_name.to_string(),
            input: vec![AcpMessage {
                parts: vec![AcpMessagePart {
                    content: input.to_string(),
                    content_type: "text/plain".to_string(),
                }],
            }],
            mode: "sync".to_string(),
        };

        info!(
            agent = %agent_name,
            timeout_secs = timeout.as_secs(),
            "Calling agent"
        );
        let start = Instant::now();

        let response = tokio::time::timeout(timeout, self.client.post(&url).json(&request).send())
            .await
            .map_err(|_| {
                error!(agent = %agent_name, "Agent call timed out");
                RouterError::AgentTimeout {
                    agent: agent_name.to_string(),
                    seconds: timeout.as_secs(),
                }
            })?
            .map_err(|e| RouterError::Remote {
                agent: agent_name.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RouterError::Remote {
                agent: agent_name.to_string(),
                message: format!("server returned {}: {}", status, body),
            });
        }

        // Body read shares the same deadline as the request itself.
        let run: RunResponse = tokio::time::timeout(
            timeout.saturating_sub(start.elapsed()),
            response.json::<RunResponse>(),
        )
        .await
        .map_err(|_| RouterError::AgentTimeout {
            agent: agent_name.to_string(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| RouterError::Remote {
            agent: agent_name.to_string(),
            message: format!("invalid run response: {}", e),
        })?;

        let content = run
            .output
            .first()
            .and_then(|m| m.parts.first())
            .map(|p| p.content.clone())
            .ok_or_else(|| RouterError::Remote {
                agent: agent_name.to_string(),
                message: "empty run output".to_string(),
            })?;

        info!(
            agent = %agent_name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_len = content.len(),
            "Agent completed"
        );

        Ok(content)
    }
}

//
// ================= Wire Types =================
//

#[derive(Debug, Serialize, Deserialize)]
struct AcpMessage {
    parts: Vec<AcpMessagePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AcpMessagePart {
    content: String,
    #[serde(default = "default_content_type")]
    content_type: String,
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

#[derive(Debug, Serialize)]
struct RunRequest {
    agent_name: String,
    input: Vec<AcpMessage>,
    mode: String,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    output: Vec<AcpMessage>,
}

#[derive(Debug, Deserialize)]
struct AgentListing {
    agents: Vec<AgentListingEntry>,
}

#[derive(Debug, Deserialize)]
struct AgentListingEntry {
    name: String,
    description: Option<String>,
}
