//! Demo workflow runner: discovers the backend agents, then drives the
//! orchestrator through a set of representative advisory queries.

use financial_smart_router::acp::{AcpClient, AgentTransport};
use financial_smart_router::orchestrator::Orchestrator;
use financial_smart_router::registry::AgentRegistry;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let financial_agents_url = std::env::var("FINANCIAL_AGENTS_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let market_agent_url =
        std::env::var("MARKET_AGENT_URL").unwrap_or_else(|_| "http://localhost:8001".to_string());

    info!("Financial Advisory Smart Router starting");
    info!("Agent servers: {}, {}", financial_agents_url, market_agent_url);

    let connections: Vec<Arc<dyn AgentTransport>> = vec![
        Arc::new(AcpClient::new(financial_agents_url)?),
        Arc::new(AcpClient::new(market_agent_url)?),
    ];

    let registry = Arc::new(AgentRegistry::discover(connections).await);
    info!("Found agents: {:?}", registry.agent_names());

    let orchestrator = Orchestrator::new(registry);

    let test_queries = [
        "I want to invest $50,000 in a balanced portfolio for retirement",
        "Find me a financial advisor in Charlotte, NC who specializes in retirement planning",
        "Research current renewable energy investment trends and recommend portfolio allocation",
        "I'm 35 years old, want to invest $100k, find an advisor in New York, and check current market conditions",
    ];

    for (i, query) in test_queries.iter().enumerate() {
        println!("{}", "=".repeat(60));
        println!("Test {}: {}", i + 1, query);
        println!("{}", "=".repeat(60));

        let result = orchestrator.run(query).await;
        println!("{}\n", result);
    }

    println!("{}", orchestrator.stats());

    Ok(())
}
