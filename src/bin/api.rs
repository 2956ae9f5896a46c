use financial_smart_router::acp::{AcpClient, AgentTransport};
use financial_smart_router::api::start_server;
use financial_smart_router::orchestrator::Orchestrator;
use financial_smart_router::registry::AgentRegistry;
use financial_smart_router::uploads::UploadStore;
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

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "5001".to_string())
        .parse()?;

    let upload_dir =
        std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

    info!("Financial Advisory Smart Router - API Server");
    info!("Port: {}", api_port);

    // Discover backend agents
    let connections: Vec<Arc<dyn AgentTransport>> = vec![
        Arc::new(AcpClient::new(financial_agents_url)?),
        Arc::new(AcpClient::new(market_agent_url)?),
    ];
    let registry = Arc::new(AgentRegistry::discover(connections).await);

    if registry.is_empty() {
        info!("No agents discovered yet; queries will be asked to rephrase until agents come up");
    }

    let orchestrator = Arc::new(Orchestrator::new(registry));
    let uploads = Arc::new(UploadStore::open(upload_dir).await?);

    info!("Orchestrator initialized");
    info!("Starting API server...");

    start_server(orchestrator, uploads, api_port).await?;

    Ok(())
}
