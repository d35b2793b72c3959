use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brandguard_common::Config;
use brandguard_graph::{migrate, GraphClient, GraphWriter};
use brandguard_pipeline::jobs::{Collaborators, Pipeline};
use brandguard_pipeline::monitor::{run_sweep, ScoutRecord, ScoutRegistry};
use brandguard_pipeline::registry::JobRegistry;
use senso_client::SensoClient;
use tavily_client::TavilyClient;
use yutori_client::YutoriClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("brandguard=info".parse()?))
        .init();

    info!("BrandGuard monitor starting...");

    let config = Config::from_env();
    let brand_id = std::env::var("MONITOR_BRAND_ID")
        .expect("MONITOR_BRAND_ID environment variable is required");
    let brand_name = std::env::var("MONITOR_BRAND_NAME").unwrap_or_else(|_| brand_id.clone());

    // Connect to Neo4j and run idempotent schema setup
    let client = GraphClient::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;
    migrate::init_schema(&client).await?;

    // Build collaborators and the pipeline
    let tavily = Arc::new(TavilyClient::new(&config.tavily_api_key));
    let yutori = Arc::new(YutoriClient::new(
        &config.yutori_base_url,
        &config.yutori_api_key,
    ));
    let senso = Arc::new(SensoClient::new(
        &config.senso_base_url,
        &config.senso_api_key,
    ));

    let registry = Arc::new(JobRegistry::new());
    let pipeline = Pipeline::new(
        Arc::clone(&registry),
        Arc::new(GraphWriter::new(client.clone())),
        Collaborators {
            evaluator: senso.clone(),
            searcher: tavily.clone(),
            extractor: tavily,
            researcher: yutori.clone(),
            planner: senso.clone(),
            generator: senso,
        },
    );

    // Register every live scout against the monitored brand
    let scouts = ScoutRegistry::new();
    for scout in yutori.list_scouts().await? {
        scouts.register(ScoutRecord {
            id: scout.id,
            query: scout.query,
            brand_id: brand_id.clone(),
            brand_name: brand_name.clone(),
            created_at: Utc::now(),
        });
    }

    let stats = run_sweep(&scouts, yutori.as_ref(), &pipeline).await;
    info!("Monitor run complete. {stats}");

    let failed = registry
        .list(Some(brandguard_pipeline::registry::JobStatus::Failed))
        .len();
    if failed > 0 {
        info!(failed, "Some sweep jobs failed; inspect the job records");
    }

    Ok(())
}
