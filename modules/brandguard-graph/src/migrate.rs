use neo4rs::query;
use tracing::{info, warn};

use brandguard_common::{BrandGuardError, KNOWN_PLATFORMS};

use crate::client::map_graph_err;
use crate::GraphClient;

/// Establish uniqueness constraints and seed the canonical platform set.
/// Idempotent: re-running never errors or duplicates. Individual constraint
/// statements that fail because they already exist are logged and skipped.
pub async fn init_schema(client: &GraphClient) -> Result<(), BrandGuardError> {
    let g = &client.graph;

    info!("Initializing graph schema...");

    // --- Uniqueness constraints ---
    let constraints = [
        "CREATE CONSTRAINT ON (b:Brand) ASSERT b.id IS UNIQUE",
        "CREATE CONSTRAINT ON (p:Platform) ASSERT p.name IS UNIQUE",
        "CREATE CONSTRAINT ON (m:Mention) ASSERT m.id IS UNIQUE",
        "CREATE CONSTRAINT ON (s:Source) ASSERT s.url IS UNIQUE",
        "CREATE CONSTRAINT ON (c:Correction) ASSERT c.id IS UNIQUE",
    ];

    for c in &constraints {
        run_ignoring_exists(g, c).await?;
    }
    info!("Uniqueness constraints created");

    // --- Property indexes (accuracy/time filters on the read side) ---
    let indexes = [
        "CREATE INDEX ON :Mention(accuracy_score)",
        "CREATE INDEX ON :Mention(detected_at)",
        "CREATE INDEX ON :Mention(severity)",
    ];

    for idx in &indexes {
        run_ignoring_exists(g, idx).await?;
    }
    info!("Property indexes created");

    // --- Seed the canonical platform set (MERGE keeps re-runs clean) ---
    for name in KNOWN_PLATFORMS {
        let q = query("MERGE (p:Platform {name: $name})").param("name", *name);
        g.run(q).await.map_err(map_graph_err)?;
    }
    info!(platforms = KNOWN_PLATFORMS.len(), "Platform set seeded");

    info!("Schema initialization complete");
    Ok(())
}

/// Run a constraint/index statement non-fatally: already-exists (and other
/// statement-level failures) are logged and skipped, since constraints may
/// already exist from a previous run. Connectivity failures still
/// propagate.
async fn run_ignoring_exists(g: &neo4rs::Graph, cypher: &str) -> Result<(), BrandGuardError> {
    match g.run(query(cypher)).await {
        Ok(_) => Ok(()),
        Err(e) => match map_graph_err(e) {
            BrandGuardError::ServiceUnavailable(msg) => {
                Err(BrandGuardError::ServiceUnavailable(msg))
            }
            other => {
                warn!(
                    error = %other,
                    "Schema statement skipped: {}",
                    cypher.chars().take(80).collect::<String>()
                );
                Ok(())
            }
        },
    }
}
