use neo4rs::{ConfigBuilder, Graph};

use brandguard_common::BrandGuardError;

/// Thin wrapper around neo4rs::Graph providing connection setup.
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given credentials. Connection failures
    /// surface as `ServiceUnavailable`; retry policy belongs to the caller.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, BrandGuardError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| BrandGuardError::ServiceUnavailable(e.to_string()))?;
        let graph = Graph::connect(config)
            .await
            .map_err(|e| BrandGuardError::ServiceUnavailable(e.to_string()))?;
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph. This is the
    /// read-query escape hatch used by the aggregation reader; writes go
    /// through `GraphWriter` so the merge invariants hold.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

/// Classify a driver error: connectivity problems become
/// `ServiceUnavailable`, everything else a plain graph error.
pub(crate) fn map_graph_err(e: neo4rs::Error) -> BrandGuardError {
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("connection") || lower.contains("io error") || lower.contains("timed out") {
        BrandGuardError::ServiceUnavailable(msg)
    } else {
        BrandGuardError::Graph(msg)
    }
}
