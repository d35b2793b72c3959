use neo4rs::query;

use brandguard_common::{
    round1, BrandGuardError, BrandHealth, NetworkGraph, PlatformHealth, Severity, SourceInfluence,
    ThreatMention, TrendPoint, ACCURACY_THRESHOLD,
};

use crate::client::map_graph_err;
use crate::network::{self, NetworkRow};
use crate::GraphClient;

/// Read-side aggregation over the graph. Every query here is a pure read;
/// brands with no data produce zeroed or empty results, never errors.
pub struct GraphReader {
    client: GraphClient,
}

impl GraphReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Per-platform mention statistics plus the overall accuracy as a
    /// mention-count-weighted mean across platforms.
    pub async fn brand_health(&self, brand_id: &str) -> Result<BrandHealth, BrandGuardError> {
        let q = query(
            "MATCH (m:Mention)-[:ABOUT]->(b:Brand {id: $brand_id})
             MATCH (m)-[:FOUND_ON]->(p:Platform)
             RETURN p.name AS platform,
                    count(m) AS mentions,
                    avg(m.accuracy_score) AS avg_accuracy,
                    sum(CASE WHEN m.is_accurate THEN 1 ELSE 0 END) AS accurate,
                    sum(CASE WHEN m.severity IN ['high', 'critical'] THEN 1 ELSE 0 END) AS threats
             ORDER BY mentions DESC",
        )
        .param("brand_id", brand_id);

        let mut by_platform = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while let Some(row) = stream.next().await.map_err(map_graph_err)? {
            let mentions: i64 = row.get("mentions").unwrap_or(0);
            let avg: f64 = row.get("avg_accuracy").unwrap_or(0.0);
            let accurate: i64 = row.get("accurate").unwrap_or(0);
            let threats: i64 = row.get("threats").unwrap_or(0);
            by_platform.push(PlatformHealth {
                platform: row.get("platform").unwrap_or_default(),
                mentions: mentions as u32,
                avg_accuracy: round1(avg),
                accurate: accurate as u32,
                threats: threats as u32,
            });
        }

        if by_platform.is_empty() {
            return Ok(BrandHealth::empty(brand_id));
        }

        Ok(BrandHealth {
            brand_id: brand_id.to_string(),
            total_mentions: by_platform.iter().map(|p| p.mentions).sum(),
            overall_accuracy: weighted_overall_accuracy(&by_platform),
            accurate_mentions: by_platform.iter().map(|p| p.accurate).sum(),
            threats: by_platform.iter().map(|p| p.threats).sum(),
            by_platform,
        })
    }

    /// Sources ranked by the number of distinct low-accuracy mentions they
    /// feed, with the distinct platforms each one reaches. Ties break on
    /// URL so the ranking is reproducible.
    pub async fn brand_sources(
        &self,
        brand_id: &str,
        limit: u32,
    ) -> Result<Vec<SourceInfluence>, BrandGuardError> {
        let q = query(&format!(
            "MATCH (m:Mention)-[:ABOUT]->(b:Brand {{id: $brand_id}})
             WHERE m.accuracy_score < $threshold
             MATCH (m)-[:SOURCED_FROM]->(s:Source)
             MATCH (m)-[:FOUND_ON]->(p:Platform)
             RETURN s.url AS url, s.domain AS domain,
                    count(DISTINCT m) AS mentions_fed,
                    collect(DISTINCT p.name) AS platforms
             ORDER BY mentions_fed DESC, url ASC
             LIMIT {limit}"
        ))
        .param("brand_id", brand_id)
        .param("threshold", ACCURACY_THRESHOLD);

        let mut sources = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while let Some(row) = stream.next().await.map_err(map_graph_err)? {
            let mentions_fed: i64 = row.get("mentions_fed").unwrap_or(0);
            sources.push(SourceInfluence {
                url: row.get("url").unwrap_or_default(),
                domain: row.get("domain").unwrap_or_default(),
                mentions_fed: mentions_fed as u32,
                platforms: row.get("platforms").unwrap_or_default(),
            });
        }
        Ok(sources)
    }

    /// The full explorable subgraph for a brand: its mentions and every
    /// platform, source, and correction reachable from them, deduplicated
    /// and colored for rendering.
    pub async fn brand_network(&self, brand_id: &str) -> Result<NetworkGraph, BrandGuardError> {
        let q = query(
            "MATCH (b:Brand {id: $brand_id})
             OPTIONAL MATCH (m:Mention)-[:ABOUT]->(b)
             OPTIONAL MATCH (m)-[:FOUND_ON]->(p:Platform)
             OPTIONAL MATCH (m)-[:SOURCED_FROM]->(s:Source)
             OPTIONAL MATCH (c:Correction)-[:CORRECTS]->(m)
             RETURN b.id AS brand_id, b.name AS brand_name,
                    m.id AS mention_id, m.claim AS claim, m.is_accurate AS is_accurate,
                    p.name AS platform,
                    s.url AS source_url, s.domain AS source_domain,
                    c.id AS correction_id, c.status AS correction_status",
        )
        .param("brand_id", brand_id);

        let mut rows = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while let Some(row) = stream.next().await.map_err(map_graph_err)? {
            rows.push(NetworkRow {
                brand_id: row.get("brand_id").unwrap_or_default(),
                brand_name: row.get("brand_name").unwrap_or_default(),
                mention_id: row.get("mention_id").ok(),
                claim: row.get("claim").ok(),
                is_accurate: row.get("is_accurate").ok(),
                platform: row.get("platform").ok(),
                source_url: row.get("source_url").ok(),
                source_domain: row.get("source_domain").ok(),
                correction_id: row.get("correction_id").ok(),
                correction_status: row.get("correction_status").ok(),
            });
        }

        Ok(network::assemble(&rows))
    }

    /// Mention volume and average accuracy per day over the window.
    pub async fn accuracy_trend(
        &self,
        brand_id: &str,
        days: u32,
    ) -> Result<Vec<TrendPoint>, BrandGuardError> {
        let q = query(&format!(
            "MATCH (m:Mention)-[:ABOUT]->(b:Brand {{id: $brand_id}})
             WHERE m.detected_at >= datetime() - duration('P{days}D')
             WITH date(m.detected_at) AS day, count(m) AS mentions,
                  avg(m.accuracy_score) AS avg_accuracy
             RETURN toString(day) AS day, mentions, avg_accuracy
             ORDER BY day"
        ))
        .param("brand_id", brand_id);

        let mut points = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while let Some(row) = stream.next().await.map_err(map_graph_err)? {
            let mentions: i64 = row.get("mentions").unwrap_or(0);
            let avg: f64 = row.get("avg_accuracy").unwrap_or(0.0);
            points.push(TrendPoint {
                date: row.get("day").unwrap_or_default(),
                mentions: mentions as u32,
                avg_accuracy: round1(avg),
            });
        }
        Ok(points)
    }

    /// Inaccurate mentions for a brand, worst first, annotated with a
    /// human-readable context line.
    pub async fn brand_threats(
        &self,
        brand_id: &str,
        limit: u32,
    ) -> Result<Vec<ThreatMention>, BrandGuardError> {
        let q = query(&format!(
            "MATCH (m:Mention)-[:ABOUT]->(b:Brand {{id: $brand_id}})
             WHERE m.accuracy_score < $threshold
             MATCH (m)-[:FOUND_ON]->(p:Platform)
             OPTIONAL MATCH (m)-[:SOURCED_FROM]->(s:Source)
             WITH m, p, collect(DISTINCT s.domain) AS source_domains
             RETURN m.id AS id, m.claim AS claim,
                    m.accuracy_score AS accuracy_score,
                    m.severity AS severity,
                    toString(m.detected_at) AS detected_at,
                    p.name AS platform, source_domains
             ORDER BY m.accuracy_score ASC
             LIMIT {limit}"
        ))
        .param("brand_id", brand_id)
        .param("threshold", ACCURACY_THRESHOLD);

        let mut threats = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while let Some(row) = stream.next().await.map_err(map_graph_err)? {
            let severity: String = row.get("severity").unwrap_or_default();
            let severity = severity.parse().unwrap_or(Severity::Medium);
            let score: f64 = row.get("accuracy_score").unwrap_or(0.0);
            let platform: String = row.get("platform").unwrap_or_default();
            let source_domains: Vec<String> = row.get("source_domains").unwrap_or_default();
            threats.push(ThreatMention {
                id: row.get("id").unwrap_or_default(),
                claim: row.get("claim").unwrap_or_default(),
                accuracy_score: score,
                severity,
                detected_at: row.get("detected_at").unwrap_or_default(),
                context: threat_context(severity, &platform, score, source_domains.len()),
                platform,
                source_domains,
            });
        }
        Ok(threats)
    }
}

/// Mention-count-weighted mean of per-platform averages, rounded to one
/// decimal. A simple average would let platforms with few mentions skew
/// the overall figure.
pub(crate) fn weighted_overall_accuracy(platforms: &[PlatformHealth]) -> f64 {
    let total: u32 = platforms.iter().map(|p| p.mentions).sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = platforms
        .iter()
        .map(|p| p.avg_accuracy * p.mentions as f64)
        .sum();
    round1(weighted / total as f64)
}

/// One-line context for a threat entry in the dashboard feed.
pub(crate) fn threat_context(
    severity: Severity,
    platform: &str,
    score: f64,
    source_count: usize,
) -> String {
    let sources = match source_count {
        0 => "no cited sources".to_string(),
        1 => "cited by 1 source".to_string(),
        n => format!("cited by {n} sources"),
    };
    format!("{severity}-severity claim on {platform}, scored {score:.1}/100, {sources}")
}
