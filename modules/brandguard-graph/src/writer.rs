use chrono::{DateTime, Utc};
use neo4rs::query;
use tracing::info;
use uuid::Uuid;

use brandguard_common::{
    source_domain, BrandGuardError, MentionRecord, NewCorrection, NewMention, Severity,
    StoredMention, ACCURACY_THRESHOLD,
};

use crate::client::map_graph_err;
use crate::GraphClient;

/// Write-side wrapper for the graph. Brand, Platform, and Source are
/// MERGE-upserted; Mention and Correction are create-once.
pub struct GraphWriter {
    client: GraphClient,
}

impl GraphWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Store a mention: upsert its Brand and Platform, create the Mention
    /// with derived accuracy flag, and wire ABOUT / FOUND_ON plus, per
    /// source URL, SOURCED_FROM and FEEDS edges.
    ///
    /// Returns the mention id and the number of relationships created
    /// (2 + 2 per source URL).
    pub async fn store_mention(&self, m: &NewMention) -> Result<StoredMention, BrandGuardError> {
        if m.claim.trim().is_empty() {
            return Err(BrandGuardError::Validation(
                "mention claim cannot be empty".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&m.accuracy_score) {
            return Err(BrandGuardError::Validation(format!(
                "accuracy score {} out of range 0-100",
                m.accuracy_score
            )));
        }

        let id = m
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let platform = m.platform.to_lowercase();
        let is_accurate = m.accuracy_score >= ACCURACY_THRESHOLD;

        let q = query(
            "MERGE (b:Brand {id: $brand_id})
             ON CREATE SET b.name = $brand_name
             MERGE (p:Platform {name: $platform})
             CREATE (m:Mention {
                id: $id,
                claim: $claim,
                accuracy_score: $accuracy_score,
                is_accurate: $is_accurate,
                severity: $severity,
                detected_at: datetime($detected_at)
             })
             MERGE (m)-[:ABOUT]->(b)
             MERGE (m)-[:FOUND_ON]->(p)
             RETURN m.id AS id",
        )
        .param("brand_id", m.brand_id.as_str())
        .param("brand_name", m.brand_name.as_str())
        .param("platform", platform.as_str())
        .param("id", id.as_str())
        .param("claim", m.claim.as_str())
        .param("accuracy_score", m.accuracy_score)
        .param("is_accurate", is_accurate)
        .param("severity", m.severity.to_string())
        .param("detected_at", format_datetime(&m.detected_at));

        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        while stream.next().await.map_err(map_graph_err)?.is_some() {}

        for url in &m.source_urls {
            self.attach_source(&id, url).await?;
        }

        let relationships_created = 2 + 2 * m.source_urls.len() as u32;
        info!(
            mention_id = id.as_str(),
            brand = m.brand_id.as_str(),
            platform = platform.as_str(),
            relationships_created,
            "Mention stored"
        );

        Ok(StoredMention {
            mention_id: id,
            relationships_created,
        })
    }

    /// Read a mention back with its brand, platform, and cited source URLs.
    pub async fn get_mention(&self, id: &str) -> Result<Option<MentionRecord>, BrandGuardError> {
        let q = query(
            "MATCH (m:Mention {id: $id})-[:ABOUT]->(b:Brand)
             OPTIONAL MATCH (m)-[:FOUND_ON]->(p:Platform)
             OPTIONAL MATCH (m)-[:SOURCED_FROM]->(s:Source)
             RETURN m.id AS id, m.claim AS claim,
                    m.accuracy_score AS accuracy_score,
                    m.is_accurate AS is_accurate,
                    m.severity AS severity,
                    toString(m.detected_at) AS detected_at,
                    b.id AS brand_id, b.name AS brand_name,
                    coalesce(p.name, '') AS platform,
                    collect(DISTINCT s.url) AS source_urls",
        )
        .param("id", id);

        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        if let Some(row) = stream.next().await.map_err(map_graph_err)? {
            let severity: String = row.get("severity").unwrap_or_default();
            Ok(Some(MentionRecord {
                id: row.get("id").unwrap_or_default(),
                brand_id: row.get("brand_id").unwrap_or_default(),
                brand_name: row.get("brand_name").unwrap_or_default(),
                platform: row.get("platform").unwrap_or_default(),
                claim: row.get("claim").unwrap_or_default(),
                accuracy_score: row.get("accuracy_score").unwrap_or(0.0),
                is_accurate: row.get("is_accurate").unwrap_or(false),
                severity: severity.parse().unwrap_or(Severity::Medium),
                detected_at: row.get("detected_at").unwrap_or_default(),
                source_urls: row.get("source_urls").unwrap_or_default(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Store a correction for an existing mention. The brand edge is
    /// derived through the mention's ABOUT relationship; a missing mention
    /// fails with NotFound and leaves no orphan Correction behind.
    pub async fn store_correction(&self, c: &NewCorrection) -> Result<String, BrandGuardError> {
        let id = Uuid::new_v4().to_string();

        let q = query(
            "MATCH (m:Mention {id: $mention_id})-[:ABOUT]->(b:Brand)
             CREATE (c:Correction {
                id: $id,
                content: $content,
                type: $type,
                status: $status,
                created_at: datetime($created_at)
             })
             MERGE (c)-[:CORRECTS]->(m)
             MERGE (c)-[:FOR_BRAND]->(b)
             RETURN c.id AS id",
        )
        .param("mention_id", c.mention_id.as_str())
        .param("id", id.as_str())
        .param("content", c.content.as_str())
        .param("type", c.correction_type.as_str())
        .param("status", c.status.as_str())
        .param("created_at", format_datetime(&c.created_at));

        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        match stream.next().await.map_err(map_graph_err)? {
            Some(_) => {
                info!(
                    correction_id = id.as_str(),
                    mention_id = c.mention_id.as_str(),
                    "Correction stored"
                );
                Ok(id)
            }
            None => Err(BrandGuardError::NotFound(format!(
                "mention '{}'",
                c.mention_id
            ))),
        }
    }

    /// Attach later-discovered sources (investigation findings) to an
    /// existing mention. Returns the number of relationships created.
    pub async fn link_mention_sources(
        &self,
        mention_id: &str,
        urls: &[String],
    ) -> Result<u32, BrandGuardError> {
        let q = query("MATCH (m:Mention {id: $id}) RETURN m.id AS id").param("id", mention_id);
        let mut stream = self.client.graph.execute(q).await.map_err(map_graph_err)?;
        if stream.next().await.map_err(map_graph_err)?.is_none() {
            return Err(BrandGuardError::NotFound(format!("mention '{mention_id}'")));
        }

        for url in urls {
            self.attach_source(mention_id, url).await?;
        }
        Ok(2 * urls.len() as u32)
    }

    /// Upsert one Source and wire SOURCED_FROM + FEEDS for a mention.
    /// The domain is derived once, at first insertion.
    async fn attach_source(&self, mention_id: &str, url: &str) -> Result<(), BrandGuardError> {
        let q = query(
            "MATCH (m:Mention {id: $id})-[:FOUND_ON]->(p:Platform)
             MERGE (s:Source {url: $url})
             ON CREATE SET s.domain = $domain
             MERGE (m)-[:SOURCED_FROM]->(s)
             MERGE (s)-[:FEEDS]->(p)",
        )
        .param("id", mention_id)
        .param("url", url)
        .param("domain", source_domain(url));

        self.client.graph.run(q).await.map_err(map_graph_err)
    }
}

/// Format a datetime for Cypher's datetime() constructor.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
