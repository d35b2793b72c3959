#![cfg(feature = "test-utils")]

// Graph store integration tests: merge-based identity, correction linkage
// integrity, and the aggregation reads, against a real Neo4j.
//
// Requirements: Docker (for Neo4j via testcontainers)
//
// Run with: cargo test -p brandguard-graph --features test-utils --test graph_store_test

use chrono::Utc;

use brandguard_common::{NewCorrection, NewMention, Severity};
use brandguard_graph::{migrate, GraphReader, GraphWriter};

fn mention(brand_id: &str, platform: &str, score: f64, sources: &[&str]) -> NewMention {
    NewMention {
        id: None,
        brand_id: brand_id.to_string(),
        brand_name: "Acme Corp".to_string(),
        platform: platform.to_string(),
        claim: format!("claim about {brand_id} scoring {score}"),
        accuracy_score: score,
        severity: Severity::from_accuracy(score),
        detected_at: Utc::now(),
        source_urls: sources.iter().map(|s| s.to_string()).collect(),
    }
}

async fn count(client: &brandguard_graph::GraphClient, cypher: &str) -> i64 {
    let mut stream = client
        .inner()
        .execute(neo4rs::query(cypher))
        .await
        .expect("count query");
    let row = stream.next().await.expect("stream").expect("row");
    row.get("cnt").unwrap_or(0)
}

#[tokio::test]
async fn schema_init_is_idempotent() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;

    migrate::init_schema(&client).await.expect("first run");
    migrate::init_schema(&client).await.expect("second run");

    let platforms = count(&client, "MATCH (p:Platform) RETURN count(p) AS cnt").await;
    assert_eq!(platforms, 4);
}

#[tokio::test]
async fn same_brand_and_source_are_never_duplicated() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());

    let url = "https://old-wiki.org/acme-corp";
    let first = writer
        .store_mention(&mention("acme-corp", "chatgpt", 30.0, &[url]))
        .await
        .unwrap();
    let second = writer
        .store_mention(&mention("acme-corp", "claude", 85.0, &[url]))
        .await
        .unwrap();

    assert_eq!(first.relationships_created, 4);
    assert_eq!(second.relationships_created, 4);

    let brands = count(
        &client,
        "MATCH (b:Brand {id: 'acme-corp'}) RETURN count(b) AS cnt",
    )
    .await;
    assert_eq!(brands, 1);

    let sources = count(&client, "MATCH (s:Source) RETURN count(s) AS cnt").await;
    assert_eq!(sources, 1);

    // The shared source accumulated one inbound edge per citing mention.
    let inbound = count(
        &client,
        "MATCH (:Mention)-[r:SOURCED_FROM]->(:Source) RETURN count(r) AS cnt",
    )
    .await;
    assert_eq!(inbound, 2);
}

#[tokio::test]
async fn correction_for_unknown_mention_leaves_no_orphan() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());

    let err = writer
        .store_correction(&NewCorrection {
            mention_id: "does-not-exist".to_string(),
            content: "correction text".to_string(),
            correction_type: "blog_post".to_string(),
            status: "draft".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, brandguard_common::BrandGuardError::NotFound(_)));

    let corrections = count(&client, "MATCH (c:Correction) RETURN count(c) AS cnt").await;
    assert_eq!(corrections, 0);
}

#[tokio::test]
async fn correction_links_to_mention_and_its_brand() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());

    let stored = writer
        .store_mention(&mention("acme-corp", "chatgpt", 20.0, &[]))
        .await
        .unwrap();

    let correction_id = writer
        .store_correction(&NewCorrection {
            mention_id: stored.mention_id.clone(),
            content: "Acme was founded in 2015, not 1990.".to_string(),
            correction_type: "blog_post".to_string(),
            status: "draft".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    assert!(!correction_id.is_empty());

    let linked = count(
        &client,
        "MATCH (c:Correction)-[:FOR_BRAND]->(b:Brand {id: 'acme-corp'}) RETURN count(c) AS cnt",
    )
    .await;
    assert_eq!(linked, 1);
}

#[tokio::test]
async fn health_aggregates_per_platform_and_weights_overall() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    // chatgpt: 2 mentions averaging 90; claude: 8 mentions averaging 50.
    for _ in 0..2 {
        writer
            .store_mention(&mention("acme-corp", "chatgpt", 90.0, &[]))
            .await
            .unwrap();
    }
    for _ in 0..8 {
        writer
            .store_mention(&mention("acme-corp", "claude", 50.0, &[]))
            .await
            .unwrap();
    }

    let health = reader.brand_health("acme-corp").await.unwrap();
    assert_eq!(health.total_mentions, 10);
    assert_eq!(health.overall_accuracy, 58.0);
    assert_eq!(health.accurate_mentions, 2);
    // Every claude mention scored 50 → high severity.
    assert_eq!(health.threats, 8);
    assert_eq!(health.by_platform.len(), 2);
}

#[tokio::test]
async fn unknown_brand_health_is_zeroed_not_an_error() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let reader = GraphReader::new(client.clone());

    let health = reader.brand_health("ghost-brand").await.unwrap();
    assert_eq!(health.total_mentions, 0);
    assert_eq!(health.overall_accuracy, 0.0);
    assert!(health.by_platform.is_empty());

    let threats = reader.brand_threats("ghost-brand", 10).await.unwrap();
    assert!(threats.is_empty());
}

#[tokio::test]
async fn sources_rank_by_low_accuracy_mentions_fed() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    let busy = "https://fake-news-daily.com/tech/acme";
    let quiet = "https://old-wiki.org/acme-corp";

    for _ in 0..3 {
        writer
            .store_mention(&mention("acme-corp", "chatgpt", 25.0, &[busy]))
            .await
            .unwrap();
    }
    writer
        .store_mention(&mention("acme-corp", "gemini", 30.0, &[quiet]))
        .await
        .unwrap();
    // Accurate mention citing the busy source must not count toward it.
    writer
        .store_mention(&mention("acme-corp", "claude", 92.0, &[busy]))
        .await
        .unwrap();

    let ranked = reader.brand_sources("acme-corp", 10).await.unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].url, busy);
    assert_eq!(ranked[0].mentions_fed, 3);
    assert_eq!(ranked[0].domain, "fake-news-daily.com");
    assert_eq!(ranked[0].platforms, vec!["chatgpt".to_string()]);
    assert_eq!(ranked[1].url, quiet);
    assert_eq!(ranked[1].mentions_fed, 1);
}

#[tokio::test]
async fn network_emits_each_logical_feeds_edge_once() {
    let (_container, client) = brandguard_graph::testutil::neo4j_container().await;
    migrate::init_schema(&client).await.unwrap();
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    let url = "https://misleading-review.net/acme";
    for _ in 0..3 {
        writer
            .store_mention(&mention("acme-corp", "perplexity", 15.0, &[url]))
            .await
            .unwrap();
    }

    let graph = reader.brand_network("acme-corp").await.unwrap();

    let feeds: Vec<_> = graph.edges.iter().filter(|e| e.rel == "FEEDS").collect();
    assert_eq!(feeds.len(), 1, "FEEDS edge must be deduplicated");

    // 1 brand + 3 mentions + 1 platform + 1 source.
    assert_eq!(graph.nodes.len(), 6);
}
