//! Assembly of the explorable brand subgraph for visualization.
//!
//! The traversal query returns one denormalized row per
//! (mention, source, correction) combination, so the same logical node or
//! edge shows up many times. Assembly deduplicates nodes by id and edges by
//! their structural key (endpoint pair + relationship type): a Source
//! feeding a Platform is discovered once per citing Mention but emitted
//! exactly once.

use std::collections::HashSet;

use brandguard_common::{NetworkEdge, NetworkGraph, NetworkNode, NetworkNodeKind};

const BRAND_COLOR: &str = "#6366f1";
const PLATFORM_COLOR: &str = "#0ea5e9";
const ACCURATE_MENTION_COLOR: &str = "#22c55e";
const INACCURATE_MENTION_COLOR: &str = "#ef4444";
const SOURCE_COLOR: &str = "#f59e0b";
const CORRECTION_COLOR: &str = "#a855f7";

const MENTION_LABEL_MAX: usize = 80;

/// One denormalized traversal row. Everything past the brand is optional:
/// a brand with no mentions yields a single row of nulls.
#[derive(Debug, Default, Clone)]
pub(crate) struct NetworkRow {
    pub brand_id: String,
    pub brand_name: String,
    pub mention_id: Option<String>,
    pub claim: Option<String>,
    pub is_accurate: Option<bool>,
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub source_domain: Option<String>,
    pub correction_id: Option<String>,
    pub correction_status: Option<String>,
}

pub(crate) fn node_color(kind: NetworkNodeKind, is_accurate: bool) -> &'static str {
    match kind {
        NetworkNodeKind::Brand => BRAND_COLOR,
        NetworkNodeKind::Platform => PLATFORM_COLOR,
        NetworkNodeKind::Mention => {
            if is_accurate {
                ACCURATE_MENTION_COLOR
            } else {
                INACCURATE_MENTION_COLOR
            }
        }
        NetworkNodeKind::Source => SOURCE_COLOR,
        NetworkNodeKind::Correction => CORRECTION_COLOR,
    }
}

pub(crate) fn assemble(rows: &[NetworkRow]) -> NetworkGraph {
    let mut graph = NetworkGraph::default();
    let mut seen_nodes: HashSet<String> = HashSet::new();
    let mut seen_edges: HashSet<(String, String, &'static str)> = HashSet::new();

    let mut push_node = |graph: &mut NetworkGraph, node: NetworkNode| {
        if seen_nodes.insert(node.id.clone()) {
            graph.nodes.push(node);
        }
    };
    let mut push_edge = |graph: &mut NetworkGraph, from: String, to: String, rel: &'static str| {
        if seen_edges.insert((from.clone(), to.clone(), rel)) {
            graph.edges.push(NetworkEdge {
                from,
                to,
                rel: rel.to_string(),
            });
        }
    };

    for row in rows {
        let brand_id = format!("brand:{}", row.brand_id);
        push_node(
            &mut graph,
            NetworkNode {
                id: brand_id.clone(),
                label: row.brand_name.clone(),
                kind: NetworkNodeKind::Brand,
                color: node_color(NetworkNodeKind::Brand, false).to_string(),
            },
        );

        let mention_id = match &row.mention_id {
            Some(id) => {
                let accurate = row.is_accurate.unwrap_or(false);
                let node_id = format!("mention:{id}");
                push_node(
                    &mut graph,
                    NetworkNode {
                        id: node_id.clone(),
                        label: truncate(row.claim.as_deref().unwrap_or(""), MENTION_LABEL_MAX),
                        kind: NetworkNodeKind::Mention,
                        color: node_color(NetworkNodeKind::Mention, accurate).to_string(),
                    },
                );
                push_edge(&mut graph, node_id.clone(), brand_id.clone(), "ABOUT");
                Some(node_id)
            }
            None => None,
        };

        let platform_id = match (&row.platform, &mention_id) {
            (Some(name), Some(mid)) => {
                let node_id = format!("platform:{name}");
                push_node(
                    &mut graph,
                    NetworkNode {
                        id: node_id.clone(),
                        label: name.clone(),
                        kind: NetworkNodeKind::Platform,
                        color: node_color(NetworkNodeKind::Platform, false).to_string(),
                    },
                );
                push_edge(&mut graph, mid.clone(), node_id.clone(), "FOUND_ON");
                Some(node_id)
            }
            _ => None,
        };

        if let (Some(url), Some(mid)) = (&row.source_url, &mention_id) {
            let node_id = format!("source:{url}");
            push_node(
                &mut graph,
                NetworkNode {
                    id: node_id.clone(),
                    label: row.source_domain.clone().unwrap_or_else(|| url.clone()),
                    kind: NetworkNodeKind::Source,
                    color: node_color(NetworkNodeKind::Source, false).to_string(),
                },
            );
            push_edge(&mut graph, mid.clone(), node_id.clone(), "SOURCED_FROM");
            if let Some(pid) = &platform_id {
                push_edge(&mut graph, node_id, pid.clone(), "FEEDS");
            }
        }

        if let (Some(cid), Some(mid)) = (&row.correction_id, &mention_id) {
            let node_id = format!("correction:{cid}");
            push_node(
                &mut graph,
                NetworkNode {
                    id: node_id.clone(),
                    label: row
                        .correction_status
                        .clone()
                        .unwrap_or_else(|| "correction".to_string()),
                    kind: NetworkNodeKind::Correction,
                    color: node_color(NetworkNodeKind::Correction, false).to_string(),
                },
            );
            push_edge(&mut graph, node_id.clone(), mid.clone(), "CORRECTS");
            push_edge(&mut graph, node_id, brand_id.clone(), "FOR_BRAND");
        }
    }

    graph
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…")
    }
}
