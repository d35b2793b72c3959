//! Chat-style message routing.
//!
//! An ordered table of (keywords, action) entries evaluated top to bottom;
//! the first route with a matching keyword wins and the final empty-keyword
//! row catches everything else. Matching order and fallthrough are an
//! explicit, testable contract.

use brandguard_common::BrandGuardError;
use brandguard_graph::GraphReader;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Health,
    Sources,
    Threats,
    Network,
    Trend,
    Overview,
}

pub struct ChatRoute {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub action: ChatAction,
}

/// Evaluated in order; first match wins. Keep the catch-all row last.
pub const ROUTES: &[ChatRoute] = &[
    ChatRoute {
        name: "threats",
        keywords: &["threat", "misinformation", "inaccurate", "wrong", "risk"],
        action: ChatAction::Threats,
    },
    ChatRoute {
        name: "sources",
        keywords: &["source", "website", "spreading", "origin", "where"],
        action: ChatAction::Sources,
    },
    ChatRoute {
        name: "network",
        keywords: &["network", "graph", "map", "visual"],
        action: ChatAction::Network,
    },
    ChatRoute {
        name: "trend",
        keywords: &["trend", "over time", "history", "week", "month"],
        action: ChatAction::Trend,
    },
    ChatRoute {
        name: "health",
        keywords: &["health", "accuracy", "score", "doing"],
        action: ChatAction::Health,
    },
    ChatRoute {
        name: "overview",
        keywords: &[],
        action: ChatAction::Overview,
    },
];

/// Pick the first route whose keywords match the message
/// (case-insensitive substring).
pub fn route(message: &str) -> &'static ChatRoute {
    let message = message.to_lowercase();
    ROUTES
        .iter()
        .find(|r| r.keywords.is_empty() || r.keywords.iter().any(|k| message.contains(k)))
        .expect("routing table always ends with a catch-all")
}

/// Execute a routed action against the aggregation reader.
pub async fn dispatch(
    action: ChatAction,
    brand_id: &str,
    reader: &GraphReader,
) -> Result<serde_json::Value, BrandGuardError> {
    let value = match action {
        ChatAction::Health => json!(reader.brand_health(brand_id).await?),
        ChatAction::Sources => json!(reader.brand_sources(brand_id, 10).await?),
        ChatAction::Threats => json!(reader.brand_threats(brand_id, 10).await?),
        ChatAction::Network => json!(reader.brand_network(brand_id).await?),
        ChatAction::Trend => json!(reader.accuracy_trend(brand_id, 30).await?),
        ChatAction::Overview => json!({
            "health": reader.brand_health(brand_id).await?,
            "top_threats": reader.brand_threats(brand_id, 3).await?,
        }),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_route_to_their_actions() {
        assert_eq!(route("show me current threats").action, ChatAction::Threats);
        assert_eq!(route("which websites are spreading this").action, ChatAction::Sources);
        assert_eq!(route("draw the network graph").action, ChatAction::Network);
        assert_eq!(route("accuracy trend this month").action, ChatAction::Trend);
        assert_eq!(route("how is our brand health").action, ChatAction::Health);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(route("Any MISINFORMATION lately?").action, ChatAction::Threats);
    }

    #[test]
    fn earlier_routes_win_when_several_match() {
        // Mentions both threats and sources; the threats row is first.
        assert_eq!(
            route("which sources feed the worst threats").action,
            ChatAction::Threats
        );
    }

    #[test]
    fn unmatched_messages_fall_through_to_overview() {
        assert_eq!(route("hello there").action, ChatAction::Overview);
        assert_eq!(route("").action, ChatAction::Overview);
    }

    #[test]
    fn catch_all_is_the_last_row() {
        assert!(ROUTES.last().unwrap().keywords.is_empty());
        for r in &ROUTES[..ROUTES.len() - 1] {
            assert!(!r.keywords.is_empty(), "route '{}' has no keywords", r.name);
        }
    }
}
