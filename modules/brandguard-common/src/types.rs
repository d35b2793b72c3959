use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mentions scoring at or above this are considered accurate.
pub const ACCURACY_THRESHOLD: f64 = 70.0;

/// Platforms seeded at schema initialization. Lower-case canonical names;
/// additional platforms are upserted on demand.
pub const KNOWN_PLATFORMS: &[&str] = &["chatgpt", "claude", "perplexity", "gemini"];

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Band an accuracy score into a severity. Lower bound of each band is
    /// inclusive: <40 critical, <60 high, <80 medium, else low.
    pub fn from_accuracy(score: f64) -> Self {
        if score < 40.0 {
            Severity::Critical
        } else if score < 60.0 {
            Severity::High
        } else if score < 80.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// High and critical mentions warrant an alert.
    pub fn warrants_alert(self) -> bool {
        self >= Severity::High
    }

    /// Only critical mentions are queued for automatic remediation.
    pub fn warrants_auto_remediation(self) -> bool {
        self == Severity::Critical
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

// --- Write-side inputs ---

/// A new mention observation headed for the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMention {
    /// Caller-supplied id; generated when absent.
    pub id: Option<String>,
    pub brand_id: String,
    pub brand_name: String,
    /// Lower-cased before storage.
    pub platform: String,
    pub claim: String,
    /// 0–100.
    pub accuracy_score: f64,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
    pub source_urls: Vec<String>,
}

/// Result of storing a mention.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMention {
    pub mention_id: String,
    pub relationships_created: u32,
}

/// A mention read back from the graph, with its brand and cited sources.
#[derive(Debug, Clone, Serialize)]
pub struct MentionRecord {
    pub id: String,
    pub brand_id: String,
    pub brand_name: String,
    pub platform: String,
    pub claim: String,
    pub accuracy_score: f64,
    pub is_accurate: bool,
    pub severity: Severity,
    pub detected_at: String,
    pub source_urls: Vec<String>,
}

/// A remediation artifact targeting one mention. Brand linkage is derived
/// through the mention's ABOUT edge, never supplied here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCorrection {
    pub mention_id: String,
    pub content: String,
    pub correction_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// --- Aggregation results ---

#[derive(Debug, Clone, Serialize)]
pub struct PlatformHealth {
    pub platform: String,
    pub mentions: u32,
    /// Rounded to 1 decimal.
    pub avg_accuracy: f64,
    pub accurate: u32,
    /// High + critical severity count.
    pub threats: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandHealth {
    pub brand_id: String,
    pub total_mentions: u32,
    /// Mention-count-weighted mean across platforms, rounded to 1 decimal.
    pub overall_accuracy: f64,
    pub accurate_mentions: u32,
    pub threats: u32,
    pub by_platform: Vec<PlatformHealth>,
}

impl BrandHealth {
    /// Zeroed health for a brand with no mentions.
    pub fn empty(brand_id: &str) -> Self {
        Self {
            brand_id: brand_id.to_string(),
            total_mentions: 0,
            overall_accuracy: 0.0,
            accurate_mentions: 0,
            threats: 0,
            by_platform: Vec::new(),
        }
    }
}

/// A source ranked by how many low-accuracy mentions it feeds.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfluence {
    pub url: String,
    pub domain: String,
    pub mentions_fed: u32,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub mentions: u32,
    pub avg_accuracy: f64,
}

/// An inaccurate mention annotated for the threat feed.
#[derive(Debug, Clone, Serialize)]
pub struct ThreatMention {
    pub id: String,
    pub claim: String,
    pub platform: String,
    pub accuracy_score: f64,
    pub severity: Severity,
    pub detected_at: String,
    pub source_domains: Vec<String>,
    pub context: String,
}

// --- Network graph (visualization) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkNodeKind {
    Brand,
    Platform,
    Mention,
    Source,
    Correction,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    pub kind: NetworkNodeKind,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkEdge {
    pub from: String,
    pub to: String,
    pub rel: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

/// Derive a source's domain from its URL host. Computed once, at first
/// insertion. Falls back to the raw input when it does not parse as a URL.
pub fn source_domain(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(u) => u.host_str().unwrap_or(raw).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Round to one decimal place (dashboard accuracy figures).
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands_are_lower_bound_inclusive() {
        let cases = [
            (39.0, Severity::Critical),
            (40.0, Severity::High),
            (59.0, Severity::High),
            (60.0, Severity::Medium),
            (79.0, Severity::Medium),
            (80.0, Severity::Low),
            (95.0, Severity::Low),
        ];
        for (score, expected) in cases {
            assert_eq!(Severity::from_accuracy(score), expected, "score {score}");
        }
    }

    #[test]
    fn high_and_critical_warrant_alerts() {
        assert!(!Severity::Low.warrants_alert());
        assert!(!Severity::Medium.warrants_alert());
        assert!(Severity::High.warrants_alert());
        assert!(Severity::Critical.warrants_alert());
    }

    #[test]
    fn only_critical_warrants_auto_remediation() {
        assert!(!Severity::High.warrants_auto_remediation());
        assert!(Severity::Critical.warrants_auto_remediation());
    }

    #[test]
    fn severity_round_trips_through_strings() {
        for s in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            assert_eq!(s.to_string().parse::<Severity>().unwrap(), s);
        }
    }

    #[test]
    fn domain_is_the_url_host() {
        assert_eq!(
            source_domain("https://fake-news-daily.com/tech/acme"),
            "fake-news-daily.com"
        );
        assert_eq!(
            source_domain("https://reddit.com/r/tech/comments/acme"),
            "reddit.com"
        );
    }

    #[test]
    fn unparseable_url_falls_back_to_raw_input() {
        assert_eq!(source_domain("not a url"), "not a url");
    }
}
