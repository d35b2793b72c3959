use serde::{Deserialize, Serialize};

/// One web search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Snippet of the matching content.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// AI-synthesized answer, when requested.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResult {
    pub url: String,
    #[serde(default)]
    pub raw_content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FailedExtract {
    pub url: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub results: Vec<ExtractResult>,
    #[serde(default)]
    pub failed_results: Vec<FailedExtract>,
}

/// Parameters for the search endpoint beyond the query itself.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOptions {
    pub topic: String,
    pub search_depth: String,
    pub max_results: u32,
    pub include_answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            topic: "general".to_string(),
            search_depth: "basic".to_string(),
            max_results: 10,
            include_answer: true,
            time_range: None,
        }
    }
}
