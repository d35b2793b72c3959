use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // External analysis collaborators
    pub tavily_api_key: String,
    pub yutori_api_key: String,
    pub yutori_base_url: String,
    pub senso_api_key: String,
    pub senso_base_url: String,
    pub modulate_api_key: String,
    pub modulate_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            tavily_api_key: required_env("TAVILY_API_KEY"),
            yutori_api_key: required_env("YUTORI_API_KEY"),
            yutori_base_url: env::var("YUTORI_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.yutori.com".to_string()),
            senso_api_key: required_env("SENSO_API_KEY"),
            senso_base_url: env::var("SENSO_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.senso.ai".to_string()),
            modulate_api_key: required_env("MODULATE_API_KEY"),
            modulate_base_url: env::var("MODULATE_API_BASE_URL")
                .unwrap_or_else(|_| "https://modulate-developer-apis.com".to_string()),
        }
    }

    /// Load a minimal config for dashboard readers (graph only, no
    /// collaborator keys needed).
    pub fn dashboard_from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            tavily_api_key: String::new(),
            yutori_api_key: String::new(),
            yutori_base_url: String::new(),
            senso_api_key: String::new(),
            senso_base_url: String::new(),
            modulate_api_key: String::new(),
            modulate_base_url: String::new(),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
