use serde::Deserialize;

/// Main configuration structure for PagePulse
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub files: FilesConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Number of concurrent workers in the pool
    #[serde(rename = "worker-count")]
    pub worker_count: usize,

    /// Global admission ceiling, requests per second across all workers
    #[serde(rename = "rate-limit-per-sec")]
    pub rate_limit_per_sec: u32,

    /// Total timeout for one fetch (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Input/output file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the file of URLs to scrape, one per line
    #[serde(rename = "input-path")]
    pub input_path: String,

    /// Base path for result files (`.json` and `.csv` are appended)
    #[serde(rename = "output-path")]
    pub output_path: String,
}

/// HTTP server configuration for serve mode
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API and websocket feed listen on
    #[serde(rename = "listen-addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}
