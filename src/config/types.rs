use crate::output::JsonlMode;
use serde::Deserialize;

/// Seed pages crawled when no configuration file overrides them
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://en.wikipedia.org/wiki/Robotics",
    "https://en.wikipedia.org/wiki/Robot",
    "https://en.wikipedia.org/wiki/Reinforcement_learning",
    "https://en.wikipedia.org/wiki/Robot_Operating_System",
    "https://en.wikipedia.org/wiki/Intelligent_agent",
    "https://en.wikipedia.org/wiki/Software_agent",
    "https://en.wikipedia.org/wiki/Robotic_process_automation",
    "https://en.wikipedia.org/wiki/Chatbot",
    "https://en.wikipedia.org/wiki/Applications_of_artificial_intelligence",
    "https://en.wikipedia.org/wiki/Android_(robot)",
];

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_OUTPUT_PATH: &str = "scraped_data.jl";

/// Main configuration structure for Wiki-Reader
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pages to fetch, in submission order
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Fetch and politeness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight requests per domain
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Fixed delay held after each request to a domain (milliseconds)
    #[serde(rename = "delay-ms", default)]
    pub delay_ms: u64,

    /// Ceiling of the random delay added after each request (milliseconds)
    #[serde(rename = "random-delay-ms", default = "default_random_delay_ms")]
    pub random_delay_ms: u64,

    /// CSS selector whose matches become text fragments
    #[serde(default = "default_selector")]
    pub selector: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Optional per-request timeout (seconds); no timeout when unset
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the line-delimited JSON artifact
    #[serde(default = "default_output_path")]
    pub path: String,

    /// How strictly the artifact is checked after writing
    #[serde(rename = "jsonl-mode", default)]
    pub jsonl_mode: JsonlMode,
}

fn default_seeds() -> Vec<String> {
    DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect()
}

fn default_parallelism() -> u32 {
    2
}

fn default_random_delay_ms() -> u64 {
    1000
}

fn default_selector() -> String {
    "p".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seeds: default_seeds(),
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            delay_ms: 0,
            random_delay_ms: default_random_delay_ms(),
            selector: default_selector(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            jsonl_mode: JsonlMode::default(),
        }
    }
}
