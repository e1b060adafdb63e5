use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL: &str = "gpt-5-mini";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Daemon configuration, assembled in `main` from CLI flags and env.
#[derive(Debug, Clone)]
pub struct Config {
    /// REST listen port (`PORT` env or `--port`).
    pub port: u16,
    /// Bind address; the service fronts a browser app, so it binds all
    /// interfaces by default.
    pub bind_address: String,
    /// Model API credential (`OPENAI_API_KEY`). Must be non-empty.
    pub api_key: String,
    /// Chat-completions model name.
    pub model: String,
    /// Plain-text document holding the initial-analysis instructions.
    pub main_prompt_url: String,
    /// Plain-text document holding the follow-up instructions.
    pub followup_prompt_url: String,
    /// Page budget per crawl.
    pub max_pages: usize,
    /// Hop limit per crawl.
    pub max_depth: u32,
    /// Per-request timeout for crawl fetches and document fetches.
    /// The model call carries no timeout at all.
    pub fetch_timeout_secs: u64,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        port: Option<u16>,
        bind_address: Option<String>,
        api_key: String,
        model: Option<String>,
        main_prompt_url: String,
        followup_prompt_url: String,
        max_pages: Option<usize>,
        max_depth: Option<u32>,
    ) -> Self {
        Self {
            port: port.unwrap_or(DEFAULT_PORT),
            bind_address: bind_address.unwrap_or_else(default_bind_address),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            main_prompt_url,
            followup_prompt_url,
            max_pages: max_pages.unwrap_or(crate::crawl::DEFAULT_MAX_PAGES),
            max_depth: max_depth.unwrap_or(crate::crawl::DEFAULT_MAX_DEPTH),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
