use anyhow::Result;
use clap::Parser;
use scoutd::{config::Config, rest, AppContext};

#[derive(Parser)]
#[command(
    name = "scoutd",
    about = "Site analysis daemon — crawls a site, runs LLM analysis, serves follow-up chat",
    version
)]
struct Args {
    /// REST API listen port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Bind address (default: 0.0.0.0)
    #[arg(long, env = "SCOUTD_BIND")]
    bind_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SCOUTD_LOG")]
    log: Option<String>,

    /// Model API credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat-completions model name (default: gpt-5-mini)
    #[arg(long, env = "SCOUTD_MODEL")]
    model: Option<String>,

    /// Plain-text URL of the initial-analysis instruction document
    #[arg(long, env = "SCOUTD_MAIN_PROMPT_URL")]
    main_prompt_url: String,

    /// Plain-text URL of the follow-up instruction document
    #[arg(long, env = "SCOUTD_FOLLOWUP_PROMPT_URL")]
    followup_prompt_url: String,

    /// Maximum pages fetched per crawl (default: 25)
    #[arg(long, env = "SCOUTD_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Maximum link depth per crawl (default: 1)
    #[arg(long, env = "SCOUTD_MAX_DEPTH")]
    max_depth: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .compact()
        .init();

    let config = Config::new(
        args.port,
        args.bind_address,
        args.api_key,
        args.model,
        args.main_prompt_url,
        args.followup_prompt_url,
        args.max_pages,
        args.max_depth,
    );

    let ctx = AppContext::new(config)?;
    rest::start_rest_server(ctx).await
}
