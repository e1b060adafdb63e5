// prompts.rs — instruction documents fetched over HTTP as plain text.
//
// The documents are external configuration: their content is opaque to
// the daemon and re-fetched on every request so edits take effect
// without a restart.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// Documents shorter than this are probably an error page, not a prompt.
const SUSPICIOUS_PROMPT_CHARS: usize = 100;

pub async fn fetch_prompt_text(client: &reqwest::Client, url: &str) -> Result<String> {
    info!(url = %url, "fetching instruction document");

    let resp = client
        .get(url)
        .send()
        .await
        .context("instruction document request failed")?;

    let status = resp.status();
    if !status.is_success() {
        bail!("instruction document returned status {status}");
    }

    let text = resp
        .text()
        .await
        .context("failed to read instruction document body")?
        .trim()
        .to_string();

    if text.len() < SUSPICIOUS_PROMPT_CHARS {
        warn!(chars = text.len(), "suspiciously short instruction document");
    }
    info!(chars = text.len(), "instruction document loaded");

    Ok(text)
}
