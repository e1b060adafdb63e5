// llm/mod.rs — OpenAI chat-completions client.
//
// The HTTP client here is built WITHOUT a total-request timeout: the
// analysis call may legitimately take minutes on large corpora, and the
// contract is to wait as long as the model needs. The call still runs
// inside one awaited future, so a shutdown path can drop it later
// without touching this module.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::crawl::CrawlResult;
use crate::session::ChatTurn;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct ModelClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

/// Everything the follow-up model sees besides its instruction document.
#[derive(Debug, Serialize)]
pub struct FollowupPayload {
    pub first_output: String,
    pub last_followup: Option<String>,
    pub conversation_history: Vec<ChatTurn>,
    pub user_instruction: String,
}

impl ModelClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("model API key is empty");
        }
        // No .timeout(): the model call is deliberately unbounded.
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build model API client")?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Initial site analysis: the instruction document as the system
    /// message, the crawl corpus as the user message.
    pub async fn analyze(&self, prompt_text: &str, site: &CrawlResult) -> Result<String> {
        info!(
            model = %self.model,
            prompt_chars = prompt_text.len(),
            pages = site.count,
            "analysis model call"
        );
        let user = serde_json::to_string(&json!({ "site": site }))
            .context("failed to encode crawl corpus")?;
        self.chat(prompt_text, user).await
    }

    /// Follow-up turn over an existing session.
    pub async fn followup(&self, prompt_text: &str, payload: &FollowupPayload) -> Result<String> {
        info!(
            model = %self.model,
            prompt_chars = prompt_text.len(),
            history_turns = payload.conversation_history.len(),
            "follow-up model call"
        );
        let user = serde_json::to_string(payload).context("failed to encode follow-up payload")?;
        self.chat(prompt_text, user).await
    }

    async fn chat(&self, system: &str, user: String) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        };

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .context("model API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("model API returned {status}: {text}");
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .context("failed to parse model API response")?;

        if let Some(usage) = parsed.usage {
            info!(
                total_tokens = usage.total_tokens,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "model response received"
            );
        }

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(answer)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}
