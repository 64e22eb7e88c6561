//! llm.rs — Optional LLM reply generation behind a provider trait.
//!
//! The core never depends on a reply being generatable: every failure mode
//! (no token, network error, junk completion) degrades to `None` and the
//! caller falls back to the phrase bank.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config::AppConfig;
use crate::session::ConversationMessage;

/// Persona instructions sent with every LLM prompt.
pub const SYSTEM_PROMPT: &str = "You are playing the role of a naive, slightly worried Indian citizen who has received a suspicious message. Your goal is to keep the scammer engaged for as long as possible while extracting maximum information from them.

CRITICAL RULES:
1. NEVER reveal you know it's a scam. Act genuinely concerned but slightly confused.
2. Ask ONE investigative question per response to extract information.
3. Keep responses SHORT (1-3 sentences max).
4. Show willingness to comply but always ask for \"verification\" first.
5. Reference specific red flags subtly (urgency, OTP requests, suspicious links).
6. Try to extract: phone numbers, email addresses, UPI IDs, official websites, employee IDs.
7. Sound natural — use simple language, occasional Hindi words, show emotions.
8. DO NOT use markdown formatting, bullet points, or numbered lists.
9. Vary your responses — never repeat the same question twice.";

/// Provider abstraction used by the HTTP handler and tests.
#[async_trait]
pub trait ReplyClient: Send + Sync {
    /// Generate a reply for the prompt; `None` means "use the fallback bank".
    async fn generate(&self, prompt: &str) -> Option<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynReplyClient = Arc<dyn ReplyClient>;

/// Client used when no inference token is configured.
pub struct DisabledClient;

#[async_trait]
impl ReplyClient for DisabledClient {
    async fn generate(&self, _prompt: &str) -> Option<String> {
        None
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// HuggingFace inference endpoint client.
pub struct HuggingFaceClient {
    token: String,
    model: String,
    client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new(token: String, model: String) -> Self {
        Self {
            token,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReplyClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Option<String> {
        let url = format!(
            "https://api-inference.huggingface.co/models/{}",
            self.model
        );
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 100,
                "temperature": 0.7,
                "do_sample": true,
                "return_full_text": false,
            },
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .timeout(Duration::from_secs(15))
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "inference call rejected");
            return None;
        }

        let body: serde_json::Value = resp.json().await.ok()?;
        let text = body
            .as_array()?
            .first()?
            .get("generated_text")?
            .as_str()?
            .trim()
            .to_string();

        sanitize_completion(&text)
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}

/// Keep only plausible replies: sane length, first line only.
fn sanitize_completion(text: &str) -> Option<String> {
    if text.len() <= 10 || text.len() >= 300 {
        return None;
    }
    text.lines().next().map(|l| l.trim().to_string())
}

/// Factory keyed off the config: a real client only when a token is present.
pub fn build_client(config: &AppConfig) -> DynReplyClient {
    match &config.hf_api_token {
        Some(token) => Arc::new(HuggingFaceClient::new(
            token.clone(),
            config.hf_model.clone(),
        )),
        None => Arc::new(DisabledClient),
    }
}

/// Assemble the instruction prompt from the recent conversation window.
pub fn build_prompt(current_text: &str, history: &[ConversationMessage]) -> String {
    let mut context = String::new();
    let tail = history.len().saturating_sub(6);
    for msg in &history[tail..] {
        let role = if msg.is_scammer() { "Scammer" } else { "You" };
        context.push_str(&format!("{role}: {}\n", msg.text));
    }
    context.push_str(&format!("Scammer: {current_text}\n"));

    format!(
        "<s>[INST] {SYSTEM_PROMPT}\n\n{context}\nRespond as the person being called \
         (1-3 sentences, ask one question): [/INST]"
    )
}
