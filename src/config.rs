//! config.rs — Environment-driven service configuration.
//!
//! `.env` loading happens once in `main`; everything here is plain env reads
//! with the original deployment's defaults.

pub const ENV_API_KEY: &str = "HONEYPOT_API_KEY";
pub const ENV_CALLBACK_URL: &str = "CALLBACK_URL";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";
pub const ENV_HF_MODEL: &str = "HF_MODEL";
pub const ENV_FINAL_OUTPUT_MIN_TURN: &str = "FINAL_OUTPUT_MIN_TURN";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";

pub const DEFAULT_API_KEY: &str = "test123";
pub const DEFAULT_CALLBACK_URL: &str = "https://hackathon.guvi.in/api/updateHoneyPotFinalResult";
pub const DEFAULT_HF_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
pub const DEFAULT_FINAL_OUTPUT_MIN_TURN: usize = 5;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Expected `x-api-key` header; `None` disables the check.
    pub api_key: Option<String>,
    /// Where the final report is POSTed.
    pub callback_url: String,
    /// HuggingFace inference token; `None` disables the LLM reply path.
    pub hf_api_token: Option<String>,
    pub hf_model: String,
    /// Turn index (length of supplied history) from which the final report
    /// is shipped to the callback.
    pub final_output_min_turn: usize,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: Some(DEFAULT_API_KEY.to_string()),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            hf_api_token: None,
            hf_model: DEFAULT_HF_MODEL.to_string(),
            final_output_min_turn: DEFAULT_FINAL_OUTPUT_MIN_TURN,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty(std::env::var(ENV_API_KEY).unwrap_or_else(|_| DEFAULT_API_KEY.into())),
            callback_url: std::env::var(ENV_CALLBACK_URL)
                .ok()
                .and_then(non_empty)
                .unwrap_or(defaults.callback_url),
            hf_api_token: std::env::var(ENV_HF_API_TOKEN).ok().and_then(non_empty),
            hf_model: std::env::var(ENV_HF_MODEL)
                .ok()
                .and_then(non_empty)
                .unwrap_or(defaults.hf_model),
            final_output_min_turn: std::env::var(ENV_FINAL_OUTPUT_MIN_TURN)
                .ok()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(DEFAULT_FINAL_OUTPUT_MIN_TURN),
            bind_addr: std::env::var(ENV_BIND_ADDR)
                .ok()
                .and_then(non_empty)
                .unwrap_or(defaults.bind_addr),
        }
    }
}

/// Empty or whitespace-only values behave as unset.
fn non_empty(v: String) -> Option<String> {
    let trimmed = v.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployment_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_key.as_deref(), Some("test123"));
        assert_eq!(cfg.final_output_min_turn, 5);
        assert!(cfg.hf_api_token.is_none());
    }

    #[test]
    fn blank_values_read_as_unset() {
        assert_eq!(non_empty("".into()), None);
        assert_eq!(non_empty("   ".into()), None);
        assert_eq!(non_empty(" x ".into()), Some("x".to_string()));
    }
}
