//! Client for the remote distractor-generation oracle.
//!
//! The oracle is a plain chat-completion endpoint: we send a direction-
//! specific natural-language prompt and expect a single text reply containing
//! exactly three pipe-delimited distractors. No retries happen here — the
//! resolver decides what a failure means (it falls back to pool sampling).
//!
//! The credential is injected through [`OracleConfig`]; nothing in this
//! module reads the environment behind the caller's back, which makes the
//! no-credential path ([`OracleError::Unavailable`]) deterministically
//! testable.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz_engine::models::{QuestionDirection, DISTRACTORS_PER_ROUND};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum OracleError {
    /// No credential configured, or the remote call failed in transport.
    /// The caller falls back without treating this as a bug.
    #[error("distractor oracle unavailable: {reason}")]
    Unavailable { reason: String },
    /// The oracle answered, but not with the expected three tokens.
    /// The result must not be cached or used.
    #[error("malformed oracle response: expected 3 options, got {got}")]
    MalformedResponse { got: usize },
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Unavailable { reason: err.to_string() }
    }
}

/// Connection settings for the oracle. `api_key: None` means the oracle is
/// deliberately absent and every call returns [`OracleError::Unavailable`].
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn new(api_key: Option<String>) -> Self {
        OracleConfig {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Edge constructor reading `OPENAI_API_KEY`. The algorithm itself never
    /// touches the environment; this exists for binaries wiring things up.
    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENAI_API_KEY").ok())
    }
}

/// Anything that can produce a distractor set for a word and direction.
///
/// The production implementation is [`OracleClient`]; tests substitute
/// scripted sources to observe invocation counts and failure handling.
#[allow(async_fn_in_trait)]
pub trait DistractorSource {
    async fn generate(
        &self,
        word: &str,
        correct_meaning: &str,
        direction: QuestionDirection,
    ) -> Result<Vec<String>, OracleError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OracleClient {
    config: OracleConfig,
    http: reqwest::Client,
}

impl OracleClient {
    pub fn new(config: OracleConfig) -> Self {
        OracleClient { config, http: reqwest::Client::new() }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }
}

impl DistractorSource for OracleClient {
    async fn generate(
        &self,
        word: &str,
        correct_meaning: &str,
        direction: QuestionDirection,
    ) -> Result<Vec<String>, OracleError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(OracleError::Unavailable {
                reason: "no API credential configured".to_string(),
            });
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(word, correct_meaning, direction),
            }],
            temperature: 0.7,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let content = response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(OracleError::MalformedResponse { got: 0 })?;

        parse_reply(content)
    }
}

/// Build the direction-specific generation prompt.
pub fn build_prompt(word: &str, correct_meaning: &str, direction: QuestionDirection) -> String {
    match direction {
        QuestionDirection::WordToMeaning => format!(
            "Generate 3 incorrect but plausible short Japanese meanings for the English word \
             \"{word}\" (which actually means \"{correct_meaning}\"). Output ONLY the 3 meanings \
             separated by a pipe character (|). Example format: 意味1|意味2|意味3"
        ),
        QuestionDirection::MeaningToWord => format!(
            "Generate 3 incorrect but plausible English words that could be mistaken for the \
             Japanese meaning \"{correct_meaning}\" (which actually corresponds to \"{word}\"). \
             Output ONLY the 3 words separated by a pipe character (|). \
             Example format: word1|word2|word3"
        ),
    }
}

/// Split the oracle's reply on `|` and trim each segment.
///
/// Anything other than exactly three segments is a malformed response.
pub fn parse_reply(content: &str) -> Result<Vec<String>, OracleError> {
    let options: Vec<String> = content.split('|').map(|s| s.trim().to_string()).collect();
    if options.len() != DISTRACTORS_PER_ROUND {
        return Err(OracleError::MalformedResponse { got: options.len() });
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_with_three_tokens_parses_and_trims() {
        let parsed = parse_reply(" 柿 | 梨 |桃").unwrap();
        assert_eq!(parsed, vec!["柿", "梨", "桃"]);
    }

    #[test]
    fn reply_with_wrong_arity_is_malformed() {
        match parse_reply("柿|梨") {
            Err(OracleError::MalformedResponse { got }) => assert_eq!(got, 2),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        match parse_reply("柿|梨|桃|葡萄") {
            Err(OracleError::MalformedResponse { got }) => assert_eq!(got, 4),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn prompt_mentions_word_and_meaning_in_both_directions() {
        let forward = build_prompt("apple", "りんご", QuestionDirection::WordToMeaning);
        assert!(forward.contains("\"apple\""));
        assert!(forward.contains("\"りんご\""));
        assert!(forward.contains("Japanese meanings"));

        let reverse = build_prompt("apple", "りんご", QuestionDirection::MeaningToWord);
        assert!(reverse.contains("\"apple\""));
        assert!(reverse.contains("\"りんご\""));
        assert!(reverse.contains("English words"));
    }

    #[tokio::test]
    async fn missing_credential_is_unavailable_without_any_network() {
        let client = OracleClient::new(OracleConfig::new(None));
        let result = client.generate("apple", "りんご", QuestionDirection::WordToMeaning).await;
        match result {
            Err(OracleError::Unavailable { .. }) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
