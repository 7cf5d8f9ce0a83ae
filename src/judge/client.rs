//! @ai:module:intent Semantic judge clients: HTTP chat APIs and a deterministic mock
//! @ai:module:layer infrastructure
//! @ai:module:public_api SemanticJudge, HttpJudge, MockJudge
//! @ai:module:stateless false

use crate::config::{JudgeConfig, JudgeProvider};
use crate::error::JudgeError;
use crate::judge::rate_limiter::{RateLimiter, RateLimiterTrait};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// @ai:intent One prompt in, one text reply out
#[async_trait]
pub trait SemanticJudge: Send + Sync {
    /// @ai:intent Model identifier reported in results
    fn model(&self) -> &str;

    /// @ai:intent Ask the judge and return its reply verbatim
    async fn judge(&self, prompt: &str, system: Option<&str>) -> Result<String, JudgeError>;
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Anthropic Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// @ai:intent OpenAI Chat Completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// @ai:intent Rate-limited judge over the Anthropic or OpenAI chat API
pub struct HttpJudge {
    client: reqwest::Client,
    config: JudgeConfig,
    rate_limiter: Arc<RateLimiter>,
    api_key: String,
}

impl HttpJudge {
    /// @ai:intent Create a judge reading its API key from the environment
    /// @ai:pre the configured key variable is set
    /// @ai:effects env
    pub fn new(config: JudgeConfig) -> Result<Self, JudgeError> {
        let key_var = config.api_key_env().to_string();
        let api_key = std::env::var(&key_var).map_err(|_| JudgeError::MissingApiKey(key_var))?;

        Self::with_api_key(config, api_key)
    }

    /// @ai:intent Create a judge with an explicit key
    /// @ai:effects pure
    pub fn with_api_key(config: JudgeConfig, api_key: String) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let rate_limiter = Arc::new(RateLimiter::new(config.requests_per_minute));

        Ok(Self {
            client,
            config,
            rate_limiter,
            api_key,
        })
    }

    /// @ai:intent Full endpoint for the configured provider
    /// @ai:effects pure
    pub fn endpoint(&self) -> String {
        match self.config.provider {
            JudgeProvider::Anthropic => format!("{}/v1/messages", self.config.base_url()),
            JudgeProvider::OpenAi => format!("{}/v1/chat/completions", self.config.base_url()),
        }
    }

    async fn ask_anthropic(&self, prompt: &str, system: Option<&str>) -> Result<String, JudgeError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let body: MessagesResponse = read_json(response).await?;

        let text = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }

    async fn ask_openai(&self, prompt: &str, system: Option<&str>) -> Result<String, JudgeError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body: ChatResponse = read_json(response).await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| JudgeError::Parse("response has no message content".to_string()))
    }
}

/// Map non-2xx statuses to `JudgeError::Api`, then decode the body.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, JudgeError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(JudgeError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| JudgeError::Parse(e.to_string()))
}

#[async_trait]
impl SemanticJudge for HttpJudge {
    fn model(&self) -> &str {
        &self.config.model
    }

    /// @ai:intent Send one prompt to the configured provider
    /// @ai:effects network
    async fn judge(&self, prompt: &str, system: Option<&str>) -> Result<String, JudgeError> {
        self.rate_limiter.wait().await;

        let reply = match self.config.provider {
            JudgeProvider::Anthropic => self.ask_anthropic(prompt, system).await?,
            JudgeProvider::OpenAi => self.ask_openai(prompt, system).await?,
        };

        tracing::debug!("Judge {} replied: {}", self.config.model, reply);

        if reply.is_empty() {
            return Err(JudgeError::EmptyReply);
        }
        Ok(reply)
    }
}

/// @ai:intent Prompt pair seen by the mock judge
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPrompt {
    pub system: Option<String>,
    pub prompt: String,
}

/// @ai:intent Mock judge for testing and offline runs
pub struct MockJudge {
    reply: Option<String>,
    prompts: Mutex<Vec<RecordedPrompt>>,
}

impl MockJudge {
    /// @ai:intent Create a mock judge that returns a fixed reply
    /// @ai:effects pure
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Create a mock judge whose every call fails
    /// @ai:effects pure
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SemanticJudge for MockJudge {
    fn model(&self) -> &str {
        "mock"
    }

    /// @ai:intent Record the prompt and return the fixed reply
    /// @ai:effects state:write
    async fn judge(&self, prompt: &str, system: Option<&str>) -> Result<String, JudgeError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(RecordedPrompt {
                system: system.map(str::to_string),
                prompt: prompt.to_string(),
            });
        }

        self.reply.clone().ok_or(JudgeError::Api {
            status: 503,
            message: "mock judge unavailable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mock_judge_records_prompts() {
        let judge = MockJudge::new("TRUE");

        let reply = judge.judge("Answer 1: x", Some("physics")).await.unwrap();

        assert_eq!(reply, "TRUE");
        assert_eq!(
            judge.prompts(),
            vec![RecordedPrompt {
                system: Some("physics".to_string()),
                prompt: "Answer 1: x".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_failing_mock_judge() {
        let judge = MockJudge::failing();

        let err = judge.judge("anything", None).await.unwrap_err();

        assert!(matches!(err, JudgeError::Api { status: 503, .. }));
        assert_eq!(judge.call_count(), 1);
    }

    #[test]
    fn test_endpoints_follow_provider() {
        let anthropic = HttpJudge::with_api_key(JudgeConfig::default(), "key".to_string()).unwrap();
        assert_eq!(anthropic.endpoint(), "https://api.anthropic.com/v1/messages");

        let config = JudgeConfig {
            provider: JudgeProvider::OpenAi,
            base_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        let openai = HttpJudge::with_api_key(config, "key".to_string()).unwrap();
        assert_eq!(openai.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_missing_key_is_reported() {
        let config = JudgeConfig {
            api_key_env: Some("SCI_EQUIV_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..Default::default()
        };

        let err = HttpJudge::new(config).err().unwrap();
        assert!(matches!(err, JudgeError::MissingApiKey(name) if name == "SCI_EQUIV_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_openai_request_includes_system_message() {
        let request = ChatRequest {
            model: "gpt-4o",
            max_tokens: 16,
            temperature: 0.0,
            messages: vec![
                Message {
                    role: "system",
                    content: "be brief",
                },
                Message {
                    role: "user",
                    content: "2 m vs 200 cm",
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "2 m vs 200 cm");
    }

    #[test]
    fn test_anthropic_response_joins_text_blocks() {
        let body: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"TRUE"}],"stop_reason":"end_turn"}"#)
                .unwrap();

        let text: Vec<String> = body.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(text, vec!["TRUE".to_string()]);
    }
}
