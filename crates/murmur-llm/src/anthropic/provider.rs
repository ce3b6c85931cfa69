//! The generator implementation over the Messages API.

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, warn};

use crate::MAX_HISTORY_MESSAGES;
use crate::anthropic::types::{
    ANTHROPIC_VERSION, AnthropicConfig, MessagesRequest, MessagesResponse,
};
use crate::types::{ChatMessage, GeneratorError, ResponseGenerator};

/// Cap on how much of a provider error body is kept in the error message.
const MAX_ERROR_BODY: usize = 512;

/// Anthropic Messages API generator.
pub struct AnthropicGenerator {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicGenerator {
    /// Build a generator with its own HTTP client.
    pub fn new(config: AnthropicConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// Assemble the upstream message list: the history tail capped to
    /// [`MAX_HISTORY_MESSAGES`], then the current input as the final user
    /// turn.
    fn build_messages(&self, input: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let tail_start = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
        let mut messages: Vec<ChatMessage> = history[tail_start..].to_vec();
        messages.push(ChatMessage::user(input));
        messages
    }
}

#[async_trait]
impl ResponseGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        input: &str,
        history: &[ChatMessage],
    ) -> Result<String, GeneratorError> {
        let messages = self.build_messages(input, history);
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &self.config.system_prompt,
            messages,
        };

        counter!("generator_requests_total").increment(1);
        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut message, MAX_ERROR_BODY);
            warn!(status = status.as_u16(), "provider returned error");
            counter!("generator_errors_total").increment(1);
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        let text = parsed
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text.clone())
            .ok_or_else(|| {
                GeneratorError::InvalidResponse("no text content block in response".into())
            })?;

        debug!(chars = text.len(), "generation complete");
        Ok(text)
    }
}

/// Truncate to at most `max` bytes without splitting a character.
fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> AnthropicConfig {
        AnthropicConfig {
            base_url,
            api_key: "test-key".into(),
            model: "claude-3-sonnet-20240229".into(),
            max_tokens: 300,
            system_prompt: "be brief".into(),
            request_timeout: std::time::Duration::from_secs(5),
        }
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn"
        }))
    }

    #[tokio::test]
    async fn generate_returns_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(text_response("hello back"))
            .mount(&server)
            .await;

        let generator = AnthropicGenerator::new(config(server.uri())).unwrap();
        let reply = generator.generate("hello", &[]).await.unwrap();
        assert_eq!(reply, "hello back");
    }

    #[tokio::test]
    async fn generate_sends_history_and_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "user", "content": "earlier"},
                    {"role": "assistant", "content": "reply"},
                    {"role": "user", "content": "now"}
                ]
            })))
            .respond_with(text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let generator = AnthropicGenerator::new(config(server.uri())).unwrap();
        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("reply")];
        let _ = generator.generate("now", &history).await.unwrap();
    }

    #[tokio::test]
    async fn generate_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let generator = AnthropicGenerator::new(config(server.uri())).unwrap();
        let err = generator.generate("hi", &[]).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Api { status: 529, .. }));
    }

    #[tokio::test]
    async fn generate_rejects_response_without_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": []})),
            )
            .mount(&server)
            .await;

        let generator = AnthropicGenerator::new(config(server.uri())).unwrap();
        let err = generator.generate("hi", &[]).await.unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidResponse(_)));
    }

    #[test]
    fn history_trimmed_to_tail() {
        let generator = AnthropicGenerator::new(config("http://unused".into())).unwrap();
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| ChatMessage::user(format!("m{i}")))
            .collect();
        let messages = generator.build_messages("current", &history);
        // MAX_HISTORY_MESSAGES from the tail, plus the current input
        assert_eq!(messages.len(), MAX_HISTORY_MESSAGES + 1);
        assert_eq!(messages[0].content, "m15");
        assert_eq!(messages.last().unwrap().content, "current");
    }

    #[test]
    fn error_body_truncation_respects_utf8() {
        let mut s = "é".repeat(300); // 600 bytes
        truncate_on_char_boundary(&mut s, MAX_ERROR_BODY);
        assert!(s.len() <= MAX_ERROR_BODY);
        assert!(s.chars().all(|c| c == 'é'));

        let mut short = String::from("fits");
        truncate_on_char_boundary(&mut short, MAX_ERROR_BODY);
        assert_eq!(short, "fits");
    }

    #[test]
    fn short_history_passes_through_whole() {
        let generator = AnthropicGenerator::new(config("http://unused".into())).unwrap();
        let history = vec![ChatMessage::user("a"), ChatMessage::assistant("b")];
        let messages = generator.build_messages("c", &history);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "a");
    }
}
