// OpenAI chat-completions client.
//
// Works against any server that speaks the `/v1/chat/completions` format.

use crate::config::{OpenAiConfig, REQUEST_TIMEOUT_SECS};
use crate::{LlmError, LlmResult};
use async_trait::async_trait;
use jasper_core::{CompletionClient, CompletionRequest, CoreResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Creates a client with a 60 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::ClientBuild` if the TLS backend cannot be initialised.
    pub fn new(config: OpenAiConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(LlmError::ClientBuild)?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn to_chat_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    /// Sends one chat completion and returns the trimmed text of the first choice.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `LlmError::Request` for transport failures and timeouts,
    /// - `LlmError::Status` for non-success HTTP statuses (with the response body),
    /// - `LlmError::Decode` if the body is not a chat-completion response,
    /// - `LlmError::EmptyResponse` if there is no choice with text content.
    pub async fn chat(&self, request: &CompletionRequest) -> LlmResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let body = self.to_chat_request(request);

        tracing::debug!("sending chat completion to {} (model {})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await.map_err(LlmError::Decode)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> CoreResult<String> {
        Ok(self.chat(request).await?)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jasper_core::CoreError;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You are Jasper.".into(),
            user: "BLOG TOPIC: Knee pain".into(),
            temperature: 0.7,
            max_tokens: 3000,
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> OpenAiClient {
        let mut cfg = OpenAiConfig::new("sk-test");
        cfg.base_url = server.url();
        OpenAiClient::new(cfg).expect("client builds")
    }

    #[tokio::test]
    async fn test_chat_sends_messages_and_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4",
                "max_tokens": 3000,
                "messages": [
                    {"role": "system", "content": "You are Jasper."},
                    {"role": "user", "content": "BLOG TOPIC: Knee pain"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "  {\"title\": \"T\"}\n"}},
                        {"message": {"role": "assistant", "content": "ignored"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client_for(&server).chat(&request()).await.unwrap();

        assert_eq!(reply, "{\"title\": \"T\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let err = client_for(&server).chat(&request()).await.unwrap_err();

        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = client_for(&server).chat(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_completion_client_maps_errors_to_core() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = CompletionClient::complete(&client, &request())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Completion(_)));
        assert!(err.to_string().contains("boom"));
    }
}
