use super::AnalysisClient;
use super::prompts::build_analysis_prompt;
use crate::config::AiConfig;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the Anthropic Messages API
pub struct AnthropicClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    anthropic_version: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(config: &AiConfig, api_key: String) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("promptvault/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            anthropic_version: config.anthropic_version.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::ServiceTimeout(self.timeout_secs)
        } else {
            AppError::ServiceUnavailable(format!("Request failed: {}", err))
        }
    }
}

/// Concatenated text blocks of a Messages API reply
fn response_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => format!("API error ({}): {}", status, api_error.error.message),
        Err(_) => format!("API error ({}): {}", status, body.trim()),
    }
}

#[async_trait]
impl AnalysisClient for AnthropicClient {
    async fn analyze(&self, content: &str) -> AppResult<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: build_analysis_prompt(content),
            }],
        };

        debug!(model = %self.model, url = %self.api_url, "Requesting prompt analysis");

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ServiceUnavailable(error_message(status, &body)));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("Failed to parse analysis response: {}", e))
        })?;

        Ok(response_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": " {\"title\": "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "\"Coach\"} "}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response_text(response), r#"{"title": "Coach"}"#);
    }

    #[test]
    fn test_error_message() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        assert_eq!(
            error_message(status, r#"{"error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#),
            "API error (401 Unauthorized): invalid x-api-key"
        );
        assert_eq!(
            error_message(status, "gateway down"),
            "API error (401 Unauthorized): gateway down"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "claude-3-5-sonnet-20241022",
            max_tokens: 1000,
            messages: vec![Message {
                role: "user",
                content: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn test_client_builds_from_config() {
        let client = AnthropicClient::new(&AiConfig::default(), "key".to_string()).unwrap();
        assert_eq!(client.timeout_secs, 30);
        assert_eq!(client.model, AiConfig::default().model);
    }
}
