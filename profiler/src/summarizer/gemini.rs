//! Google Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Summarizer, FALLBACK_SUMMARY};
use crate::config::SummarizerConfig;
use crate::error::{ProfilerError, ProfilerResult, Service};

/// Google Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    config: SummarizerConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(config: SummarizerConfig) -> ProfilerResult<Self> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            ProfilerError::configuration(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> ProfilerResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProfilerError::configuration("Missing summarizer API key"))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// First candidate's first text part, if it holds any text
fn first_text(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> ProfilerResult<String> {
        let api_key = self.api_key()?;

        let body = GeminiRequest {
            contents: vec![GeminiMessage {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProfilerError::upstream(Service::Summarizer, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error {}: {}", status, error_text);
            return Err(ProfilerError::upstream(
                Service::Summarizer,
                format!("Gemini API returned {}", status),
            ));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProfilerError::upstream(Service::Summarizer, e.to_string()))?;

        match first_text(gemini_resp) {
            Some(text) => Ok(text),
            None => {
                tracing::warn!("Gemini response carried no text, using fallback");
                Ok(FALLBACK_SUMMARY.to_string())
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn ensure_credentials(&self) -> ProfilerResult<()> {
        self.api_key().map(|_| ())
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiMessage>,
}

#[derive(Debug, Serialize)]
struct GeminiMessage {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const PATH: &str = "/models/gemini-test:generateContent";

    fn client_for(server: &Server, api_key: Option<&str>) -> GeminiClient {
        let mut config = SummarizerConfig::new(server.url(), "gemini-test");
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        GeminiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_first_candidate_first_part() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "key-123")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [{ "text": "describe octocat" }] }]
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "candidates": [
                        {
                            "content": {
                                "parts": [{ "text": "first" }, { "text": "second" }],
                                "role": "model"
                            }
                        },
                        { "content": { "parts": [{ "text": "other candidate" }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("key-123"));
        let summary = client.summarize("describe octocat").await.unwrap();

        mock.assert_async().await;
        assert_eq!(summary, "first");
    }

    #[tokio::test]
    async fn test_missing_text_falls_back() {
        let bodies = [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ];

        for body in bodies {
            let mut server = Server::new_async().await;
            server
                .mock("POST", PATH)
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;

            let client = client_for(&server, Some("k"));
            let summary = client.summarize("p").await.unwrap();
            assert_eq!(summary, FALLBACK_SUMMARY, "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(r#"{"error":{"message":"Resource has been exhausted"}}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("k"));
        let err = client.summarize("p").await.unwrap_err();
        assert!(matches!(
            err,
            ProfilerError::Upstream {
                service: Service::Summarizer,
                ..
            }
        ));
        assert!(!err.public_message().contains("exhausted"));
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        assert!(!client.has_api_key());
        assert!(matches!(
            client.ensure_credentials(),
            Err(ProfilerError::Configuration(_))
        ));
        let err = client.summarize("p").await.unwrap_err();
        assert!(matches!(err, ProfilerError::Configuration(_)));
        mock.assert_async().await;

        assert!(client_for(&server, Some("k")).ensure_credentials().is_ok());
    }

    #[test]
    fn test_endpoint_format() {
        let config = SummarizerConfig::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.0-flash",
        );
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            concat!(
                "https://generativelanguage.googleapis.com/v1beta",
                "/models/gemini-2.0-flash:generateContent"
            )
        );
        assert_eq!(client.model(), "gemini-2.0-flash");
    }
}
