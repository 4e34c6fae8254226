//! OpenAI-compatible chat-completions client for convention refinement.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmSettings;
use crate::git::TagRecord;
use crate::history::branches::{is_base_branch, logical_branch_name};
use crate::history::ConventionSet;
use crate::llm::{error::LlmError, prompts};

/// HTTP request timeout for the refinement call.
///
/// One request per run; on timeout the run proceeds without refinement.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat request message.
#[derive(Serialize, Debug)]
struct Message {
    role: String,
    content: String,
}

/// Requested response format.
#[derive(Serialize, Debug)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat-completions request body.
#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    response_format: ResponseFormat,
}

/// Chat-completions response message.
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

/// Chat-completions response choice.
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// Chat-completions response body.
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// Convention refiner backed by an OpenAI-compatible endpoint.
pub struct ConventionRefiner {
    /// HTTP client with the fixed request timeout.
    client: Client,
    /// Bearer token for the endpoint.
    api_key: String,
    /// Model identifier.
    model: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    base_url: String,
}

impl ConventionRefiner {
    /// Creates a refiner from resolved LLM settings.
    ///
    /// Fails with [`LlmError::ApiKeyNotFound`] when no API key can be
    /// resolved; callers treat that as "refiner unavailable" and proceed
    /// with rule-based results.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings.resolved_api_key().ok_or(LlmError::ApiKeyNotFound)?;
        Self::new(settings.model.clone(), api_key, settings.resolved_base_url())
    }

    /// Creates a refiner with explicit parameters.
    pub fn new(model: String, api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    /// Full chat-completions endpoint URL.
    fn endpoint_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Requests a refined convention set for the given history sample.
    ///
    /// Any transport, HTTP, parse or shape failure is caught here and
    /// reported as an empty set — a failed refinement means "feature
    /// unavailable this run", never an error, and is not retried.
    pub async fn refine(
        &self,
        subjects: &[String],
        branches: &[String],
        tags: &[TagRecord],
    ) -> ConventionSet {
        let branch_samples: Vec<String> = branches
            .iter()
            .filter(|branch| !branch.starts_with("HEAD"))
            .map(|branch| logical_branch_name(branch).to_string())
            .filter(|name| !is_base_branch(name))
            .collect();
        let tag_names: Vec<String> = tags.iter().map(|tag| tag.name.clone()).collect();

        match self
            .request_conventions(subjects, &branch_samples, &tag_names)
            .await
        {
            Ok(set) => set,
            Err(err) => {
                debug!(
                    error = %err,
                    "Convention refinement unavailable; keeping rule-based results"
                );
                ConventionSet::default()
            }
        }
    }

    /// Performs the chat-completions request and parses the convention set
    /// out of the response message content.
    async fn request_conventions(
        &self,
        subjects: &[String],
        branches: &[String],
        tag_names: &[String],
    ) -> Result<ConventionSet> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompts::build_user_prompt(subjects, branches, tag_names),
                },
            ],
            temperature: 0.3,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let url = self.endpoint_url();
        debug!(url = %url, model = %self.model, "Sending convention refinement request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiRequestFailed(format!("HTTP {status}: {error_text}")).into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponseFormat(e.to_string()))?;

        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                LlmError::InvalidResponseFormat("No choices in response".to_string())
            })?;

        let set: ConventionSet = serde_json::from_str(content).map_err(|e| {
            LlmError::InvalidResponseFormat(format!(
                "Message content is not the expected JSON object: {e}"
            ))
        })?;

        debug!(empty = set.is_empty(), "Received convention refinement");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refiner(base_url: &str) -> ConventionRefiner {
        ConventionRefiner::new(
            "test-model".to_string(),
            "sk-test".to_string(),
            base_url.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_url_appends_chat_completions() {
        let client = refiner("https://api.openai.com/v1");
        assert_eq!(
            client.endpoint_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let client = refiner("http://localhost:8080/v1/");
        assert_eq!(client.endpoint_url(), "http://localhost:8080/v1/chat/completions");
    }
}
