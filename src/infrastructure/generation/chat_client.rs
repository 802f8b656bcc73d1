//! Chat-completions client producing the grounded answer.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::application::services::GenerationEngine;
use crate::domain::DomainError;

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
    content: String,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    url: String,
    model: String,
    agent: ureq::Agent,
}

impl ChatCompletionsClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            url: format!("{base_url}/v1/chat/completions"),
            model: model.into(),
            agent,
        }
    }
}

impl GenerationEngine for ChatCompletionsClient {
    fn generate(&self, question: &str, context: &str) -> Result<String, DomainError> {
        let payload = json!({
            "model": &self.model,
            "messages": [
                { "role": "system", "content": system_message() },
                { "role": "user", "content": user_message(question, context) },
            ],
        });

        let response = self
            .agent
            .post(&self.url)
            .send_json(payload)
            .map_err(|err| DomainError::generation(format!("generation request failed: {err}")))?;

        let parsed: ChatResponse = response.into_json().map_err(|err| {
            DomainError::generation(format!("malformed generation response: {err}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DomainError::generation("generation response contained no choices"))
    }
}

/// The model resolves relative-time phrasing itself, so the system message
/// anchors it to the current UTC instant.
fn system_message() -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    format!(
        "You are a helpful assistant. Current date and time (UTC): {now}. \
         Use this to calculate relative time ranges like 'last day', 'last week', etc."
    )
}

fn user_message(question: &str, context: &str) -> String {
    format!("Context: {context}\n\nQuery: {question}")
}
