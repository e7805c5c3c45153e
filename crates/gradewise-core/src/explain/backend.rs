//! Chat-completion backends for the explanation service.

use std::time::Duration;

use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::{ExplainError, ExplainResult};

/// A service that answers a system + user prompt with free text.
pub trait ChatBackend: Send + Sync {
    /// Backend name, for logs and errors.
    fn name(&self) -> &str;

    /// Send one chat exchange and return the assistant's reply.
    fn chat(&self, system: &str, user: &str) -> ExplainResult<String>;
}

impl<T: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn chat(&self, system: &str, user: &str) -> ExplainResult<String> {
        (**self).chat(system, user)
    }
}

impl<T: ChatBackend + ?Sized> ChatBackend for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn chat(&self, system: &str, user: &str) -> ExplainResult<String> {
        (**self).chat(system, user)
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    name: String,
    url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    agent: ureq::Agent,
}

impl ChatCompletionsClient {
    /// Build a client from one configured backend.
    ///
    /// The API key is read from the environment variable the backend names,
    /// once, at construction. A missing variable means no `Authorization`
    /// header is sent.
    pub fn from_config(config: &BackendConfig, temperature: f64) -> Self {
        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self {
            name: config.name.clone(),
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            temperature,
            agent,
        }
    }

    /// The full completions URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, system: &str, user: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "top_p": 1,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        })
    }

    fn transport(&self, message: impl ToString) -> ExplainError {
        ExplainError::Transport {
            backend: self.name.clone(),
            message: message.to_string(),
        }
    }

    fn reply_from(&self, body: &str) -> ExplainResult<String> {
        let completion: Completion =
            serde_json::from_str(body).map_err(|e| self.transport(e))?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ExplainError::EmptyCompletion(self.name.clone()))
    }
}

impl ChatBackend for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip_all, fields(backend = %self.name, model = %self.model))]
    fn chat(&self, system: &str, user: &str) -> ExplainResult<String> {
        let payload = self.request_body(system, user).to_string();
        let mut request = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let mut response = request.send(payload.as_str()).map_err(|e| match e {
            ureq::Error::StatusCode(status) => ExplainError::Status {
                backend: self.name.clone(),
                status,
            },
            other => self.transport(other),
        })?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.transport(e))?;
        tracing::debug!(bytes = body.len(), "completion received");

        self.reply_from(&body)
    }
}

/// Tries each backend in order and returns the first reply.
#[derive(Default)]
pub struct BackendRouter {
    backends: Vec<Box<dyn ChatBackend>>,
}

impl BackendRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router over every configured backend, in order.
    pub fn from_configs(configs: &[BackendConfig], temperature: f64) -> Self {
        let mut router = Self::new();
        for config in configs {
            router.push(ChatCompletionsClient::from_config(config, temperature));
        }
        router
    }

    /// Append a backend to try after the existing ones.
    pub fn push(&mut self, backend: impl ChatBackend + 'static) {
        self.backends.push(Box::new(backend));
    }

    /// Number of backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Returns `true` if no backend is configured.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("BackendRouter")
            .field("backends", &names)
            .finish()
    }
}

impl ChatBackend for BackendRouter {
    fn name(&self) -> &str {
        "router"
    }

    fn chat(&self, system: &str, user: &str) -> ExplainResult<String> {
        let mut last_error = ExplainError::NoBackend;
        for backend in &self.backends {
            match backend.chat(system, user) {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    tracing::warn!(backend = backend.name(), error = %e, "explanation backend failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
