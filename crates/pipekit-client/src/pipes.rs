//! Pipe runs over the HTTP request layer

use crate::error::ClientResult;
use crate::request::{Request, RequestConfig, RequestOptions, StreamResponse};
use crate::types::RunResponse;
use pipekit_config::{ClientConfig, LogCategory, LoggingConfig};
use pipekit_thread::{Message, PipeVariable};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

pub const GENERATE_ENDPOINT: &str = "/beta/generate";
pub const CHAT_ENDPOINT: &str = "/beta/chat";

/// Parameters of a pipe run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<PipeVariable>,

    /// Continue an existing thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    /// Pipe to run when the API key is not bound to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Attach response headers to the result
    #[serde(skip)]
    pub raw_response: bool,

    /// Use the chat endpoint instead of generate
    #[serde(skip)]
    pub chat: bool,
}

impl GenerateOptions {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push(PipeVariable {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn chat(mut self, chat: bool) -> Self {
        self.chat = chat;
        self
    }

    #[must_use]
    pub const fn raw_response(mut self, raw_response: bool) -> Self {
        self.raw_response = raw_response;
        self
    }

    const fn endpoint(&self) -> &'static str {
        if self.chat {
            CHAT_ENDPOINT
        } else {
            GENERATE_ENDPOINT
        }
    }

    fn into_request(self, stream: bool) -> ClientResult<RequestOptions> {
        let endpoint = self.endpoint();
        let raw_response = self.raw_response;

        let mut body = serde_json::to_value(&self)?;
        if let Value::Object(map) = &mut body {
            map.insert("stream".to_string(), Value::Bool(stream));
        }

        Ok(RequestOptions::new(endpoint)
            .with_body(body)
            .with_raw_response(raw_response))
    }
}

/// Client for running pipes
#[derive(Debug, Clone)]
pub struct PipeClient {
    request: Request,
    logging: LoggingConfig,
}

impl PipeClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: RequestConfig) -> ClientResult<Self> {
        Ok(Self {
            request: Request::new(config)?,
            logging: LoggingConfig::default(),
        })
    }

    /// Build a client from application configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(client: &ClientConfig, logging: &LoggingConfig) -> ClientResult<Self> {
        let request = Request::new(RequestConfig::from(client))?.with_logging(logging.clone());
        Ok(Self {
            request,
            logging: logging.clone(),
        })
    }

    /// Run a pipe and wait for the complete answer
    ///
    /// # Errors
    /// Returns connection, API or decode errors
    pub async fn generate_text(&self, options: GenerateOptions) -> ClientResult<RunResponse> {
        self.log_run(&options, false);
        let response = self.request.post(options.into_request(false)?).await?;

        let mut run: RunResponse = serde_json::from_value(response.body)?;
        run.thread_id = response.thread_id;
        run.raw_response = response.raw_response;

        if self.logging.should_log(LogCategory::PipeCompletion) {
            info!(
                target = "pipe",
                event = "completion",
                model = %run.model,
                total_tokens = run.usage.total_tokens,
                thread_id = run.thread_id.as_deref().unwrap_or_default()
            );
            if self.logging.log_sensitive_data {
                debug!(target = "pipe", event = "completion_text", completion = %run.completion);
            }
        }
        Ok(run)
    }

    /// Run a pipe and stream the answer as it is produced
    ///
    /// # Errors
    /// Returns connection or API errors; decode errors surface per stream item
    pub async fn stream_text(&self, options: GenerateOptions) -> ClientResult<StreamResponse> {
        self.log_run(&options, true);
        self.request.post_stream(options.into_request(true)?).await
    }

    fn log_run(&self, options: &GenerateOptions, stream: bool) {
        if self.logging.should_log(LogCategory::Pipe) {
            info!(
                target = "pipe",
                event = "run",
                endpoint = options.endpoint(),
                stream,
                messages = options.messages.len(),
                pipe = options.name.as_deref().unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_uses_camel_case_and_stream_flag() {
        let options = GenerateOptions::new(vec![Message::user("hi")])
            .with_variable("name", "Ada")
            .with_thread_id("t-1")
            .raw_response(true);

        let request = options.into_request(false).expect("request");
        assert_eq!(request.endpoint, GENERATE_ENDPOINT);
        assert!(request.raw_response);
        assert_eq!(
            request.body,
            Some(json!({
                "messages": [{"role": "user", "content": "hi"}],
                "variables": [{"name": "name", "value": "Ada"}],
                "threadId": "t-1",
                "stream": false
            }))
        );
    }

    #[test]
    fn test_chat_selects_chat_endpoint() {
        let request = GenerateOptions::default()
            .chat(true)
            .into_request(true)
            .expect("request");
        assert_eq!(request.endpoint, CHAT_ENDPOINT);
        assert_eq!(request.body, Some(json!({"stream": true})));
    }
}
