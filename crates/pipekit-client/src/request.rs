//! HTTP request layer of the pipe API
//!
//! Every request carries JSON content type, the bearer API key and the
//! `LB-LLM-Key` provider key header; headers given by the caller win. Failures
//! are split into transport errors ([`ClientError::Connection`]) and API
//! answers with a non-2xx status ([`ClientError::Api`]).

use crate::error::{ApiError, ClientError, ClientResult};
use crate::stream::decode_events;
use crate::types::{ChunkStream, RawResponse};
use futures::Stream;
use pipekit_config::{ClientConfig, LogCategory, LoggingConfig};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info};

/// Header carrying the model provider key
pub const LLM_KEY_HEADER: &str = "lb-llm-key";

/// Header carrying the id of the thread a run was stored in
pub const THREAD_ID_HEADER: &str = "lb-thread-id";

/// Connection settings for [`Request`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub llm_key: Option<String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            timeout: None,
            llm_key: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_llm_key(mut self, llm_key: impl Into<String>) -> Self {
        self.llm_key = Some(llm_key.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&ClientConfig> for RequestConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout: (config.timeout_seconds > 0)
                .then(|| Duration::from_secs(config.timeout_seconds)),
            llm_key: config.llm_key.clone(),
        }
    }
}

/// What to send
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    /// Attach the response headers to the result
    pub raw_response: bool,
}

impl RequestOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn with_raw_response(mut self, raw_response: bool) -> Self {
        self.raw_response = raw_response;
        self
    }
}

/// A decoded JSON answer
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    /// Body, with a `raw` object flattened next to `completion`
    pub body: Value,
    pub thread_id: Option<String>,
    pub raw_response: Option<RawResponse>,
}

/// Boxed stream of decoded chunks
pub type ChunkStreamBox = Pin<Box<dyn Stream<Item = ClientResult<ChunkStream>> + Send>>;

/// A streaming answer
pub struct StreamResponse {
    pub stream: ChunkStreamBox,
    pub thread_id: Option<String>,
    pub raw_response: Option<RawResponse>,
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("thread_id", &self.thread_id)
            .field("raw_response", &self.raw_response)
            .finish_non_exhaustive()
    }
}

/// JSON-over-HTTP transport for the pipe API
#[derive(Debug, Clone)]
pub struct Request {
    config: RequestConfig,
    http: reqwest::Client,
    logging: LoggingConfig,
}

impl Request {
    /// # Errors
    /// Returns `ClientError::InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: RequestConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            logging: LoggingConfig::default(),
        })
    }

    /// Use `logging` to decide which request events get logged
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    pub const fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// # Errors
    /// Returns connection, API or decode errors
    pub async fn post(&self, options: RequestOptions) -> ClientResult<JsonResponse> {
        self.send_json(Method::POST, options).await
    }

    /// # Errors
    /// Returns connection, API or decode errors
    pub async fn get(&self, options: RequestOptions) -> ClientResult<JsonResponse> {
        self.send_json(Method::GET, options).await
    }

    /// # Errors
    /// Returns connection, API or decode errors
    pub async fn put(&self, options: RequestOptions) -> ClientResult<JsonResponse> {
        self.send_json(Method::PUT, options).await
    }

    /// # Errors
    /// Returns connection, API or decode errors
    pub async fn delete(&self, options: RequestOptions) -> ClientResult<JsonResponse> {
        self.send_json(Method::DELETE, options).await
    }

    /// POST and decode the answer as a stream of server-sent events
    ///
    /// # Errors
    /// Returns connection or API errors; decode errors surface per item
    pub async fn post_stream(&self, options: RequestOptions) -> ClientResult<StreamResponse> {
        let raw_requested = options.raw_response;
        let response = self.send(Method::POST, options).await?;

        let thread_id = thread_id(&response);
        let raw_response = raw_requested.then(|| RawResponse {
            headers: header_map(response.headers()),
        });
        let stream = decode_events::<_, _, _, ChunkStream>(Box::pin(response.bytes_stream()));

        Ok(StreamResponse {
            stream: Box::pin(stream),
            thread_id,
            raw_response,
        })
    }

    async fn send_json(&self, method: Method, options: RequestOptions) -> ClientResult<JsonResponse> {
        let raw_requested = options.raw_response;
        let response = self.send(method, options).await?;

        let thread_id = thread_id(&response);
        let raw_response = raw_requested.then(|| RawResponse {
            headers: header_map(response.headers()),
        });
        let body: Value = response.json().await?;

        if self.logging.should_log(LogCategory::PipeResponse) {
            if self.logging.log_sensitive_data {
                debug!(target = "request", event = "response_body", body = %body);
            }
            debug!(
                target = "request",
                event = "api_response",
                thread_id = thread_id.as_deref().unwrap_or_default()
            );
        }

        Ok(JsonResponse {
            body: flatten_raw(body),
            thread_id,
            raw_response,
        })
    }

    async fn send(&self, method: Method, options: RequestOptions) -> ClientResult<Response> {
        let url = self.build_url(&options.endpoint);
        let headers = self.build_headers(&options.headers)?;

        if self.logging.should_log(LogCategory::PipeRequest) {
            info!(
                target = "request",
                event = "outgoing_request",
                method = %method,
                endpoint = %options.endpoint
            );
            if self.logging.log_sensitive_data {
                if let Some(body) = &options.body {
                    debug!(target = "request", event = "request_body", body = %body);
                }
            }
        }

        let mut builder = self.http.request(method, &url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(
                target = "request",
                event = "connection_error",
                endpoint = %options.endpoint,
                error = %e
            );
            ClientError::connection(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn build_headers(&self, extra: &HashMap<String, String>) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &self.config.api_key {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
        }
        headers.insert(
            HeaderName::from_static(LLM_KEY_HEADER),
            header_value(self.config.llm_key.as_deref().unwrap_or_default())?,
        );

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidRequest(format!("header name {name}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::InvalidRequest(format!("header value: {e}")))
}

fn thread_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(THREAD_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let headers = header_map(response.headers());
    let text = response.text().await.unwrap_or_default();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    let api_error = ApiError::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        headers,
        body,
    );
    error!(
        target = "request",
        event = "api_error",
        status = api_error.status,
        error = %api_error
    );
    ClientError::Api(api_error)
}

/// Lift the fields of a `raw` provider object next to `completion`
fn flatten_raw(body: Value) -> Value {
    let Value::Object(mut map) = body else {
        return body;
    };
    let Some(Value::Object(raw)) = map.remove("raw") else {
        return Value::Object(map);
    };

    let mut flattened = serde_json::Map::new();
    if let Some(completion) = map.remove("completion") {
        flattened.insert("completion".to_string(), completion);
    }
    flattened.extend(raw);
    Value::Object(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_raw_lifts_provider_fields() {
        let body = json!({
            "completion": "Hi",
            "raw": {"id": "run-1", "model": "gpt-4o", "choices": []}
        });
        assert_eq!(
            flatten_raw(body),
            json!({"completion": "Hi", "id": "run-1", "model": "gpt-4o", "choices": []})
        );
    }

    #[test]
    fn test_flatten_without_raw_is_identity() {
        let body = json!({"completion": "Hi", "other": 1});
        assert_eq!(flatten_raw(body.clone()), body);
        assert_eq!(flatten_raw(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_request_config_from_client_config() {
        let client = ClientConfig {
            base_url: "https://api.example.com".to_string(),
            api_key: Some("key".to_string()),
            llm_key: None,
            timeout_seconds: 0,
        };
        let config = RequestConfig::from(&client);
        assert_eq!(config.timeout, None);
        assert_eq!(config.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_headers_include_keys_and_caller_overrides() {
        let request = Request::new(
            RequestConfig::new("http://localhost")
                .with_api_key("secret")
                .with_llm_key("provider"),
        )
        .expect("client");

        let mut extra = HashMap::new();
        extra.insert("Content-Type".to_string(), "text/plain".to_string());
        let headers = request.build_headers(&extra).expect("headers");

        assert_eq!(headers.get(AUTHORIZATION).map(|v| v.as_bytes()), Some(&b"Bearer secret"[..]));
        assert_eq!(headers.get(LLM_KEY_HEADER).map(|v| v.as_bytes()), Some(&b"provider"[..]));
        assert_eq!(headers.get(CONTENT_TYPE).map(|v| v.as_bytes()), Some(&b"text/plain"[..]));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let request = Request::new(RequestConfig::new("http://localhost:9000/")).expect("client");
        assert_eq!(request.build_url("/beta/generate"), "http://localhost:9000/beta/generate");
    }
}
