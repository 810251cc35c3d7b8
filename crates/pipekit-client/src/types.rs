//! Response payloads of the pipe API

use pipekit_thread::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Transport details attached when the caller asks for the raw response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    pub headers: HashMap<String, String>,
}

/// Token accounting of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Assistant message of a completed run; content is absent for tool calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceGenerate {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub logprobs: Option<Value>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Result of a non-streaming run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunResponse {
    pub completion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChoiceGenerate>,
    pub usage: Usage,
    pub system_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<RawResponse>,
}

/// Incremental part of a streamed message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delta {
    pub role: Option<Role>,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceStream {
    pub index: u32,
    pub delta: Delta,
    pub logprobs: Option<Value>,
    pub finish_reason: Option<String>,
}

/// One server-sent event of a streaming run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkStream {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChoiceStream>,
}

/// Text carried by the first choice of a streamed chunk, or `""`
pub fn get_text_delta(chunk: &ChunkStream) -> &str {
    chunk
        .choices
        .first()
        .and_then(|choice| choice.delta.content.as_deref())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_delta_from_first_choice() {
        let chunk: ChunkStream = serde_json::from_value(json!({
            "id": "c1",
            "choices": [
                {"index": 0, "delta": {"content": "Hel"}},
                {"index": 1, "delta": {"content": "ignored"}}
            ]
        }))
        .expect("chunk");
        assert_eq!(get_text_delta(&chunk), "Hel");
    }

    #[test]
    fn test_text_delta_empty_without_content() {
        let chunk: ChunkStream = serde_json::from_value(json!({
            "choices": [{"index": 0, "delta": {"role": "assistant"}, "finish_reason": "stop"}]
        }))
        .expect("chunk");
        assert_eq!(get_text_delta(&chunk), "");
        assert_eq!(get_text_delta(&ChunkStream::default()), "");
    }

    #[test]
    fn test_run_response_tolerates_null_content() {
        let response: RunResponse = serde_json::from_value(json!({
            "completion": "",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null, "tool_calls": []},
                "finish_reason": "tool_calls"
            }],
            "system_fingerprint": null
        }))
        .expect("response");
        assert_eq!(response.choices[0].message.content, None);
    }
}
