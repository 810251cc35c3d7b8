//! Server-sent event decoding
//!
//! The streaming endpoints answer with `data: <json>` events and finish with
//! `data: [DONE]`. Framing is handled by `eventsource-stream`; this module only
//! turns event payloads into typed chunks.

use crate::error::{ClientError, ClientResult};
use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::fmt::Display;

/// Payload that ends a streamed run
pub const DONE_MARKER: &str = "[DONE]";

fn decode_payload<T: DeserializeOwned>(payload: &str) -> ClientResult<T> {
    serde_json::from_str(payload).map_err(|e| {
        tracing::warn!(
            target = "stream",
            event = "decode_error",
            error = %e,
            "Failed to decode streamed chunk"
        );
        ClientError::Decode(format!("stream chunk: {e}"))
    })
}

/// Decode a byte stream of server-sent events into JSON payloads
///
/// The stream ends at `[DONE]` or when the bytes run out. A payload that is
/// not valid JSON yields a `ClientError::Decode` item and decoding continues;
/// a transport failure is yielded once and ends the stream.
pub fn decode_events<S, B, E, T>(bytes: S) -> impl Stream<Item = ClientResult<T>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + Unpin,
    B: AsRef<[u8]> + Send,
    E: Into<ClientError> + Display + Send,
    T: DeserializeOwned + Send,
{
    stream::unfold(Some(bytes.eventsource()), |state| async move {
        let mut events = state?;
        loop {
            match events.next().await? {
                Ok(event) => {
                    let payload = event.data.trim();
                    if payload == DONE_MARKER {
                        return None;
                    }
                    if payload.is_empty() {
                        continue;
                    }
                    let item = decode_payload(payload);
                    return Some((item, Some(events)));
                }
                Err(EventStreamError::Transport(e)) => return Some((Err(e.into()), None)),
                Err(e) => {
                    let item = Err(ClientError::Decode(format!("event stream: {e}")));
                    return Some((item, Some(events)));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn decode(parts: Vec<&'static str>) -> Vec<ClientResult<Value>> {
        let bytes = stream::iter(parts.into_iter().map(Ok::<_, ClientError>));
        decode_events(bytes).collect().await
    }

    #[tokio::test]
    async fn test_events_split_across_reads() {
        let items = decode(vec!["data: {\"a\"", ":1}\n\ndata: {\"b\":2}\n", "\ndata: [DONE]\n\n"]).await;

        let values: Vec<Value> = items.into_iter().map(|item| item.expect("value")).collect();
        assert_eq!(values, vec![serde_json::json!({"a": 1}), serde_json::json!({"b": 2})]);
    }

    #[tokio::test]
    async fn test_multiline_data_is_one_event() {
        let items = decode(vec!["data: {\"a\":\ndata: 1}\n\n"]).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().expect("value"), &serde_json::json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_done_ends_stream() {
        let items = decode(vec!["data: 1\n\ndata: [DONE]\n\ndata: 2\n\n"]).await;
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_comments_and_fields_ignored() {
        let items = decode(vec![": keep-alive\r\nevent: message\r\nid: 7\r\ndata:{}\r\n\r\n"]).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().expect("value"), &serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_bad_payload_does_not_end_stream() {
        let items = decode(vec!["data: not json\n\ndata: true\n\n"]).await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(ClientError::Decode(_))));
        assert_eq!(items[1].as_ref().expect("value"), &Value::Bool(true));
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let bytes = stream::iter(vec![
            Ok("data: 1\n\n"),
            Err(ClientError::connection("reset")),
            Ok("data: 2\n\n"),
        ]);
        let items: Vec<ClientResult<Value>> = decode_events(bytes).collect().await;

        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(ClientError::Connection { .. })));
    }
}
