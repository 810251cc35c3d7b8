//! Pipekit client crate
//!
//! Async client for the pipe API: a JSON request layer with a structured error
//! taxonomy, pipe runs (`generate_text`, `stream_text`) and server-sent event
//! decoding of streamed answers.

pub mod error;
pub mod pipes;
pub mod request;
pub mod stream;
pub mod types;

pub use error::{ApiError, ApiErrorKind, ClientError, ClientResult};
pub use pipes::{CHAT_ENDPOINT, GENERATE_ENDPOINT, GenerateOptions, PipeClient};
pub use request::{
    ChunkStreamBox, JsonResponse, LLM_KEY_HEADER, Request, RequestConfig, RequestOptions,
    StreamResponse, THREAD_ID_HEADER,
};
pub use stream::{DONE_MARKER, decode_events};
pub use types::{
    ChoiceGenerate, ChoiceStream, ChunkStream, Delta, RawResponse, ResponseMessage, RunResponse,
    Usage, get_text_delta,
};
