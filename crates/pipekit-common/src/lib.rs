//! Common utilities shared across pipekit crates
//!
//! Error building blocks, error sanitization for contract boundaries,
//! correlation ids, logging setup and environment loading.

pub mod correlation;
pub mod error;
pub mod error_sanitizer;
pub mod init;
pub mod logging;

pub use correlation::CorrelationId;
pub use error::CommonError;
pub use error_sanitizer::{SanitizedError, sanitize_error, sanitize_with_message};
pub use init::initialize_environment;
pub use logging::{LogOptions, LoggingError, LoggingGuard, init_logging};
