//! Shared error building blocks
//!
//! Crates that load files or parse payloads (pipe definitions, memory records)
//! share the same handful of failure shapes. This module gives them one trait
//! and two macros so each crate keeps its own error enum without re-typing the
//! common variants.

/// Constructors for the variants every pipekit error enum carries
pub trait CommonError: std::error::Error + Send + Sync + 'static {
    /// Create an I/O error variant
    fn io_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a configuration error variant
    fn config_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a parsing error variant
    fn parse_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Create a generic "other" error variant
    fn other_error(msg: impl Into<String>) -> Self
    where
        Self: Sized;
}

/// Implement `From` conversions for std/anyhow (and optionally `serde_json`)
/// errors in terms of [`CommonError`].
///
/// ```no_run
/// # use pipekit_common::{define_error_enum, impl_common_conversions};
/// define_error_enum! {
///     pub enum LoadError {
///         #[error("Missing: {0}")]
///         Missing(String),
///     }
/// }
///
/// impl_common_conversions!(LoadError, with_serde);
/// ```
#[macro_export]
macro_rules! impl_common_conversions {
    ($error_type:ident) => {
        impl From<std::io::Error> for $error_type {
            fn from(e: std::io::Error) -> Self {
                <$error_type as $crate::CommonError>::io_error(e.to_string())
            }
        }

        impl From<anyhow::Error> for $error_type {
            fn from(e: anyhow::Error) -> Self {
                <$error_type as $crate::CommonError>::other_error(e.to_string())
            }
        }
    };

    ($error_type:ident, with_serde) => {
        $crate::impl_common_conversions!($error_type);

        impl From<serde_json::Error> for $error_type {
            fn from(e: serde_json::Error) -> Self {
                <$error_type as $crate::CommonError>::parse_error(format!("JSON: {e}"))
            }
        }
    };
}

/// Define an error enum carrying the common `Io`, `Configuration`, `Parse`
/// and `Other` variants plus any crate-specific ones, implement
/// [`CommonError`] for it and emit a matching `Result<T>` alias.
#[macro_export]
macro_rules! define_error_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($variant_type:ty),
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, thiserror::Error)]
        pub enum $name {
            #[error("IO error: {0}")]
            Io(String),

            #[error("Configuration error: {0}")]
            Configuration(String),

            #[error("Parse error: {0}")]
            Parse(String),

            #[error("Other error: {0}")]
            Other(String),

            $(
                $(#[$variant_meta])*
                $variant($variant_type),
            )*
        }

        impl $crate::CommonError for $name {
            fn io_error(msg: impl Into<String>) -> Self {
                Self::Io(msg.into())
            }

            fn config_error(msg: impl Into<String>) -> Self {
                Self::Configuration(msg.into())
            }

            fn parse_error(msg: impl Into<String>) -> Self {
                Self::Parse(msg.into())
            }

            fn other_error(msg: impl Into<String>) -> Self {
                Self::Other(msg.into())
            }
        }

        /// Specialized Result type
        pub type Result<T> = std::result::Result<T, $name>;
    };
}
