//! Process-wide initialization

use std::sync::Once;

static INIT: Once = Once::new();

/// Load variables from a `.env` file (current directory or any parent).
///
/// Safe to call multiple times; only the first call does any work. A custom
/// path (e.g. from `PIPEKIT_ENV_FILE`) takes precedence over discovery.
pub fn initialize_environment(env_file: Option<&std::path::Path>) {
    INIT.call_once(|| {
        let loaded = match env_file {
            Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
            None => dotenvy::dotenv(),
        };

        match loaded {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load environment file: {e}"),
        }
    });
}
