//! Tracing setup for binaries and tests embedding the runtime.

use crate::CoreError;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this again after a
/// subscriber is installed is a no-op.
pub fn init_tracing(default_filter: &str) -> Result<(), CoreError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            CoreError::ConfigurationError(format!("invalid log filter '{}': {}", default_filter, e))
        })?,
    };

    if fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_tracing("info").is_ok());
        assert!(init_tracing("debug").is_ok());
    }
}
