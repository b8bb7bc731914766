//! Logging setup using the `tracing` crate.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Initialize structured logging for the hosting process.
///
/// `RUST_LOG` takes precedence when set; otherwise the level defaults to
/// `debug` (verbose) or `info`. Fails if a global subscriber is already
/// installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_init_fails() {
        let _ = init_logging(false);
        // A second install must report the conflict instead of panicking.
        assert!(matches!(init_logging(true), Err(Error::Config(_))));
    }
}
