//! Logger bootstrap for the `salon` binary.
//!
//! Library crates log through the `log` facade only; the binary owns the
//! backend. Output goes to stderr so `--output json` stays machine-readable.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Start the stderr logger.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the `info`
/// default. The returned handle must be kept alive for the process lifetime.
pub(crate) fn init(verbose: bool) -> Result<LoggerHandle> {
    let logger = if verbose {
        Logger::try_with_str("debug")
    } else {
        Logger::try_with_env_or_str("info")
    }
    .context("Invalid log specification")?;

    logger
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("Failed to start logger")
}
