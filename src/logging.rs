use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs the stderr subscriber shared by the binaries. `RUST_LOG` takes
/// precedence; otherwise `verbosity` picks warn, info or debug.
pub fn init(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
