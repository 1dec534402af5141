//! Logging setup and structured metric lines.
//!
//! The library only talks to the `log` facade. Binaries call `init_logging`
//! once to route records through `env_logger`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::Result;

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```ignore
/// let pairs = 12;
/// log_metric!("event" = "aggregation_finished", "pairs" = pairs);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!("COSTAR_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
///
/// `verbose` lowers the level from `Info` to `Debug`; `RUST_LOG`, when set,
/// still takes precedence. With `log_file`, records are appended to that file
/// instead of stderr.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    // Open the file outside `call_once` so failure can be reported.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
        builder.parse_default_env();

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
