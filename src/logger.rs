//! Logging setup.
//!
//! Everything goes to stderr through `fern`. The level defaults to `info` and can be changed with
//! the `GLQUAD_LOG` environment variable.

use log::LevelFilter;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "GLQUAD_LOG";

/// Parses a level name, falling back to `Info` for anything unrecognised.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global logger.
pub fn init() -> Result<(), log::SetLoggerError> {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
