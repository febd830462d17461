use const_format::{concatcp, map_ascii_case, Case};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable that overrides the log level filter (e.g. `KTHROUGHPUT_LOG=debug`).
const LOG_ENV_VAR: &str = concatcp!(map_ascii_case!(Case::Upper, env!("CARGO_PKG_NAME")), "_LOG");

/// Initialize the process-wide logger.
///
/// The per-tick throughput report is emitted at `INFO`, so that is
/// the default level: `--verbose`/`--quiet` move it up or down,
/// and [`LOG_ENV_VAR`] overrides the flags altogether.
///
/// # Arguments
///
/// * `verbosity_level` - The result of [`crate::cli::Cli::verbosity_level`]
pub fn init(verbosity_level: i8) {
    let default_level = match verbosity_level {
        i8::MIN..=-3 => LevelFilter::Off,
        -2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::from_env(Env::default().filter_or(LOG_ENV_VAR, default_level.as_str())).init();

    trace!("Initialized logging at level: {default_level}");
}
