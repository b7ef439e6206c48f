//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use log::info;
use once_cell::sync::Lazy;
use tracing_subscriber::layer::SubscriberExt as _;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Returns the seconds since [`INIT_INSTANT`].
#[cfg(not(tarpaulin_include))]
pub fn uptime() -> u64 {
    INIT_INSTANT.elapsed().as_secs()
}

/// The filter used when `RUST_LOG` is not set: everything off except the sekai crates.
#[must_use]
pub fn default_filter(level: log::LevelFilter) -> String {
    format!("off,sekai={level}")
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of the sekai crates.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter) {
    use crate::format_duration;
    use env_logger::fmt::style::Style;

    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    let mut builder = env_logger::Builder::new();

    // If `RUST_LOG` isn't set, only the sekai crates log.
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    if env.is_empty() {
        builder.parse_filters(&default_filter(filter));
    } else {
        builder.parse_filters(&env);
    }

    builder
        .format(move |buf, record| {
            let level_style = buf.default_level_style(record.level()).bold();
            let dimmed = Style::new().dimmed();
            let level = match record.level() {
                log::Level::Debug => "D",
                log::Level::Trace => "T",
                log::Level::Info => "I",
                log::Level::Warn => "W",
                log::Level::Error => "E",
            };
            writeln!(
                buf,
                // Longest PATH in the repo: `core/src/pages/chart_detail.rs` - `30` characters
                // Longest file in the repo: `core/src/pages/master.rs`       - `4` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {level_style}{level}{level_style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >30} @ {: <4}{dimmed:#} | {}",
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }
}

/// Initializes the tracing layer.
///
/// Spans of the API calls are printed to stderr; install the result with
/// [`tracing::subscriber::set_global_default`].
#[must_use]
pub fn init_tracing() -> impl tracing::Subscriber + Send + Sync {
    let filter = tracing_subscriber::EnvFilter::new("off,sekai=trace");

    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .compact(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;

    #[test]
    fn test_default_filter() {
        assert_str_eq!(default_filter(log::LevelFilter::Debug), "off,sekai=DEBUG");
        assert_str_eq!(default_filter(log::LevelFilter::Off), "off,sekai=OFF");
    }
}
