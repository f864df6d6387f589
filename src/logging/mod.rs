mod pretty_list;

use anyhow::Result;
use flexi_logger::{DeferredNow, Logger, LoggerHandle, Record};
use textwrap::Options;

pub use self::pretty_list::PrettyList;

/// The widest a log line is allowed to get before it wraps.
const MAX_LOG_WIDTH: usize = 74;

/// Used when RUST_LOG is not set.
const DEFAULT_LOG_SPEC: &str = "info";

/// Setup console logging for this application.
///
/// The returned handle must be kept alive for as long as the application
/// wants log output.
pub fn setup() -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(DEFAULT_LOG_SPEC)?
        .format(multiline_format)
        .start()?;

    log::info!(
        "Adjust the log level by setting RUST_LOG. By default RUST_LOG={}",
        DEFAULT_LOG_SPEC
    );

    Ok(handle)
}

/// A flexi_logger format which puts the level, time, and source on a header
/// line and wraps the message below it to the terminal width.
pub fn multiline_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let header = format!(
        "{} [{}] [{}]",
        record.level(),
        now.now().format("%H:%M:%S%.6f"),
        source_location(record),
    );
    let width = textwrap::termwidth().min(MAX_LOG_WIDTH);
    writeln!(w, "{}", wrap_entry(&header, &record.args().to_string(), width))
}

fn source_location(record: &Record) -> String {
    match (record.module_path(), record.line()) {
        (Some(module), Some(line)) => format!("{}:{}", module, line),
        (Some(module), None) => module.to_owned(),
        _ => record.file().unwrap_or("<unnamed>").to_owned(),
    }
}

/// The header on its own line followed by the message, all wrapped to
/// `width` columns.
fn wrap_entry(header: &str, message: &str, width: usize) -> String {
    let options = Options::new(width)
        .initial_indent("┏ ")
        .subsequent_indent("┃ ");
    textwrap::fill(&format!("{}\n{}", header, message), options)
}
