//! Logging setup on `log` + `log4rs`.
//!
//! Only the xid crates log by default; everything else is off unless a
//! filter expression opts a specific module in.

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::io::IsTerminal;
use std::path::Path;

/// Crates that log at the requested level without being named in the
/// filter expression.
const XID_CRATES: &[&str] = &["xid_core", "xid_service", "xidd"];

const LOG_FILE_NAME: &str = "xid.log";
const ERR_LOG_FILE_NAME: &str = "xid_err.log";

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l:5}] {t}: {m}{n}";
const PATTERN_COLORED: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{h({l:5})}] {t}: {m}{n}";

/// Rotate log files at 20 MB, keeping three gzipped archives.
const FILE_MAX_SIZE: u64 = 20_000_000;
const FILE_MAX_ROLLS: u32 = 3;

/// Parsed form of a filter expression like `"debug,rocksdb=warn"`.
///
/// Bare tokens set the level of the xid crates; `module=level` tokens set
/// the level of one module, which is also how third-party crates are
/// opted in.  Unparseable tokens are dropped.
struct LogFilters {
    app_level: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

fn parse_filters(filters: &str) -> LogFilters {
    let mut parsed = LogFilters { app_level: LevelFilter::Info, modules: Vec::new() };
    for token in filters.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('=') {
            None => {
                if let Ok(level) = token.parse() {
                    parsed.app_level = level;
                }
            }
            Some((module, level)) => {
                let (module, level) = (module.trim(), level.trim());
                if module.is_empty() {
                    continue;
                }
                if let Ok(level) = level.parse() {
                    parsed.modules.retain(|(m, _)| m != module);
                    parsed.modules.push((module.to_string(), level));
                }
            }
        }
    }
    parsed
}

/// Per-module levels to configure: the xid crates at the app level, unless
/// the expression overrides them, plus every explicitly named module.
fn module_levels(parsed: &LogFilters) -> Vec<(String, LevelFilter)> {
    let mut levels: Vec<(String, LevelFilter)> = XID_CRATES
        .iter()
        .filter(|krate| !parsed.modules.iter().any(|(m, _)| m == *krate))
        .map(|krate| (krate.to_string(), parsed.app_level))
        .collect();
    levels.extend(parsed.modules.iter().cloned());
    levels
}

fn rolling_appender(dir: &Path, file_name: &str) -> RollingFileAppender {
    let archive_pattern = dir.join(format!("{file_name}.{{}}.gz"));
    let roller = FixedWindowRoller::builder()
        .base(1)
        .build(archive_pattern.to_str().unwrap_or("xid.log.{}.gz"), FILE_MAX_ROLLS)
        .unwrap();
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(FILE_MAX_SIZE)), Box::new(roller));

    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(dir.join(file_name), Box::new(policy))
        .unwrap()
}

/// Initialize the xid logger.
///
/// Console output always goes to stderr; with a `log_dir` a rolling log
/// file plus a warn-and-up error file are written as well.  The logger is
/// global and repeated calls are ignored.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let parsed = parse_filters(filters);

    let console_pattern = if std::io::stderr().is_terminal() { PATTERN_COLORED } else { PATTERN };
    let console = ConsoleAppender::builder().target(Target::Stderr).encoder(Box::new(PatternEncoder::new(console_pattern))).build();

    let mut builder = Config::builder().appender(Appender::builder().build("stderr", Box::new(console)));
    let mut appenders = vec!["stderr".to_string()];

    if let Some(dir) = log_dir.map(str::trim).filter(|dir| !dir.is_empty()).map(|dir| Path::new(dir)) {
        builder = builder.appender(Appender::builder().build("log_file", Box::new(rolling_appender(dir, LOG_FILE_NAME))));
        builder = builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Warn)))
                .build("err_log_file", Box::new(rolling_appender(dir, ERR_LOG_FILE_NAME))),
        );
        appenders.push("log_file".to_string());
        appenders.push("err_log_file".to_string());
    }

    for (module, level) in module_levels(&parsed) {
        builder = builder.logger(Logger::builder().appenders(appenders.clone()).additive(false).build(module, level));
    }

    let config = builder.build(Root::builder().appenders(appenders).build(LevelFilter::Off)).unwrap();
    let _ = log4rs::init_config(config);
}
