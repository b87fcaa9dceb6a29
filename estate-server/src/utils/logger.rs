//! Logging Infrastructure
//!
//! 控制台或按天滚动的文件输出，可选 JSON 格式。
//! `RUST_LOG` 优先于配置中的日志级别。

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// File name prefix of the rolling log files
const LOG_FILE_PREFIX: &str = "estate-server";

/// Initialize the logger with console output at `info`
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file("info", false, None)
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(
    log_level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(Path::new(dir))?;
            Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
        }
        None => None,
    };

    let result = match (json, file_appender) {
        (true, Some(writer)) => subscriber.json().with_writer(writer).try_init(),
        (true, None) => subscriber.json().try_init(),
        (false, Some(writer)) => subscriber.with_ansi(false).with_writer(writer).try_init(),
        (false, None) => subscriber.try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
