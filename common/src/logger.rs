use chrono::Local;
use colored::Colorize;
use fern::Dispatch;
use log::LevelFilter;
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::Path;

/// Maps a textual level (as found in `LOG_LEVEL`) to a filter, defaulting to `Info`.
pub fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger.
///
/// Records always go to `log_file_path` without color codes. When `to_stdout`
/// is set they are echoed to stdout with colored levels as well. The seeder's
/// own progress lines are printed directly and are not affected by this.
pub fn init_logger(log_level: &str, log_file_path: &str, to_stdout: bool) -> io::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let file_dispatch = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(log_file);

    let mut root = Dispatch::new()
        .level(parse_level(log_level))
        // sqlx logs every statement at info; keep it out of the seeding log
        .level_for("sqlx", LevelFilter::Warn)
        .level_for("sea_orm", LevelFilter::Warn)
        .chain(file_dispatch);

    if to_stdout {
        let stdout_dispatch = Dispatch::new()
            .format(|out, message, record| {
                let level_str = match record.level() {
                    log::Level::Error => "ERROR".red(),
                    log::Level::Warn => "WARN".yellow(),
                    log::Level::Info => "INFO".green(),
                    log::Level::Debug => "DEBUG".cyan(),
                    log::Level::Trace => "TRACE".normal(),
                };

                out.finish(format_args!(
                    "[{}][{}][{}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level_str,
                    record.target(),
                    message
                ))
            })
            .chain(io::stdout());
        root = root.chain(stdout_dispatch);
    }

    root.apply()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_is_case_insensitive() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" warn "), LevelFilter::Warn);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("seeder=debug"), LevelFilter::Info);
    }

    #[test]
    fn init_creates_missing_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/seeder.log");
        init_logger("info", path.to_str().unwrap(), false).unwrap();
        log::info!("logger ready");
        assert!(path.exists());
    }
}
