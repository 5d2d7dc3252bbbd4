//! File logging for TwitCoop.
//!
//! Installs a `log::Log` implementation that appends to a daily file in the
//! app log directory, with size-based rotation and cleanup. Level filtering
//! follows `RUST_LOG` (default `info`), parsed by `env_logger`.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};
use tauri::{AppHandle, Manager};

use crate::error::{LockResultExt, ResultExt, ShellResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_FILE_PREFIX: &str = "twitcoop";

lazy_static::lazy_static! {
    /// Global log file handle
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    /// Log directory path
    static ref LOG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Routes `log` records that pass the `RUST_LOG` filter to the log file.
struct ShellLogger {
    filter: env_logger::Logger,
}

impl Log for ShellLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.filter.matches(record) {
            log_internal(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        if let Ok(mut log_file) = LOG_FILE.lock() {
            if let Some(ref mut file) = *log_file {
                let _ = file.flush();
            }
        }
    }
}

/// Initialize the logging system
pub fn init_logging(app: &AppHandle) -> ShellResult<()> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("Failed to get log directory")?;

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    {
        let mut dir = LOG_DIR.lock().map_lock_err("log directory")?;
        *dir = Some(log_dir.clone());
    }

    let log_file_path = get_current_log_path(&log_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .context("Failed to open log file")?;

    {
        let mut log_file = LOG_FILE.lock().map_lock_err("log file")?;
        *log_file = Some(file);
    }

    let filter = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level = filter.filter();
    log::set_boxed_logger(Box::new(ShellLogger { filter }))
        .context("Failed to install logger")?;
    log::set_max_level(max_level);

    log::info!("Logging system initialized");
    log::info!("Log directory: {:?}", log_dir);

    cleanup_old_logs(&log_dir);

    Ok(())
}

/// Get the path for the current log file (one per day)
fn get_current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, date))
}

/// Clean up old log files, keeping only the most recent MAX_LOG_FILES
fn cleanup_old_logs(log_dir: &Path) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "log")
                    .unwrap_or(false)
            })
            .collect();

        // Newest first
        log_files.sort_by(|a, b| {
            let a_time = a.metadata().and_then(|m| m.modified()).ok();
            let b_time = b.metadata().and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for file in log_files.into_iter().skip(MAX_LOG_FILES) {
            let _ = fs::remove_file(file.path());
        }
    }
}

/// Check if log rotation is needed and rotate if necessary
fn check_rotation() {
    // Skip rotation rather than panic on a poisoned lock
    let log_dir = {
        let dir = match LOG_DIR.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        match dir.as_ref() {
            Some(d) => d.clone(),
            None => return,
        }
    };

    let current_path = get_current_log_path(&log_dir);

    if let Ok(metadata) = fs::metadata(&current_path) {
        if metadata.len() > MAX_LOG_SIZE {
            let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
            let rotated_path = log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, timestamp));
            let _ = fs::rename(&current_path, &rotated_path);

            if let Ok(file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&current_path)
            {
                if let Ok(mut log_file) = LOG_FILE.lock() {
                    *log_file = Some(file);
                }
            }

            cleanup_old_logs(&log_dir);
        }
    }
}

fn format_line(level: Level, source: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] [{}] {}\n", timestamp, level, source, message)
}

/// Write one line to the log file (and stderr in debug builds).
fn log_internal(level: Level, source: &str, message: &str) {
    let log_line = format_line(level, source, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = file.write_all(log_line.as_bytes());
            let _ = file.flush();
        }
    }

    #[cfg(debug_assertions)]
    eprintln!("{}", log_line.trim());

    check_rotation();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "twitcoop-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_current_log_path_is_dated() {
        let path = get_current_log_path(Path::new("/tmp/logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(name.starts_with("twitcoop_"));
        assert!(name.ends_with(".log"));
        // twitcoop_YYYY-MM-DD.log
        assert_eq!(name.len(), "twitcoop_".len() + 10 + ".log".len());
    }

    #[test]
    fn test_cleanup_keeps_newest_logs() {
        let dir = scratch_dir("cleanup");
        for day in 1..=8 {
            fs::write(dir.join(format!("twitcoop_2026-01-0{}.log", day)), "x").unwrap();
        }
        fs::write(dir.join("settings.json"), "{}").unwrap();

        cleanup_old_logs(&dir);

        let remaining: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        let logs = remaining
            .iter()
            .filter(|p| p.extension().map(|ext| ext == "log").unwrap_or(false))
            .count();

        assert_eq!(logs, MAX_LOG_FILES);
        assert!(dir.join("settings.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_format_line() {
        let line = format_line(Level::Warn, "twitcoop_lib::shell", "Load failed");
        assert!(line.contains("[WARN] [twitcoop_lib::shell] Load failed"));
        assert!(line.ends_with('\n'));
    }
}
