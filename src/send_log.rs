//! Append-only record of send attempts and request errors.
//!
//! Only masked identifiers are ever handed to a `SendLog`.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use log::Level;

pub trait SendLog: Send + Sync {
    fn record(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Writes `<timestamp> - <LEVEL> - <message>` lines to a file and mirrors
/// every record to the console logger.
pub struct FileSendLog {
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSendLog {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    /// Flushes pending lines and closes the file. Later records only reach
    /// the console logger.
    pub fn close(&self) -> std::io::Result<()> {
        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

impl SendLog for FileSendLog {
    fn record(&self, level: Level, message: &str) {
        log::log!(level, "{}", message);

        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(writer) = guard.as_mut() else {
            log::warn!("Send log is closed, dropping record");
            return;
        };
        let line = format_line(level, message);
        if let Err(e) = writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
        {
            log::error!("Failed to write send log: {}", e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("send-log-{}.log", uuid::Uuid::new_v4()))
    }

    #[test]
    fn formats_timestamp_level_and_message() {
        let line = format_line(Level::Error, "Email to j***@e******.com: Failed: boom");
        let (timestamp, rest) = line.split_once(" - ").unwrap();

        assert_eq!(timestamp.len(), "2024-01-01 00:00:00,000".len());
        assert_eq!(rest, "ERROR - Email to j***@e******.com: Failed: boom\n");
    }

    #[test]
    fn appends_records_across_reopen() {
        let path = temp_log_path();

        let log = FileSendLog::open(&path).unwrap();
        log.info("Email to j***@e******.com: Sent");
        log.close().unwrap();

        let log = FileSendLog::open(&path).unwrap();
        log.error("Email to a@b.io: Failed: No recipient email provided");
        log.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - Email to j***@e******.com: Sent"));
        assert!(lines[1].ends_with(" - ERROR - Email to a@b.io: Failed: No recipient email provided"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn records_after_close_are_not_written() {
        let path = temp_log_path();

        let log = FileSendLog::open(&path).unwrap();
        log.close().unwrap();
        log.info("late");
        log.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        std::fs::remove_file(path).unwrap();
    }
}
