//! Logger setup.
//!
//! The terminal logger starts before the config is read so that config
//! diagnostics are visible. The connection log file is only known after
//! resolution, so the file logger writes into a [`LogFile`] that is empty
//! until [`LogFile::attach`] opens the real file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{info, warn};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// A log sink whose file is opened after the logger is installed. Records
/// written before then are discarded.
#[derive(Clone, Default)]
pub struct LogFile {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` in append mode and routes further records there.
    pub fn attach(&self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.lock()? = Some(file);
        Ok(())
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<File>>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.lock()?.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock()?.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Installs the terminal logger (Info) and a file logger (Debug) over the
/// returned, still detached, [`LogFile`].
pub fn init() -> LogFile {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_file = LogFile::new();

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Info,
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, log_config, log_file.clone()),
    ];
    let _ = CombinedLogger::init(loggers);
    log_file
}

/// Attaches the resolved connection log, or reports why file logging is off.
pub fn attach_file(log_file: &LogFile, path: Option<&Path>) {
    match path {
        Some(path) => match log_file.attach(path) {
            Ok(()) => info!("Logging connections to {}", path.display()),
            Err(e) => warn!(
                "Could not open log file {}: {}. Logging to stdout only.",
                path.display(),
                e
            ),
        },
        None => info!("File logging disabled"),
    }
}
