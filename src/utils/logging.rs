//! Conversation transcript log.
//!
//! This is the user-facing `/log` file, not diagnostics; those go through
//! `tracing`.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::message::Message;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A path given at startup starts logging immediately.
    pub fn new(log_file: Option<String>) -> io::Result<Self> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> io::Result<String> {
        self.file_path = Some(path.clone());
        self.is_active = true;
        self.write_to_log(&format!(
            "## Logging started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> io::Result<String> {
        match self.file_path.clone() {
            Some(path) => {
                if self.is_active {
                    self.log_message("## Logging paused")?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No log file specified. Use /log <filename> to enable logging first.",
            )),
        }
    }

    pub fn log_turn(&self, message: &Message) -> io::Result<()> {
        let prefix = if message.is_user() { "You: " } else { "" };
        self.log_message(&format!("{prefix}{}", message.content))
    }

    pub fn log_message(&self, content: &str) -> io::Result<()> {
        if !self.is_active {
            return Ok(());
        }
        self.write_to_log(content)
    }

    fn write_to_log(&self, content: &str) -> io::Result<()> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries, matching the on-screen layout.
        writeln!(writer)?;

        writer.flush()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}
