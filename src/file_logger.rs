use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

/// Append-only conversation transcript.
pub struct FileLogger {
    file: Mutex<std::fs::File>,
}

impl FileLogger {
    pub fn new(path: &str) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn log(&self, action: &str, details: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] [{}] {}\n", timestamp, action, details);

        print!("{}", line);

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }

    pub fn log_session_opened(&self, session_id: &str) {
        self.log("OPEN", session_id);
    }

    pub fn log_user(&self, session_id: &str, message: &str) {
        self.log("USER", &format!("{}: {}", session_id, message));
    }

    pub fn log_reply(&self, session_id: &str, reply: &str) {
        self.log("ELIZA", &format!("{}: {}", session_id, reply));
    }

    pub fn log_session_closed(&self, session_id: &str) {
        self.log("CLOSE", session_id);
    }
}
