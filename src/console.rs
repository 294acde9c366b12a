//! In-app console log

use std::collections::VecDeque;

/// Lines kept before the oldest is dropped
pub const MAX_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Fetch,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Error => "[ERROR]",
            LogLevel::Fetch => "[FETCH]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// Bounded, timestamped log shown in the console panel
#[derive(Debug)]
pub struct ConsoleLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(MAX_LINES)
    }
}

/// Current local time as HH:MM:SS
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl ConsoleLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(MAX_LINES)),
            capacity: capacity.max(1),
        }
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        self.push_line(level, format!("[{}] {} {}", timestamp_now(), level.tag(), message));
    }

    pub fn info(&mut self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn fetch(&mut self, message: &str) {
        self.log(LogLevel::Fetch, message);
    }

    fn push_line(&mut self, level: LogLevel, text: String) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine { level, text });
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.info("Console cleared");
    }

    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_tagged() {
        let mut log = ConsoleLog::default();
        log.error("boom");
        let line = log.lines().next().unwrap();
        assert_eq!(line.level, LogLevel::Error);
        assert!(line.text.contains("[ERROR] boom"));
        assert!(line.text.starts_with('['));
    }

    #[test]
    fn test_oldest_lines_dropped() {
        let mut log = ConsoleLog::with_capacity(3);
        for i in 0..5 {
            log.info(&format!("line {}", i));
        }
        assert_eq!(log.len(), 3);
        let first = log.lines().next().unwrap();
        assert!(first.text.ends_with("line 2"));
    }

    #[test]
    fn test_clear_leaves_marker() {
        let mut log = ConsoleLog::default();
        log.warn("a");
        log.fetch("b");
        log.clear();
        assert_eq!(log.len(), 1);
        assert!(log.lines().next().unwrap().text.contains("Console cleared"));
    }
}
