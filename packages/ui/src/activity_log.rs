//! Non-blocking notices shown next to the users list.
//!
//! Blocking failures go through [`crate::BrowserPrompt`]; everything else
//! (saved, deleted, a create that the server refused) lands here and is
//! mirrored into `tracing`.

use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    pub fn push(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Info | LogLevel::Success => tracing::info!("{}", message),
        }
        // errors open the panel so they are not missed
        if level == LogLevel::Error {
            self.visible = true;
        }
        self.entries.push(LogEntry {
            timestamp: current_time(),
            level,
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == LogLevel::Error)
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    log.write().push(level, message);
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    "00:00:00".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_opens_panel() {
        let mut log = ActivityLog::default();
        log.push(LogLevel::Success, "User saved");
        assert!(!log.visible);
        assert!(!log.has_errors());

        log.push(LogLevel::Error, "Could not save user");
        assert!(log.visible);
        assert!(log.has_errors());
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entries[1].message, "Could not save user");
    }
}
