//! Transient user notifications.
//!
//! The core decides *what* to tell the user; how it is shown (and for how
//! long) belongs to the [`NotifierPort`](crate::ports::NotifierPort) adapter.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A sheet was used and some remain.
    SheetUsed { remaining: u32 },
    /// No paper left.
    OutOfPaper,
    /// Persisted values could not be read or decoded.
    LoadFailed,
    /// A write to the remote store was rejected.
    SaveFailed,
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Notification::SheetUsed { .. } | Notification::OutOfPaper => Severity::Info,
            Notification::LoadFailed | Notification::SaveFailed => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::SheetUsed { remaining } => {
                format!("Sheet used, {} remaining", remaining)
            }
            Notification::OutOfPaper => "You are out of toilet paper".to_string(),
            Notification::LoadFailed => "Could not load data from storage".to_string(),
            Notification::SaveFailed => "Could not save data to storage".to_string(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
