//! Non-fatal load diagnostics.
//!
//! Warnings and errors raised while building a model never abort the load;
//! they are logged as they happen and kept on the resulting [`SmsFile`].
//!
//! [`SmsFile`]: crate::model::SmsFile

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Parse continued and the object was produced as written.
    Warning,
    /// Parse continued but the object is structurally incomplete.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, file: &str, line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    /// Forward to the `log` facade at the matching level.
    pub(crate) fn log(&self) {
        match self.severity {
            Severity::Warning => log::warn!("{}", self),
            Severity::Error => log::error!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}:{}: {}: {}", self.file, self.line, level, self.message)
    }
}
