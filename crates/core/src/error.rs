use std::path::PathBuf;

/// A fatal load error. Any of these aborts the whole file: no partial model
/// is returned and the cache stores nothing for the path.
#[derive(Debug, thiserror::Error)]
pub enum StfError {
    /// The source could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A block-open marker or other literal was required but something else was found.
    #[error("{file}:{line}: expected '{expected}', got '{found}'")]
    UnexpectedToken {
        file: String,
        line: u32,
        expected: String,
        found: String,
    },

    /// Input ended while a token was still required.
    #[error("{file}:{line}: unexpected end of file, expected {expected}")]
    UnexpectedEof {
        file: String,
        line: u32,
        expected: String,
    },

    /// A numeric literal (or its unit suffix) could not be parsed.
    #[error("{file}:{line}: invalid number '{literal}'")]
    InvalidNumber {
        file: String,
        line: u32,
        literal: String,
    },

    #[error("{file}:{line}: unterminated string literal")]
    UnterminatedString { file: String, line: u32 },

    /// A declared element count is larger than the loader accepts.
    #[error("{file}:{line}: declared count {count} exceeds limit {limit}")]
    CountTooLarge {
        file: String,
        line: u32,
        count: i32,
        limit: usize,
    },
}

impl StfError {
    /// Line the error was detected on, 0 when not tied to the source text.
    pub fn line(&self) -> u32 {
        match self {
            StfError::Io { .. } => 0,
            StfError::UnexpectedToken { line, .. }
            | StfError::UnexpectedEof { line, .. }
            | StfError::InvalidNumber { line, .. }
            | StfError::UnterminatedString { line, .. }
            | StfError::CountTooLarge { line, .. } => *line,
        }
    }

    /// File the error belongs to.
    pub fn file(&self) -> String {
        match self {
            StfError::Io { path, .. } => path.to_string_lossy().into_owned(),
            StfError::UnexpectedToken { file, .. }
            | StfError::UnexpectedEof { file, .. }
            | StfError::InvalidNumber { file, .. }
            | StfError::UnterminatedString { file, .. }
            | StfError::CountTooLarge { file, .. } => file.clone(),
        }
    }

    /// Serialize for `--output json`. Always includes every field.
    pub fn to_json_value(&self) -> serde_json::Value {
        let kind = match self {
            StfError::Io { .. } => "io",
            StfError::UnexpectedToken { .. } => "unexpected_token",
            StfError::UnexpectedEof { .. } => "unexpected_eof",
            StfError::InvalidNumber { .. } => "invalid_number",
            StfError::UnterminatedString { .. } => "unterminated_string",
            StfError::CountTooLarge { .. } => "count_too_large",
        };
        serde_json::json!({
            "file":    self.file(),
            "kind":    kind,
            "line":    self.line(),
            "message": self.to_string(),
        })
    }
}
