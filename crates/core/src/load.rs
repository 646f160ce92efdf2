//! Load entry points: source text → lexer → reader → builder → [`SmsFile`].

use std::path::Path;

use crate::builder;
use crate::error::StfError;
use crate::model::SmsFile;
use crate::reader::StfReader;
use crate::source::{FileSystemProvider, SourceProvider};

/// Load a script from disk.
pub fn load(path: &Path) -> Result<SmsFile, StfError> {
    load_with_provider(path, &FileSystemProvider)
}

/// Load a script through `provider`. The text is dropped before returning.
pub fn load_with_provider(
    path: &Path,
    provider: &dyn SourceProvider,
) -> Result<SmsFile, StfError> {
    let text = provider.read_source(path).map_err(|source| StfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&text, &path.to_string_lossy())
}

/// Build a script from already-decoded text. `file_name` is used in
/// diagnostics and stored as the model's path.
pub fn load_str(text: &str, file_name: &str) -> Result<SmsFile, StfError> {
    log::debug!("loading sound script {}", file_name);
    let mut reader = StfReader::from_source(text, file_name)?;
    let script = builder::build_sms(&mut reader)?;
    if script.is_none() {
        log::debug!("{} has no Tr_SMS block", file_name);
    }
    Ok(SmsFile {
        path: file_name.to_owned(),
        script,
        diagnostics: reader.into_diagnostics(),
    })
}
