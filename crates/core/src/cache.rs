//! Path-keyed memo of built scripts.
//!
//! The first request for a path builds the model; every later request gets
//! the same `Arc`. The lock is held while building, so concurrent requests
//! for one path build it once. Nothing is ever evicted. Keys are the paths
//! exactly as given, compared byte for byte.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StfError;
use crate::load::load_with_provider;
use crate::model::SmsFile;
use crate::source::{FileSystemProvider, SourceProvider};

pub struct SmsCache {
    provider: Box<dyn SourceProvider + Send + Sync>,
    entries: Mutex<HashMap<PathBuf, Arc<SmsFile>>>,
}

impl SmsCache {
    /// A cache reading scripts from disk.
    pub fn new() -> Self {
        Self::with_provider(FileSystemProvider)
    }

    pub fn with_provider(provider: impl SourceProvider + Send + Sync + 'static) -> Self {
        SmsCache {
            provider: Box::new(provider),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Model for `path`, building it on first use. A fatal error is returned
    /// as-is and nothing is stored, so the next call tries again.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Arc<SmsFile>, StfError> {
        let path = path.as_ref();
        let mut entries = self.entries.lock();
        if let Some(sms) = entries.get(path) {
            return Ok(Arc::clone(sms));
        }
        let sms = Arc::new(load_with_provider(path, self.provider.as_ref())?);
        log::debug!(
            "cached {} ({} diagnostics)",
            path.display(),
            sms.diagnostics.len()
        );
        entries.insert(path.to_path_buf(), Arc::clone(&sms));
        Ok(sms)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.lock().contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for SmsCache {
    fn default() -> Self {
        Self::new()
    }
}
