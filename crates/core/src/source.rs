//! Where script text comes from.
//!
//! Loading goes through [`SourceProvider`] so the cache and loader can be
//! exercised without touching the filesystem.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

pub trait SourceProvider {
    /// Read and decode the whole text for `path`.
    fn read_source(&self, path: &Path) -> Result<String, io::Error>;
}

/// Reads files from disk.
///
/// Content tools wrote scripts as UTF-16 with a byte-order mark; hand-edited
/// files are usually UTF-8. Both are accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, io::Error> {
        decode(&std::fs::read(path)?)
    }
}

/// Decode by byte-order mark: UTF-16LE, UTF-16BE, otherwise UTF-8 (BOM optional).
pub fn decode(bytes: &[u8]) -> Result<String, io::Error> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => utf8(rest),
        _ => utf8(bytes),
    }
}

fn utf8(bytes: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(bytes.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, io::Error> {
    if bytes.len() % 2 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "odd byte count in UTF-16 text",
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Path → text map, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, text)| (Self::normalize_path(&path), text))
                .collect(),
        }
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files
            .insert(Self::normalize_path(path.as_ref()), text.into());
    }

    /// Resolve `.` and `..` lexically.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, io::Error> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such script in memory: {}", normalized.display()),
            )
        })
    }
}
