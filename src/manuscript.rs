use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EditorError, Result};

/// A manuscript loaded fully into memory. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct Manuscript {
    path: PathBuf,
    name: String,
    text: String,
}

impl Manuscript {
    /// Read the whole file as UTF-8, with `\r\n` and lone `\r` line endings
    /// folded to `\n`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_exists(path)?;

        let bytes = std::fs::read(path).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| EditorError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let text = normalize_newlines(text);
        debug!(path = %path.display(), bytes = text.len(), "loaded manuscript");

        Ok(Self {
            path: path.to_path_buf(),
            name: manuscript_name(path),
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem; the style sheet identity key.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Fail with `NotFound` before any analysis starts.
pub fn require_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(EditorError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

pub fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

pub fn manuscript_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
