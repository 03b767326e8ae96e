use serde::{Deserialize, Serialize};

/// Where an audio resource is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Plain file on disk.
    File,
    /// Entry inside a virtual filesystem container.
    Vfs,
}

/// Reference to an audio file and the kind of storage holding it.
///
/// Only constructed through [`AudioFile::file`] and [`AudioFile::vfs`]; the
/// kind never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFile {
    name: String,
    kind: FileKind,
}

impl AudioFile {
    /// File stored in a virtual filesystem container.
    pub fn vfs(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Vfs,
        }
    }

    /// Physical file.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::File,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_vfs(&self) -> bool {
        self.kind == FileKind::Vfs
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

/// A location the backend searches when resolving sound files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePath {
    pub path: String,
    pub kind: FileKind,
}

impl ResourcePath {
    /// Directory on disk.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::File,
        }
    }

    /// Virtual filesystem container.
    pub fn vfs(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Vfs,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_vfs(&self) -> bool {
        self.kind == FileKind::Vfs
    }
}
