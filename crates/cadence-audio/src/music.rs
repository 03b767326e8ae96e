use crate::error::{AudioError, Result};
use crate::file::AudioFile;

/// A playlist entry: the file handed to the backend plus a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Music {
    file: AudioFile,
    name: String,
}

impl Music {
    /// Music entry for a plain file, with an explicit display name.
    pub fn with_name(file: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Self::from_audio_file(AudioFile::file(file), name)
    }

    /// Music entry for a plain file, displayed under its file name.
    pub fn from_file(file: impl Into<String>) -> Result<Self> {
        let file = file.into();
        Self::with_name(file.clone(), file)
    }

    /// Music entry for a file of any storage kind.
    pub fn from_audio_file(file: AudioFile, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if file.name().is_empty() {
            return Err(AudioError::InvalidMusic("file must not be empty".to_string()));
        }
        if name.is_empty() {
            return Err(AudioError::InvalidMusic(format!(
                "display name for '{}' must not be empty",
                file.name()
            )));
        }
        Ok(Self { file, name })
    }

    /// Name of the file handed to the backend.
    pub fn file(&self) -> &str {
        self.file.name()
    }

    pub fn audio_file(&self) -> &AudioFile {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
