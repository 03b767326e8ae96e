use thiserror::Error;

/// Errors raised by the audio façade.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A registry already holds an object under this name.
    #[error("Name already registered: {name}")]
    DuplicateName { name: String },

    /// No object was ever registered under this name.
    #[error("Nothing registered under name: {name}")]
    NotFound { name: String },

    /// The backend could not materialize a playable source.
    #[error("Failed to create sound '{file}': {reason}")]
    SoundCreation { file: String, reason: String },

    /// Names used for registration must not be empty.
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// A music entry needs a non-empty file and display name.
    #[error("Invalid music entry: {0}")]
    InvalidMusic(String),

    /// The backend rejected a resource path.
    #[error("Invalid resource path '{path}': {reason}")]
    ResourcePath { path: String, reason: String },

    /// The caller holds a borrow of the playlist the engine has to change.
    #[error("Playlist '{name}' is borrowed elsewhere")]
    PlaylistBusy { name: String },

    /// The caller holds a mutable borrow of the engine's listener.
    #[error("Listener is borrowed elsewhere")]
    ListenerBusy,

    /// A backend failed outside of sound creation (setup, teardown).
    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl AudioError {
    pub fn sound_creation(file: impl Into<String>, reason: impl Into<String>) -> Self {
        AudioError::SoundCreation {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn resource_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AudioError::ResourcePath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AudioError>;
