//! Backend-agnostic audio façade for the game engine.
//!
//! Game code talks to [`AudioEngine`], [`Playlist`] and [`SoundSource`] only;
//! the concrete backend is picked at startup by provider discovery and falls
//! back to a silent [`DummyAudioBackend`] when nothing else is available.
//!
//! - [`registry`]: unique-name object registry (playlists are looked up here)
//! - [`playlist`]: looping, self-advancing track sequencing
//! - [`engine`]: listener, playlist factory, per-frame update, shutdown
//! - [`backend`]: backend and provider contracts, discovery, implementations
//! - [`config`]: JSON configuration
//!
//! Everything is single-threaded. Completion notifications from a backend are
//! queued as [`AudioEvent`]s during [`AudioEngine::update`] and handled there.

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod file;
pub mod geometry;
pub mod listener;
pub mod music;
pub mod playlist;
pub mod registry;
pub mod source;

pub use backend::{
    AudioBackend, AudioEngineProvider, Discovery, DummyAudioBackend, DummyProvider,
    default_providers, discover,
};
#[cfg(feature = "kira")]
pub use backend::{KiraAudioBackend, KiraProvider};
pub use config::{AudioConfig, BackendSelection};
pub use engine::{AudioEngine, ListenerHandle, TEST_AUDIO_OFFSETS};
pub use error::{AudioError, Result};
pub use event::{AudioEvent, EventQueue};
pub use file::{AudioFile, FileKind, ResourcePath};
pub use geometry::Point3D;
pub use listener::{DefaultListener, Listener, PositionedListener};
pub use music::Music;
pub use playlist::{Playlist, PlaylistHandle, PlaylistRegistry, PlaylistState};
pub use registry::NamedRegistry;
pub use source::{EmptySoundSource, EndPlayListener, SoundBuilder, SoundSource};
