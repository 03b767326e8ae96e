//! Audio backends and provider discovery.
//!
//! This module provides:
//! - [`AudioBackend`]: what a concrete backend implements for the engine
//! - [`AudioEngineProvider`]: constructs a backend at startup
//! - [`discover`]: picks the first provider that starts, falling back to
//!   [`DummyAudioBackend`]
//!
//! Implementations: [`DummyAudioBackend`] (always available) and, with the
//! `kira` feature, `KiraAudioBackend`.

pub mod dummy;
#[cfg(feature = "kira")]
pub mod kira;

use log::{info, warn};

use crate::config::AudioConfig;
use crate::error::Result;
use crate::file::ResourcePath;
use crate::listener::Listener;
use crate::source::SoundBuilder;

pub use dummy::{DummyAudioBackend, DummyProvider};
#[cfg(feature = "kira")]
pub use kira::{KiraAudioBackend, KiraProvider};

/// Backend-specific half of the engine.
pub trait AudioBackend: SoundBuilder {
    /// Name of the provider that built this backend.
    fn name(&self) -> &'static str;

    /// Register a location to resolve sound files from.
    fn add_resource_path(&mut self, path: &ResourcePath) -> Result<()>;

    /// Per-frame pump. Completion listeners of finished sources fire here.
    fn update(&mut self, listener: &dyn Listener);

    /// Release native resources. Called by the engine on close.
    fn close_impl(&mut self) -> Result<()>;
}

/// Builds a backend at startup.
pub trait AudioEngineProvider {
    fn name(&self) -> &'static str;

    /// Fails when the backend cannot run here (no device, missing library).
    fn create_backend(&self, config: &AudioConfig) -> Result<Box<dyn AudioBackend>>;
}

/// How the running backend was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Built by the named provider.
    Provider(&'static str),
    /// No provider could start; the dummy backend is used.
    Fallback,
}

/// Providers compiled into this build, in discovery order.
pub fn default_providers() -> Vec<Box<dyn AudioEngineProvider>> {
    #[allow(unused_mut)]
    let mut providers: Vec<Box<dyn AudioEngineProvider>> = Vec::new();
    #[cfg(feature = "kira")]
    providers.push(Box::new(KiraProvider));
    providers
}

/// Pick a backend for `config`.
///
/// With [`crate::BackendSelection::Auto`] every provider is tried in order and
/// the first one that starts wins. A pinned selection only tries the provider
/// with that name. Either way the dummy backend is the last resort, so this
/// never fails.
pub fn discover(
    providers: &[Box<dyn AudioEngineProvider>],
    config: &AudioConfig,
) -> (Box<dyn AudioBackend>, Discovery) {
    let pinned = config.backend.provider_name();
    if pinned == Some(dummy::PROVIDER_NAME) {
        return (
            Box::new(DummyAudioBackend::new()),
            Discovery::Provider(dummy::PROVIDER_NAME),
        );
    }

    let candidates = providers
        .iter()
        .filter(|provider| pinned.is_none_or(|name| provider.name() == name));
    for provider in candidates {
        match provider.create_backend(config) {
            Ok(backend) => {
                info!("Audio backend '{}' selected", provider.name());
                return (backend, Discovery::Provider(provider.name()));
            }
            Err(e) => warn!("Audio provider '{}' unavailable: {e}", provider.name()),
        }
    }

    match pinned {
        Some(name) => warn!("Audio backend '{name}' not available, using dummy backend"),
        None => info!("No audio provider available, using dummy backend"),
    }
    (Box::new(DummyAudioBackend::new()), Discovery::Fallback)
}
