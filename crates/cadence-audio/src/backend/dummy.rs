use crate::backend::{AudioBackend, AudioEngineProvider};
use crate::config::AudioConfig;
use crate::error::Result;
use crate::file::ResourcePath;
use crate::listener::Listener;
use crate::source::{EmptySoundSource, SoundBuilder, SoundSource};

pub const PROVIDER_NAME: &str = "dummy";

/// Backend that never produces sound.
///
/// Used when no real backend is available, so the engine can always be
/// built and every call stays safe. Sources it creates are inert and never
/// complete.
#[derive(Debug, Default)]
pub struct DummyAudioBackend;

impl DummyAudioBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SoundBuilder for DummyAudioBackend {
    fn create_sound(&mut self, _file: &str) -> Result<Box<dyn SoundSource>> {
        Ok(Box::new(EmptySoundSource))
    }
}

impl AudioBackend for DummyAudioBackend {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn add_resource_path(&mut self, _path: &ResourcePath) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _listener: &dyn Listener) {}

    fn close_impl(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Provider for [`DummyAudioBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyProvider;

impl AudioEngineProvider for DummyProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn create_backend(&self, _config: &AudioConfig) -> Result<Box<dyn AudioBackend>> {
        Ok(Box::new(DummyAudioBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::DefaultListener;

    #[test]
    fn creates_inert_sources() {
        let mut backend = DummyAudioBackend::new();
        let mut source = backend.create_sound("missing.ogg").unwrap();
        source.play();
        assert!(!source.is_playing());
    }

    #[test]
    fn accepts_any_resource_path_and_closes() {
        let mut backend = DummyAudioBackend::new();
        backend
            .add_resource_path(&ResourcePath::vfs("anything.pak"))
            .unwrap();
        backend.update(&DefaultListener);
        backend.close_impl().unwrap();
        // Closing twice is harmless.
        backend.close_impl().unwrap();
    }
}
