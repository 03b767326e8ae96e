use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{self, AudioBackend, AudioEngineProvider, Discovery, DummyAudioBackend};
use crate::config::AudioConfig;
use crate::error::{AudioError, Result};
use crate::event::{AudioEvent, EventQueue};
use crate::file::{AudioFile, ResourcePath};
use crate::geometry::Point3D;
use crate::listener::{DefaultListener, Listener};
use crate::playlist::{Playlist, PlaylistHandle, PlaylistRegistry};
use crate::source::{EmptySoundSource, SoundBuilder, SoundSource};

/// Shared handle to the listener the engine positions sounds against.
pub type ListenerHandle = Rc<RefCell<dyn Listener>>;

/// Listener offsets visited by [`AudioEngine::test_audio`].
pub const TEST_AUDIO_OFFSETS: [Point3D; 4] = [
    Point3D::new(5.0, 0.0, 5.0),
    Point3D::new(-5.0, 0.0, 5.0),
    Point3D::new(5.0, 0.0, -5.0),
    Point3D::new(-5.0, 0.0, -5.0),
];

/// Builder view of a backend that applies the master gain to new sources.
struct GainBuilder<'a> {
    backend: &'a mut dyn AudioBackend,
    gain: f32,
}

impl SoundBuilder for GainBuilder<'_> {
    fn create_sound(&mut self, file: &str) -> Result<Box<dyn SoundSource>> {
        let mut source = self.backend.create_sound(file)?;
        source.set_gain(self.gain);
        Ok(source)
    }

    fn create_audio(&mut self, file: &AudioFile) -> Result<Box<dyn SoundSource>> {
        let mut source = self.backend.create_audio(file)?;
        source.set_gain(self.gain);
        Ok(source)
    }
}

/// Backend-agnostic audio engine.
///
/// Owns the listener, the playlist registry and the event queue completion
/// notifications travel through. Everything backend-specific is delegated to
/// an [`AudioBackend`] chosen at construction.
pub struct AudioEngine {
    backend: Box<dyn AudioBackend>,
    discovery: Discovery,
    listener: ListenerHandle,
    /// Last test/music source started by the engine itself, stopped on close.
    music_playing: Box<dyn SoundSource>,
    playlists: PlaylistRegistry,
    events: EventQueue,
    master_gain: f32,
    max_advances_per_update: usize,
    /// Set while completions are being deferred by the advance budget.
    backlogged: bool,
    closed: bool,
}

impl AudioEngine {
    /// Engine on the first available compiled-in backend, else the dummy one.
    pub fn get_engine(config: &AudioConfig) -> Self {
        Self::from_providers(&backend::default_providers(), config)
    }

    /// Engine on the first of `providers` that starts, else the dummy backend.
    pub fn from_providers(
        providers: &[Box<dyn AudioEngineProvider>],
        config: &AudioConfig,
    ) -> Self {
        let (backend, discovery) = backend::discover(providers, config);
        Self::assemble(backend, discovery, config)
    }

    /// Engine on an explicitly constructed backend.
    pub fn with_backend(backend: Box<dyn AudioBackend>, config: &AudioConfig) -> Self {
        let discovery = Discovery::Provider(backend.name());
        Self::assemble(backend, discovery, config)
    }

    /// Engine that never produces sound.
    pub fn dummy() -> Self {
        Self::with_backend(Box::new(DummyAudioBackend::new()), &AudioConfig::default())
    }

    fn assemble(
        backend: Box<dyn AudioBackend>,
        discovery: Discovery,
        config: &AudioConfig,
    ) -> Self {
        let mut engine = Self {
            backend,
            discovery,
            listener: Rc::new(RefCell::new(DefaultListener)),
            music_playing: Box::new(EmptySoundSource),
            playlists: PlaylistRegistry::new(),
            events: EventQueue::new(),
            master_gain: config.effective_gain(),
            max_advances_per_update: config.max_advances_per_update.max(1),
            backlogged: false,
            closed: false,
        };
        for path in &config.resource_paths {
            if let Err(e) = engine.add_resource_path(path) {
                warn!("Skipping resource path: {e}");
            }
        }
        info!("Audio engine opened on '{}' backend", engine.backend_name());
        engine
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn discovery(&self) -> Discovery {
        self.discovery
    }

    /// Set the listener used for 3D positioning, usually the camera.
    pub fn set_listener(&mut self, listener: ListenerHandle) -> &mut Self {
        self.listener = listener;
        self
    }

    pub fn listener(&self) -> ListenerHandle {
        Rc::clone(&self.listener)
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    /// Gain applied to sources created from now on.
    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = if gain.is_nan() { 1.0 } else { gain.clamp(0.0, 1.0) };
    }

    /// Add a location the backend resolves sound files from.
    pub fn add_resource_path(&mut self, path: &ResourcePath) -> Result<&mut Self> {
        self.backend.add_resource_path(path)?;
        debug!("Resource path added: {} ({:?})", path.path, path.kind);
        Ok(self)
    }

    /// Build a playlist and register it under `name`.
    pub fn create_playlist(&mut self, name: &str) -> Result<PlaylistHandle> {
        let playlist = Playlist::create(name, &mut self.playlists, self.events.clone())?;
        info!("Playlist '{name}' created");
        Ok(playlist)
    }

    /// Build a playlist under a generated unique name.
    pub fn create_playlist_unnamed(&mut self) -> Result<PlaylistHandle> {
        let name = loop {
            let candidate = format!("playlist-{}", Uuid::new_v4().simple());
            if !self.playlists.contains(&candidate) {
                break candidate;
            }
        };
        self.create_playlist(&name)
    }

    /// Look up a playlist created by this engine.
    pub fn playlist(&self, name: &str) -> Result<PlaylistHandle> {
        Playlist::get(&self.playlists, name)
    }

    pub fn playlists(&self) -> &PlaylistRegistry {
        &self.playlists
    }

    /// Completion events waiting for the next `update`.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Whether completions are being deferred by the advance budget. Cleared
    /// once an `update` drains the queue.
    pub fn is_backlogged(&self) -> bool {
        self.backlogged
    }

    /// Start (or advance) the named playlist.
    ///
    /// Fails with [`AudioError::PlaylistBusy`] while the caller holds a borrow
    /// of that playlist.
    pub fn play_playlist(&mut self, name: &str) -> Result<()> {
        let handle = self.playlist(name)?;
        let mut playlist = handle.try_borrow_mut().map_err(|_| AudioError::PlaylistBusy {
            name: name.to_string(),
        })?;
        let mut builder = GainBuilder {
            backend: &mut *self.backend,
            gain: self.master_gain,
        };
        playlist.play_next(&mut builder);
        Ok(())
    }

    /// Stop the named playlist without advancing it.
    pub fn stop_playlist(&mut self, name: &str) -> Result<()> {
        let handle = self.playlist(name)?;
        let mut playlist = handle.try_borrow_mut().map_err(|_| AudioError::PlaylistBusy {
            name: name.to_string(),
        })?;
        playlist.stop();
        Ok(())
    }

    /// Per-frame tick: pump the backend, then advance every playlist whose
    /// track finished.
    ///
    /// The backend pump is skipped for this frame while the caller holds the
    /// listener mutably; completions already queued are still handled.
    pub fn update(&mut self) {
        match self.listener.try_borrow() {
            Ok(listener) => self.backend.update(&*listener),
            Err(_) => warn!("Listener is borrowed, backend update skipped this frame"),
        }
        self.dispatch_events();
    }

    /// Drain completion events iteratively. At most `max_advances_per_update`
    /// advances run per call; the rest wait for the next update.
    fn dispatch_events(&mut self) {
        let mut advances = 0;
        while !self.events.is_empty() {
            if advances >= self.max_advances_per_update {
                if !self.backlogged {
                    warn!(
                        "Advance budget of {} reached, {} completion(s) deferred",
                        self.max_advances_per_update,
                        self.events.len()
                    );
                }
                self.backlogged = true;
                return;
            }
            let Some(AudioEvent::SoundFinished {
                playlist: name,
                generation,
            }) = self.events.pop()
            else {
                break;
            };

            let Ok(playlist) = self.playlists.get(&name) else {
                warn!("Completion for unknown playlist '{name}' dropped");
                continue;
            };
            let Ok(mut playlist_mut) = playlist.try_borrow_mut() else {
                // Caller holds the playlist; retry next update.
                self.events.post(AudioEvent::SoundFinished {
                    playlist: name,
                    generation,
                });
                break;
            };
            if !playlist_mut.accepts_completion(generation) {
                debug!("Stale completion for playlist '{name}' ignored");
                continue;
            }

            let mut builder = GainBuilder {
                backend: &mut *self.backend,
                gain: self.master_gain,
            };
            playlist_mut.sound_finished(&mut builder);
            advances += 1;
        }
        if self.backlogged && self.events.is_empty() {
            debug!("Completion backlog cleared");
            self.backlogged = false;
        }
    }

    /// Diagnostic: play `file` once per listener offset in
    /// [`TEST_AUDIO_OFFSETS`] to exercise positioning.
    ///
    /// The source is kept as the engine's music source, so `close` stops it.
    ///
    /// Fails with [`AudioError::ListenerBusy`] while the caller holds a borrow
    /// of the listener; nothing is created in that case.
    pub fn test_audio(&mut self, file: &str) -> Result<()> {
        let handle = Rc::clone(&self.listener);
        let mut listener = handle
            .try_borrow_mut()
            .map_err(|_| AudioError::ListenerBusy)?;
        let mut source = self.create_sound(file)?;
        for offset in TEST_AUDIO_OFFSETS {
            listener.set_position(offset);
            source.play();
        }
        let mut previous = std::mem::replace(&mut self.music_playing, source);
        previous.stop();
        previous.delete();
        Ok(())
    }

    /// Stop the engine's music source, then tear down the backend, in that
    /// order, on every call.
    pub fn close(&mut self) -> Result<()> {
        info!("Closing audio engine...");
        self.music_playing.stop();
        let result = self.backend.close_impl();
        self.closed = true;
        info!("Audio engine closed.");
        result
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl SoundBuilder for AudioEngine {
    fn create_sound(&mut self, file: &str) -> Result<Box<dyn SoundSource>> {
        GainBuilder {
            backend: &mut *self.backend,
            gain: self.master_gain,
        }
        .create_sound(file)
    }

    fn create_audio(&mut self, file: &AudioFile) -> Result<Box<dyn SoundSource>> {
        GainBuilder {
            backend: &mut *self.backend,
            gain: self.master_gain,
        }
        .create_audio(file)
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        if !self.closed
            && let Err(e) = self.close()
        {
            warn!("Audio engine did not close cleanly: {e}");
        }
    }
}
