//! Kira-based backend for real-time playback.
//!
//! Sounds are decoded up front into `StaticSoundData` and played through a
//! shared `AudioManager`. Completion is detected by polling handles in
//! `update`, which is where end-play listeners fire.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use kira::sound::PlaybackState;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};
use log::{debug, info, warn};

use crate::backend::{AudioBackend, AudioEngineProvider};
use crate::config::AudioConfig;
use crate::error::{AudioError, Result};
use crate::file::{AudioFile, ResourcePath};
use crate::geometry::Point3D;
use crate::listener::Listener;
use crate::source::{EndPlayListener, SoundBuilder, SoundSource};

pub const PROVIDER_NAME: &str = "kira";

const VFS_UNSUPPORTED: &str = "virtual filesystems are not supported by the kira backend";

type SharedManager = Rc<RefCell<AudioManager<DefaultBackend>>>;

/// Convert a linear gain (0.0 - 1.0) to Kira's decibel volume.
fn gain_to_decibels(gain: f32) -> Decibels {
    if gain <= 0.001 {
        Decibels::SILENCE
    } else {
        Decibels(20.0 * gain.log10())
    }
}

/// Playback state shared by a source and the backend that polls it.
struct Voice {
    file: String,
    data: StaticSoundData,
    handle: Option<StaticSoundHandle>,
    gain: f32,
    looping: bool,
    position: Point3D,
    /// Set by `play`, cleared by `stop` or once completion has been reported.
    active: bool,
    deleted: bool,
    listeners: Vec<Box<dyn EndPlayListener>>,
}

impl Voice {
    fn stop_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
        }
    }

    /// Report a natural end of playback once.
    fn take_finished(&mut self) -> Option<Vec<Box<dyn EndPlayListener>>> {
        let finished = self.active
            && self
                .handle
                .as_ref()
                .is_some_and(|handle| handle.state() == PlaybackState::Stopped);
        if !finished {
            return None;
        }
        self.active = false;
        self.handle = None;
        Some(std::mem::take(&mut self.listeners))
    }
}

pub struct KiraSoundSource {
    voice: Rc<RefCell<Voice>>,
    manager: SharedManager,
}

impl SoundSource for KiraSoundSource {
    fn play(&mut self) {
        let mut voice = self.voice.borrow_mut();
        if voice.deleted {
            warn!("Ignoring play on deleted sound '{}'", voice.file);
            return;
        }
        voice.stop_handle();

        let mut data = voice.data.clone().volume(gain_to_decibels(voice.gain));
        if voice.looping {
            data = data.loop_region(0.0..);
        }
        match self.manager.borrow_mut().play(data) {
            Ok(handle) => {
                voice.handle = Some(handle);
                voice.active = true;
            }
            Err(e) => warn!("Failed to play sound '{}': {e:?}", voice.file),
        }
    }

    fn stop(&mut self) {
        let mut voice = self.voice.borrow_mut();
        voice.active = false;
        voice.stop_handle();
    }

    fn loop_playback(&mut self) {
        let mut voice = self.voice.borrow_mut();
        voice.looping = true;
        if let Some(handle) = voice.handle.as_mut() {
            handle.set_loop_region(0.0..);
        }
    }

    fn rewind(&mut self) {
        if let Some(handle) = self.voice.borrow_mut().handle.as_mut() {
            handle.seek_to(0.0);
        }
    }

    fn is_playing(&self) -> bool {
        self.voice
            .borrow()
            .handle
            .as_ref()
            .is_some_and(|handle| handle.state() != PlaybackState::Stopped)
    }

    fn set_position(&mut self, position: Point3D) {
        // Positions are kept for diagnostics; Kira output here is not spatialized.
        self.voice.borrow_mut().position = position;
    }

    fn set_gain(&mut self, gain: f32) {
        let mut voice = self.voice.borrow_mut();
        voice.gain = gain.clamp(0.0, 1.0);
        let volume = gain_to_decibels(voice.gain);
        if let Some(handle) = voice.handle.as_mut() {
            handle.set_volume(volume, Tween::default());
        }
    }

    fn add_end_play_listener(&mut self, listener: Box<dyn EndPlayListener>) {
        self.voice.borrow_mut().listeners.push(listener);
    }

    fn delete(&mut self) {
        let mut voice = self.voice.borrow_mut();
        voice.active = false;
        voice.deleted = true;
        voice.stop_handle();
        voice.listeners.clear();
        debug!("Released sound '{}' at {:?}", voice.file, voice.position);
    }
}

/// Backend playing sounds through Kira.
pub struct KiraAudioBackend {
    manager: SharedManager,
    search_paths: Vec<PathBuf>,
    voices: Vec<Weak<RefCell<Voice>>>,
}

impl KiraAudioBackend {
    /// Create a new backend on the default output device.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::Backend(format!("Failed to create audio manager: {e:?}")))?;
        Ok(Self {
            manager: Rc::new(RefCell::new(manager)),
            search_paths: Vec::new(),
            voices: Vec::new(),
        })
    }

    fn resolve(&self, file: &str) -> Option<PathBuf> {
        let direct = Path::new(file);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.search_paths
            .iter()
            .map(|dir| dir.join(file))
            .find(|candidate| candidate.is_file())
    }

    /// Number of sources still alive.
    pub fn live_sources(&self) -> usize {
        self.voices.iter().filter(|v| v.strong_count() > 0).count()
    }
}

impl SoundBuilder for KiraAudioBackend {
    fn create_sound(&mut self, file: &str) -> Result<Box<dyn SoundSource>> {
        let path = self
            .resolve(file)
            .ok_or_else(|| AudioError::sound_creation(file, "not found in resource paths"))?;
        let data = StaticSoundData::from_file(&path)
            .map_err(|e| AudioError::sound_creation(file, format!("{e:?}")))?;

        let voice = Rc::new(RefCell::new(Voice {
            file: file.to_string(),
            data,
            handle: None,
            gain: 1.0,
            looping: false,
            position: Point3D::ZERO,
            active: false,
            deleted: false,
            listeners: Vec::new(),
        }));
        self.voices.push(Rc::downgrade(&voice));
        Ok(Box::new(KiraSoundSource {
            voice,
            manager: Rc::clone(&self.manager),
        }))
    }

    fn create_audio(&mut self, file: &AudioFile) -> Result<Box<dyn SoundSource>> {
        if file.is_vfs() {
            return Err(AudioError::sound_creation(file.name(), VFS_UNSUPPORTED));
        }
        self.create_sound(file.name())
    }
}

impl AudioBackend for KiraAudioBackend {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn add_resource_path(&mut self, path: &ResourcePath) -> Result<()> {
        if path.is_vfs() {
            return Err(AudioError::resource_path(&path.path, VFS_UNSUPPORTED));
        }
        let dir = PathBuf::from(&path.path);
        if !dir.is_dir() {
            return Err(AudioError::resource_path(&path.path, "not a directory"));
        }
        debug!("Kira: added resource path {}", dir.display());
        self.search_paths.push(dir);
        Ok(())
    }

    fn update(&mut self, _listener: &dyn Listener) {
        self.voices.retain(|voice| voice.strong_count() > 0);

        let mut finished = Vec::new();
        for voice in self.voices.iter().filter_map(Weak::upgrade) {
            if let Some(listeners) = voice.borrow_mut().take_finished() {
                finished.push(listeners);
            }
        }
        // Listeners run after all voices are released from their borrows.
        for listener in finished.iter().flatten() {
            listener.sound_finished();
        }
    }

    fn close_impl(&mut self) -> Result<()> {
        for voice in self.voices.drain(..).filter_map(|v| v.upgrade()) {
            let mut voice = voice.borrow_mut();
            voice.active = false;
            voice.stop_handle();
        }
        info!("Kira backend closed");
        Ok(())
    }
}

/// Provider for [`KiraAudioBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct KiraProvider;

impl AudioEngineProvider for KiraProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn create_backend(&self, _config: &AudioConfig) -> Result<Box<dyn AudioBackend>> {
        Ok(Box::new(KiraAudioBackend::new()?))
    }
}
