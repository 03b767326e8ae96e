use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};

use crate::error::{AudioError, Result};
use crate::event::{EventQueue, PlaylistNotifier};
use crate::music::Music;
use crate::registry::NamedRegistry;
use crate::source::{EmptySoundSource, SoundBuilder, SoundSource};

/// Shared handle to a registered playlist.
pub type PlaylistHandle = Rc<RefCell<Playlist>>;

/// Registry holding every playlist created by an engine.
pub type PlaylistRegistry = NamedRegistry<RefCell<Playlist>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistState {
    /// Nothing requested yet, stopped, or the last advance could not start
    /// a track.
    Idle,
    /// A source is playing and subscribed for completion.
    Playing,
}

/// Ordered list of music played one after the other, wrapping around at the
/// end.
///
/// The playlist owns at most one live source at a time. Every advance stops
/// the current source first, then asks the [`SoundBuilder`] for the next
/// track. If the builder fails, the cursor stays where it was so the same
/// track is retried on the next advance.
pub struct Playlist {
    name: String,
    musics: Vec<Music>,
    /// Index of the next track to play.
    current: usize,
    current_stream: Box<dyn SoundSource>,
    /// Index of the track behind `current_stream` while it plays.
    playing: Option<usize>,
    /// Bumped whenever `current_stream` stops being the live source, so late
    /// completion events can be told apart.
    generation: u64,
    events: EventQueue,
}

impl Playlist {
    /// Build a playlist and register it under `name`.
    pub fn create(
        name: &str,
        registry: &mut PlaylistRegistry,
        events: EventQueue,
    ) -> Result<PlaylistHandle> {
        if name.is_empty() {
            return Err(AudioError::InvalidName(name.to_string()));
        }
        let playlist = Rc::new(RefCell::new(Playlist {
            name: name.to_string(),
            musics: Vec::new(),
            current: 0,
            current_stream: Box::new(EmptySoundSource),
            playing: None,
            generation: 0,
            events,
        }));
        registry.register(name, Rc::clone(&playlist))?;
        Ok(playlist)
    }

    /// Retrieve a playlist from its unique name.
    pub fn get(registry: &PlaylistRegistry, name: &str) -> Result<PlaylistHandle> {
        registry.get(name)
    }

    /// Append a track. Allowed while playing; takes effect when the cursor
    /// reaches it.
    pub fn add_music(&mut self, music: Music) -> &mut Self {
        self.musics.push(music);
        self
    }

    /// Stop the current track and start the next one.
    pub fn play_next(&mut self, builder: &mut dyn SoundBuilder) {
        self.halt();
        if self.musics.is_empty() {
            return;
        }

        let index = self.current % self.musics.len();
        let music = &self.musics[index];
        match builder.create_audio(music.audio_file()) {
            Ok(source) => {
                let mut previous = std::mem::replace(&mut self.current_stream, source);
                previous.delete();

                self.current_stream
                    .add_end_play_listener(Box::new(PlaylistNotifier {
                        playlist: self.name.clone(),
                        generation: self.generation,
                        queue: self.events.clone(),
                    }));
                self.current_stream.play();
                self.playing = Some(index);
                self.current = (index + 1) % self.musics.len();
                debug!(
                    "Playlist '{}': playing '{}' ({}/{})",
                    self.name,
                    music.name(),
                    index + 1,
                    self.musics.len()
                );
            }
            Err(e) => {
                error!("Playlist '{}': error creating audio: {e}", self.name);
            }
        }
    }

    /// Completion handler: advance exactly like [`Playlist::play_next`].
    pub fn sound_finished(&mut self, builder: &mut dyn SoundBuilder) {
        self.play_next(builder);
    }

    /// Stop the current track without moving the cursor.
    pub fn stop(&mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.current_stream.stop();
        self.playing = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether a completion for `generation` refers to the live source.
    pub(crate) fn accepts_completion(&self, generation: u64) -> bool {
        self.playing.is_some() && self.generation == generation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn musics(&self) -> &[Music] {
        &self.musics
    }

    pub fn len(&self) -> usize {
        self.musics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.musics.is_empty()
    }

    /// Index of the track the next advance will play.
    pub fn current_index(&self) -> usize {
        if self.musics.is_empty() {
            0
        } else {
            self.current % self.musics.len()
        }
    }

    pub fn state(&self) -> PlaylistState {
        if self.playing.is_some() {
            PlaylistState::Playing
        } else {
            PlaylistState::Idle
        }
    }

    pub fn now_playing(&self) -> Option<&Music> {
        self.playing.and_then(|index| self.musics.get(index))
    }
}
