//! Capability contracts backends implement for playable sounds.

use crate::error::Result;
use crate::file::AudioFile;
use crate::geometry::Point3D;

/// Receives a notification when a source finishes playing on its own.
///
/// Backends call [`EndPlayListener::sound_finished`] once per natural
/// completion, normally from inside their `update` pump (a source that ends
/// immediately may report from `play`). Stopping a source explicitly does not
/// count as a completion.
pub trait EndPlayListener {
    fn sound_finished(&self);
}

/// A playable sound handle owned by whoever created it.
pub trait SoundSource {
    /// Start (or restart) playback.
    fn play(&mut self);

    /// Stop playback. Safe to call on a source that is not playing.
    fn stop(&mut self);

    /// Keep playing from the start until [`SoundSource::stop`] is called.
    fn loop_playback(&mut self);

    /// Move the playback position back to the beginning.
    fn rewind(&mut self);

    /// True while the source is playing or paused.
    fn is_playing(&self) -> bool;

    /// Place the source in 3D space.
    fn set_position(&mut self, position: Point3D);

    /// Linear gain, 0.0 (silent) to 1.0 (unchanged).
    fn set_gain(&mut self, gain: f32);

    /// Subscribe to natural completion of this source.
    fn add_end_play_listener(&mut self, listener: Box<dyn EndPlayListener>);

    /// Release the backend resources held by this source. The source must
    /// not be played again afterwards.
    fn delete(&mut self);
}

/// Turns a file reference into a playable source.
pub trait SoundBuilder {
    /// Fails with [`crate::AudioError::SoundCreation`] when the backend cannot
    /// materialize the resource (missing file, decode failure, resource limit).
    fn create_sound(&mut self, file: &str) -> Result<Box<dyn SoundSource>>;

    /// Like [`SoundBuilder::create_sound`], for a file whose storage kind is
    /// known. Backends that cannot read a kind reject it here.
    fn create_audio(&mut self, file: &AudioFile) -> Result<Box<dyn SoundSource>> {
        self.create_sound(file.name())
    }
}

/// Inert source: every operation is accepted and ignored.
///
/// Stands in wherever "no sound yet" must still be stoppable, and is what the
/// dummy backend hands out.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySoundSource;

impl SoundSource for EmptySoundSource {
    fn play(&mut self) {}
    fn stop(&mut self) {}
    fn loop_playback(&mut self) {}
    fn rewind(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }

    fn set_position(&mut self, _position: Point3D) {}
    fn set_gain(&mut self, _gain: f32) {}

    // Never completes, so listeners are dropped right away.
    fn add_end_play_listener(&mut self, _listener: Box<dyn EndPlayListener>) {}

    fn delete(&mut self) {}
}
