//! Scripted in-memory backend shared by the integration tests.
//!
//! Every backend interaction is appended to a shared log so tests can check
//! ordering. Tests decide which files fail to load, which finish on the next
//! `update`, and which finish the moment they start.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use cadence_audio::{
    AudioBackend, AudioConfig, AudioEngineProvider, AudioError, AudioFile, EndPlayListener,
    Listener, Point3D, ResourcePath, Result, SoundBuilder, SoundSource,
};

#[derive(Default)]
pub struct Script {
    pub log: Vec<String>,
    /// Files `create_sound` refuses.
    pub failing: HashSet<String>,
    /// Files that complete synchronously inside `play`.
    pub immediate: HashSet<String>,
    /// Files that complete on the next backend update.
    pub finish_next_update: HashSet<String>,
    /// Resource paths the backend refuses.
    pub rejected_paths: HashSet<String>,
    pub resource_paths: Vec<ResourcePath>,
    pub updates: usize,
}

pub type SharedScript = Rc<RefCell<Script>>;

pub fn script() -> SharedScript {
    Rc::new(RefCell::new(Script::default()))
}

/// Entries of the log starting with `prefix`, prefix stripped.
pub fn entries(script: &SharedScript, prefix: &str) -> Vec<String> {
    script
        .borrow()
        .log
        .iter()
        .filter_map(|entry| entry.strip_prefix(prefix).map(str::to_string))
        .collect()
}

struct SourceState {
    file: String,
    playing: bool,
    listeners: Vec<Box<dyn EndPlayListener>>,
}

pub struct ScriptedSource {
    state: Rc<RefCell<SourceState>>,
    script: SharedScript,
}

impl ScriptedSource {
    fn log(&self, entry: String) {
        self.script.borrow_mut().log.push(entry);
    }

    fn file(&self) -> String {
        self.state.borrow().file.clone()
    }
}

impl SoundSource for ScriptedSource {
    fn play(&mut self) {
        let file = self.file();
        self.log(format!("play {file}"));
        self.state.borrow_mut().playing = true;

        if self.script.borrow().immediate.contains(&file) {
            let listeners = {
                let mut state = self.state.borrow_mut();
                state.playing = false;
                std::mem::take(&mut state.listeners)
            };
            for listener in &listeners {
                listener.sound_finished();
            }
        }
    }

    fn stop(&mut self) {
        let file = self.file();
        self.log(format!("stop {file}"));
        self.state.borrow_mut().playing = false;
    }

    fn loop_playback(&mut self) {
        let file = self.file();
        self.log(format!("loop {file}"));
    }

    fn rewind(&mut self) {
        let file = self.file();
        self.log(format!("rewind {file}"));
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn set_position(&mut self, position: Point3D) {
        let file = self.file();
        self.log(format!(
            "position {file} {},{},{}",
            position.x, position.y, position.z
        ));
    }

    fn set_gain(&mut self, gain: f32) {
        let file = self.file();
        self.log(format!("gain {file} {gain:.2}"));
    }

    fn add_end_play_listener(&mut self, listener: Box<dyn EndPlayListener>) {
        self.state.borrow_mut().listeners.push(listener);
    }

    fn delete(&mut self) {
        let file = self.file();
        self.log(format!("delete {file}"));
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.listeners.clear();
    }
}

pub struct ScriptedBackend {
    script: SharedScript,
    sources: Vec<Rc<RefCell<SourceState>>>,
}

impl ScriptedBackend {
    pub fn new(script: SharedScript) -> Self {
        Self {
            script,
            sources: Vec::new(),
        }
    }
}

impl SoundBuilder for ScriptedBackend {
    fn create_sound(&mut self, file: &str) -> Result<Box<dyn SoundSource>> {
        self.script.borrow_mut().log.push(format!("create {file}"));
        if self.script.borrow().failing.contains(file) {
            return Err(AudioError::sound_creation(file, "scripted failure"));
        }
        let state = Rc::new(RefCell::new(SourceState {
            file: file.to_string(),
            playing: false,
            listeners: Vec::new(),
        }));
        self.sources.push(Rc::clone(&state));
        Ok(Box::new(ScriptedSource {
            state,
            script: Rc::clone(&self.script),
        }))
    }

    fn create_audio(&mut self, file: &AudioFile) -> Result<Box<dyn SoundSource>> {
        if file.is_vfs() {
            self.script
                .borrow_mut()
                .log
                .push(format!("open vfs {}", file.name()));
        }
        self.create_sound(file.name())
    }
}

impl AudioBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn add_resource_path(&mut self, path: &ResourcePath) -> Result<()> {
        if self.script.borrow().rejected_paths.contains(&path.path) {
            return Err(AudioError::resource_path(&path.path, "scripted rejection"));
        }
        self.script.borrow_mut().resource_paths.push(path.clone());
        Ok(())
    }

    fn update(&mut self, listener: &dyn Listener) {
        let position = listener.position();
        let finishing = {
            let mut script = self.script.borrow_mut();
            script.updates += 1;
            script.log.push(format!(
                "update {},{},{}",
                position.x, position.y, position.z
            ));
            std::mem::take(&mut script.finish_next_update)
        };

        let mut fired = Vec::new();
        for source in &self.sources {
            let mut state = source.borrow_mut();
            if state.playing && finishing.contains(&state.file) {
                state.playing = false;
                fired.push(std::mem::take(&mut state.listeners));
            }
        }
        for listener in fired.iter().flatten() {
            listener.sound_finished();
        }
    }

    fn close_impl(&mut self) -> Result<()> {
        self.script.borrow_mut().log.push("close_impl".to_string());
        Ok(())
    }
}

pub struct ScriptedProvider {
    pub script: SharedScript,
}

impl AudioEngineProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn create_backend(&self, _config: &AudioConfig) -> Result<Box<dyn AudioBackend>> {
        Ok(Box::new(ScriptedBackend::new(Rc::clone(&self.script))))
    }
}

/// Listener that logs every move into the script.
pub struct RecordingListener {
    pub script: SharedScript,
    pub position: Point3D,
}

impl Listener for RecordingListener {
    fn position(&self) -> Point3D {
        self.position
    }

    fn set_position(&mut self, position: Point3D) {
        self.script.borrow_mut().log.push(format!(
            "listener {},{},{}",
            position.x, position.y, position.z
        ));
        self.position = position;
    }

    fn direction(&self) -> Point3D {
        Point3D::BASE_DIRECTION
    }

    fn set_direction(&mut self, _direction: Point3D) {}
}
