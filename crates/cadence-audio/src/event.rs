//! Completion events posted by backends and drained by the engine.
//!
//! A source never calls back into a playlist directly. Its listener posts an
//! [`AudioEvent`] into a shared [`EventQueue`] instead, and the engine drains
//! that queue in a loop after each backend pump, so a chain of sources that
//! finish immediately never nests calls.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::source::EndPlayListener;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The source a playlist started for `generation` finished on its own.
    SoundFinished { playlist: String, generation: u64 },
}

/// Single-threaded FIFO shared between the engine and the listeners it hands
/// out. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<AudioEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, event: AudioEvent) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<AudioEvent> {
        self.events.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Listener a playlist attaches to each source it starts.
pub(crate) struct PlaylistNotifier {
    pub(crate) playlist: String,
    pub(crate) generation: u64,
    pub(crate) queue: EventQueue,
}

impl EndPlayListener for PlaylistNotifier {
    fn sound_finished(&self) {
        self.queue.post(AudioEvent::SoundFinished {
            playlist: self.playlist.clone(),
            generation: self.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_queue() {
        let queue = EventQueue::new();
        let notifier = PlaylistNotifier {
            playlist: "bgm".to_string(),
            generation: 3,
            queue: queue.clone(),
        };

        notifier.sound_finished();
        notifier.sound_finished();

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.pop(),
            Some(AudioEvent::SoundFinished {
                playlist: "bgm".to_string(),
                generation: 3,
            })
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pop_on_empty_queue() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
