//! External collaborators the engine calls into
//!
//! The engine owns no visual or audio state. It asks an [`AnimationPort`] to
//! play animations (correlated by [`TileId`]) and an [`AudioPort`] to play
//! cues, and only ever waits on the returned completion handles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::completion::{completion_pair, Completer, CompletionHandle};
use crate::types::{Pos, TileId};

/// View layer contract
pub trait AnimationPort {
    /// Slide a tile between two positions
    fn request_move(&mut self, tile: TileId, from: Pos, to: Pos) -> CompletionHandle;

    /// Play the destroy effect for a tile that was just cleared from `at`
    fn request_destroy(&mut self, tile: TileId, at: Pos) -> CompletionHandle;

    /// Show a new tile at `spawn`; it belongs in `target`
    fn request_spawn(&mut self, tile: TileId, spawn: Pos, target: Pos) -> CompletionHandle;
}

impl<A: AnimationPort + ?Sized> AnimationPort for Box<A> {
    fn request_move(&mut self, tile: TileId, from: Pos, to: Pos) -> CompletionHandle {
        (**self).request_move(tile, from, to)
    }

    fn request_destroy(&mut self, tile: TileId, at: Pos) -> CompletionHandle {
        (**self).request_destroy(tile, at)
    }

    fn request_spawn(&mut self, tile: TileId, spawn: Pos, target: Pos) -> CompletionHandle {
        (**self).request_spawn(tile, spawn, target)
    }
}

/// Score cue; `is_combo` is true from the second chained pass on
pub trait AudioPort {
    fn play_score(&mut self, is_combo: bool);
}

/// One animation request as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationRequest {
    Move { tile: TileId, from: Pos, to: Pos },
    Destroy { tile: TileId, at: Pos },
    Spawn { tile: TileId, spawn: Pos, target: Pos },
}

/// Headless view: every animation finishes immediately
#[derive(Debug, Clone, Default)]
pub struct InstantAnimations {
    requests: usize,
}

impl InstantAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far
    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl AnimationPort for InstantAnimations {
    fn request_move(&mut self, _tile: TileId, _from: Pos, _to: Pos) -> CompletionHandle {
        self.requests += 1;
        CompletionHandle::ready()
    }

    fn request_destroy(&mut self, _tile: TileId, _at: Pos) -> CompletionHandle {
        self.requests += 1;
        CompletionHandle::ready()
    }

    fn request_spawn(&mut self, _tile: TileId, _spawn: Pos, _target: Pos) -> CompletionHandle {
        self.requests += 1;
        CompletionHandle::ready()
    }
}

#[derive(Debug, Default)]
struct ManualInner {
    log: Vec<AnimationRequest>,
    pending: Vec<Completer>,
}

/// View whose animations finish only when the host says so.
///
/// Clones share state, so a host can hand one clone to the engine and keep
/// another to finish animations from its own frame loop.
#[derive(Debug, Clone, Default)]
pub struct ManualAnimations {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first
    pub fn log(&self) -> Vec<AnimationRequest> {
        self.inner.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.inner.borrow_mut().log.clear();
    }

    /// Animations not yet finished
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Finish the oldest pending animation
    pub fn complete_one(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.is_empty() {
            return false;
        }
        inner.pending.remove(0).complete();
        true
    }

    /// Finish every pending animation, returning how many there were
    pub fn complete_all(&self) -> usize {
        let drained: Vec<Completer> = self.inner.borrow_mut().pending.drain(..).collect();
        let n = drained.len();
        for c in drained {
            c.complete();
        }
        n
    }

    fn record(&self, request: AnimationRequest) -> CompletionHandle {
        let (completer, handle) = completion_pair();
        let mut inner = self.inner.borrow_mut();
        inner.log.push(request);
        inner.pending.push(completer);
        handle
    }
}

impl AnimationPort for ManualAnimations {
    fn request_move(&mut self, tile: TileId, from: Pos, to: Pos) -> CompletionHandle {
        self.record(AnimationRequest::Move { tile, from, to })
    }

    fn request_destroy(&mut self, tile: TileId, at: Pos) -> CompletionHandle {
        self.record(AnimationRequest::Destroy { tile, at })
    }

    fn request_spawn(&mut self, tile: TileId, spawn: Pos, target: Pos) -> CompletionHandle {
        self.record(AnimationRequest::Spawn {
            tile,
            spawn,
            target,
        })
    }
}

/// Audio port that records cues (`true` for combo cues)
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    cues: Rc<RefCell<Vec<bool>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<bool> {
        self.cues.borrow().clone()
    }
}

impl AudioPort for RecordingAudio {
    fn play_score(&mut self, is_combo: bool) {
        self.cues.borrow_mut().push(is_combo);
    }
}
