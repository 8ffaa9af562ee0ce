//! Input snapshots consumed by the sim, one per tick.
//!
//! The windowing layer (outside this workspace) produces `InputFrame`s;
//! `ScriptedInput` replays a canned sequence for tests and the headless
//! demo.

use std::collections::VecDeque;

/// Key state sampled at a tick boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// Take off / leave (lander), escape (menus).
    pub escape: bool,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn thrusting() -> Self {
        Self {
            thrust: true,
            ..Self::default()
        }
    }

    pub fn turning(left: bool) -> Self {
        Self {
            left,
            right: !left,
            ..Self::default()
        }
    }
}

/// Replays a prepared list of frames, then holds the last one (or idle).
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    hold: InputFrame,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `frame` for the next `ticks` polls.
    pub fn push(&mut self, frame: InputFrame, ticks: usize) {
        for _ in 0..ticks {
            self.frames.push_back(frame);
        }
    }

    pub fn poll(&mut self) -> InputFrame {
        match self.frames.pop_front() {
            Some(frame) => {
                self.hold = frame;
                frame
            }
            None => self.hold,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
