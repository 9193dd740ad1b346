//! Fixed-rate playback driver.
//!
//! The host calls [`PlaybackDriver::tick`] with wall-clock deltas; the driver turns them into
//! whole frame steps at the timeline's fps and clamps or wraps at the total duration.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Stop,
    Seek { frame: u32 },
    SetLoopMode { mode: LoopMode },
}

/// Discrete signals emitted by commands and ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackEvent {
    Started { frame: u32 },
    Resumed { frame: u32 },
    Paused { frame: u32 },
    Stopped,
    FrameChanged { old_frame: u32, new_frame: u32 },
    Looped,
    Ended { frame: u32 },
}

#[derive(Clone, Debug)]
pub struct PlaybackDriver {
    fps: u32,
    total_frames: u32,
    frame: u32,
    state: PlaybackState,
    mode: LoopMode,
    accumulator: f64,
}

impl PlaybackDriver {
    pub fn new(fps: u32, total_frames: u32) -> Self {
        Self {
            fps: fps.max(1),
            total_frames,
            frame: 0,
            state: PlaybackState::Stopped,
            mode: LoopMode::Once,
            accumulator: 0.0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    fn last_frame(&self) -> u32 {
        self.total_frames.saturating_sub(1)
    }

    /// Update the total after timeline edits; the current frame is clamped into range.
    pub fn set_total_frames(&mut self, total_frames: u32) {
        self.total_frames = total_frames;
        self.frame = self.frame.min(self.last_frame());
    }

    pub fn apply(&mut self, cmd: PlaybackCommand) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        match cmd {
            PlaybackCommand::Play => match self.state {
                PlaybackState::Playing => {}
                PlaybackState::Paused => {
                    self.state = PlaybackState::Playing;
                    events.push(PlaybackEvent::Resumed { frame: self.frame });
                }
                PlaybackState::Stopped => {
                    if self.frame >= self.last_frame() && self.mode == LoopMode::Once {
                        self.frame = 0;
                    }
                    self.accumulator = 0.0;
                    self.state = PlaybackState::Playing;
                    events.push(PlaybackEvent::Started { frame: self.frame });
                }
            },
            PlaybackCommand::Pause => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Paused;
                    events.push(PlaybackEvent::Paused { frame: self.frame });
                }
            }
            PlaybackCommand::Stop => {
                let old = self.frame;
                self.state = PlaybackState::Stopped;
                self.frame = 0;
                self.accumulator = 0.0;
                events.push(PlaybackEvent::Stopped);
                if old != 0 {
                    events.push(PlaybackEvent::FrameChanged { old_frame: old, new_frame: 0 });
                }
            }
            PlaybackCommand::Seek { frame } => {
                let old = self.frame;
                self.frame = frame.min(self.last_frame());
                self.accumulator = 0.0;
                if old != self.frame {
                    events.push(PlaybackEvent::FrameChanged {
                        old_frame: old,
                        new_frame: self.frame,
                    });
                }
            }
            PlaybackCommand::SetLoopMode { mode } => self.mode = mode,
        }
        events
    }

    /// Advance by `dt` seconds of wall-clock time.
    pub fn tick(&mut self, dt: f64) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if self.state != PlaybackState::Playing || self.total_frames == 0 || !(dt > 0.0) {
            return events;
        }
        self.accumulator += dt * self.fps as f64;
        let steps = self.accumulator.floor();
        if steps < 1.0 {
            return events;
        }
        self.accumulator -= steps;

        let old = self.frame;
        let target = old as u64 + steps as u64;
        let last = self.last_frame() as u64;
        if target <= last {
            self.frame = target as u32;
        } else {
            match self.mode {
                LoopMode::Once => {
                    self.frame = last as u32;
                    self.state = PlaybackState::Stopped;
                    self.accumulator = 0.0;
                    events.push(PlaybackEvent::Ended { frame: self.frame });
                }
                LoopMode::Loop => {
                    self.frame = (target % self.total_frames as u64) as u32;
                    events.push(PlaybackEvent::Looped);
                }
            }
        }
        if old != self.frame {
            events.insert(
                0,
                PlaybackEvent::FrameChanged {
                    old_frame: old,
                    new_frame: self.frame,
                },
            );
        }
        events
    }
}
