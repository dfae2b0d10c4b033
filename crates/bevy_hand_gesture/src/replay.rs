//! Replay of recorded landmark frames from a RON file.
//!
//! Stands in for a live detector: a background thread pushes the recorded
//! frames into a [`LandmarkSender`] at a fixed cadence.

use std::fmt;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::feed::{LandmarkFrame, LandmarkSender};
use crate::landmarks::HandLandmarks;

fn default_frame_interval_ms() -> u64 {
    33
}

/// A recorded landmark stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkRecording {
    /// Delay between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Start over after the last frame.
    #[serde(default)]
    pub looping: bool,
    /// One entry per video frame; `None` means no hand was detected.
    pub frames: Vec<Option<HandLandmarks>>,
}

#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Empty,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "could not read recording: {e}"),
            Self::Parse(e) => write!(f, "could not parse recording: {e}"),
            Self::Empty => write!(f, "recording has no frames"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Empty => None,
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ron::error::SpannedError> for ReplayError {
    fn from(e: ron::error::SpannedError) -> Self {
        Self::Parse(e)
    }
}

impl LandmarkRecording {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let recording: Self = ron::from_str(text)?;
        if recording.frames.is_empty() {
            return Err(ReplayError::Empty);
        }
        Ok(recording)
    }

    /// Timestamped frames for one pass, starting after `start` seconds.
    pub fn timestamped(&self, start: f64) -> impl Iterator<Item = LandmarkFrame> + '_ {
        let step = self.frame_interval_ms as f64 / 1000.0;
        self.frames
            .iter()
            .enumerate()
            .map(move |(i, hand)| LandmarkFrame {
                timestamp: start + (i + 1) as f64 * step,
                hand: *hand,
            })
    }

    /// Stream the recording into `sender` from a background thread. The
    /// thread ends when the recording finishes (non-looping) or when the
    /// receiving side is closed.
    pub fn play(self, sender: LandmarkSender) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("landmark-replay".to_string())
            .spawn(move || {
                let interval = Duration::from_millis(self.frame_interval_ms);
                let pass_length = self.frames.len() as f64 * self.frame_interval_ms as f64 / 1000.0;
                let mut start = 0.0;
                loop {
                    for frame in self.timestamped(start) {
                        if sender.send(frame).is_err() {
                            return;
                        }
                        thread::sleep(interval);
                    }
                    if !self.looping {
                        return;
                    }
                    start += pass_length;
                }
            })
    }
}
