//! Landmark frames handed over from a detector thread.
//!
//! Hand detection runs on its own cadence (camera frame rate, model latency)
//! and pushes frames into a channel. The frame loop drains that channel once
//! per update, so the only shared state is the channel itself.

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use serde::{Deserialize, Serialize};

use crate::landmarks::{GestureReading, HandLandmarks};

/// One detector result. `hand` is `None` when no hand was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Source video timestamp in seconds.
    pub timestamp: f64,
    #[serde(default)]
    pub hand: Option<HandLandmarks>,
}

pub type LandmarkSender = Sender<LandmarkFrame>;

/// Readiness of the gesture subsystem. Rendering never depends on it.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum GestureStatus {
    /// No detector connected, or connected but no frame seen yet.
    #[default]
    NotReady,
    Ready,
    /// The detector side hung up.
    Disconnected,
    Failed(String),
}

impl GestureStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn label(&self) -> String {
        match self {
            Self::NotReady => "Gesture: not ready".to_string(),
            Self::Ready => "Gesture: tracking".to_string(),
            Self::Disconnected => "Gesture: disconnected".to_string(),
            Self::Failed(reason) => format!("Gesture: failed ({reason})"),
        }
    }
}

/// A freshly observed hand frame, after duplicate suppression.
#[derive(Message, Debug, Clone)]
pub struct HandFrame {
    pub timestamp: f64,
    pub reading: Option<GestureReading>,
}

/// Emitted whenever [`GestureStatus`] changes.
#[derive(Message, Debug, Clone)]
pub struct GestureStatusChanged {
    pub status: GestureStatus,
}

/// Receiving end of the detector channel.
#[derive(Resource, Default)]
pub struct LandmarkFeed {
    receiver: Option<Receiver<LandmarkFrame>>,
    last_timestamp: Option<f64>,
}

/// Result of draining the feed once.
#[derive(Debug, Default)]
pub struct FeedPoll {
    pub frames: Vec<LandmarkFrame>,
    pub disconnected: bool,
}

impl LandmarkFeed {
    /// Open a new channel, replacing any previous one. The detector keeps the
    /// returned sender; dropping it marks the feed disconnected.
    pub fn connect(&mut self) -> LandmarkSender {
        let (sender, receiver) = unbounded();
        self.receiver = Some(receiver);
        self.last_timestamp = None;
        sender
    }

    /// Drop the receiver. Any detector still sending will see a send error
    /// and can stop.
    pub fn close(&mut self) {
        self.receiver = None;
    }

    pub fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    /// Take every pending frame whose timestamp differs from the one before it.
    pub fn drain(&mut self) -> FeedPoll {
        let mut poll = FeedPoll::default();
        let Some(receiver) = self.receiver.clone() else {
            return poll;
        };

        loop {
            match receiver.try_recv() {
                Ok(frame) => {
                    if self.accept(frame.timestamp) {
                        poll.frames.push(frame);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    poll.disconnected = true;
                    break;
                }
            }
        }
        poll
    }

    fn accept(&mut self, timestamp: f64) -> bool {
        if self.last_timestamp == Some(timestamp) {
            return false;
        }
        self.last_timestamp = Some(timestamp);
        true
    }
}

/// Drain the detector channel and publish one [`HandFrame`] per new frame.
pub fn poll_landmark_feed(
    mut feed: ResMut<LandmarkFeed>,
    mut status: ResMut<GestureStatus>,
    mut frames: MessageWriter<HandFrame>,
) {
    if !feed.is_connected() {
        return;
    }

    let poll = feed.drain();
    if !poll.frames.is_empty() {
        status.set_if_neq(GestureStatus::Ready);
    }
    for frame in poll.frames {
        frames.write(HandFrame {
            timestamp: frame.timestamp,
            reading: frame.hand.map(|hand| hand.read()),
        });
    }

    if poll.disconnected {
        feed.close();
        status.set_if_neq(GestureStatus::Disconnected);
    }
}

/// Log status transitions and forward them to whoever listens.
pub fn announce_status_changes(
    status: Res<GestureStatus>,
    mut last: Local<Option<GestureStatus>>,
    mut changed: MessageWriter<GestureStatusChanged>,
) {
    if last.as_ref() == Some(&*status) {
        return;
    }
    match &*status {
        GestureStatus::Failed(reason) => warn!("Gesture input unavailable: {}", reason),
        other => info!("{}", other.label()),
    }
    changed.write(GestureStatusChanged {
        status: status.clone(),
    });
    *last = Some(status.clone());
}
