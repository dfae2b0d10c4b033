//! # bevy_hand_gesture
//!
//! Turns hand-landmark frames from an external detector into pointer, pinch
//! and open/closed-hand readings.
//!
//! The detector itself is out of scope: anything that can produce 21
//! normalized keypoints per frame can feed [`LandmarkFeed`] through the
//! sender returned by [`LandmarkFeed::connect`]. A RON recording can stand in
//! for a live camera via [`LandmarkRecording`].
//!
//! ```ignore
//! app.add_plugins(HandGesturePlugin);
//!
//! fn read_hands(mut frames: MessageReader<HandFrame>) {
//!     for frame in frames.read() {
//!         if let Some(reading) = frame.reading {
//!             info!("cursor at {:?}", reading.cursor);
//!         }
//!     }
//! }
//! ```

pub mod feed;
pub mod landmarks;
pub mod replay;

pub use feed::{
    FeedPoll, GestureStatus, GestureStatusChanged, HandFrame, LandmarkFeed, LandmarkFrame,
    LandmarkSender,
};
pub use landmarks::{
    GestureReading, HandLandmarks, HandShape, Landmark, FIST_THRESHOLD, OPEN_THRESHOLD,
    PINCH_THRESHOLD,
};
pub use replay::{LandmarkRecording, ReplayError};

use bevy::prelude::*;

/// Systems that drain the feed and publish [`HandFrame`]s. Consumers should
/// run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GestureSystems;

pub struct HandGesturePlugin;

impl Plugin for HandGesturePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<HandFrame>()
            .add_message::<GestureStatusChanged>()
            .init_resource::<LandmarkFeed>()
            .init_resource::<GestureStatus>()
            .add_systems(
                Update,
                (feed::poll_landmark_feed, feed::announce_status_changes)
                    .chain()
                    .in_set(GestureSystems),
            );
    }
}
