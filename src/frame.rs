//! Per-frame scheduling for the tree scene.
//!
//! Bevy's main loop already runs once per display refresh; this module pins
//! down the order of work inside each frame and makes the loop cancellable.
//! Every frame runs [`FrameSet::Clock`] → [`FrameSet::Hook`] →
//! [`FrameSet::Input`] → [`FrameSet::Advance`] → [`FrameSet::Sync`], and none
//! of them run once the [`FrameLoop`] has been cancelled.

use bevy::prelude::*;
use bevy_hand_gesture::{GestureSystems, LandmarkFeed};

/// Ordered phases of a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Scene clock tick
    Clock,
    /// Host-supplied per-frame work, before anything reads input. The clock
    /// has already advanced for this frame.
    Hook,
    /// UI and gesture mutations of the mode state
    Input,
    /// Camera damping, foliage, decorations, snow, assembly rotation
    Advance,
    /// Copy simulated state onto render entities
    Sync,
}

/// Monotonic scene clock plus the cancellation flag.
#[derive(Resource, Debug, Default)]
pub struct FrameLoop {
    elapsed: f32,
    frames: u64,
    cancelled: bool,
}

impl FrameLoop {
    /// Seconds the loop has been running.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled
    }

    pub fn tick(&mut self, delta: f32) {
        self.elapsed += delta;
        self.frames += 1;
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Run condition for everything scheduled in [`FrameSet`].
pub fn frame_loop_running(frame_loop: Option<Res<FrameLoop>>) -> bool {
    frame_loop.is_some_and(|f| f.is_running())
}

/// Marker for top-level entities owned by the scene. Teardown despawns these
/// (and their children).
#[derive(Component, Default)]
pub struct TreeOwned;

/// Stop the frame loop and release everything the scene owns.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct TeardownRequested;

/// Sent once teardown has released the scene.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct TeardownComplete;

pub struct FrameLoopPlugin;

impl Plugin for FrameLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameLoop>()
            .add_message::<TeardownRequested>()
            .add_message::<TeardownComplete>()
            .configure_sets(
                Update,
                (
                    FrameSet::Clock,
                    FrameSet::Hook,
                    FrameSet::Input,
                    FrameSet::Advance,
                    FrameSet::Sync,
                )
                    .chain()
                    .after(GestureSystems)
                    .run_if(frame_loop_running),
            )
            .add_systems(Update, advance_clock.in_set(FrameSet::Clock))
            .add_systems(Last, teardown);
    }
}

fn advance_clock(time: Res<Time>, mut frame_loop: ResMut<FrameLoop>) {
    frame_loop.tick(time.delta_secs());
}

/// Cancel the loop, despawn owned entities and drop owned assets.
///
/// Best effort: whatever is already gone is simply skipped.
fn teardown(
    mut requests: MessageReader<TeardownRequested>,
    mut commands: Commands,
    mut frame_loop: ResMut<FrameLoop>,
    mut feed: ResMut<LandmarkFeed>,
    owned: Query<Entity, With<TreeOwned>>,
    mut complete: MessageWriter<TeardownComplete>,
) {
    if requests.read().count() == 0 || !frame_loop.is_running() {
        return;
    }

    frame_loop.cancel();
    feed.close();

    let mut despawned = 0;
    for entity in &owned {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    commands.remove_resource::<crate::assets::TreeAssets>();
    commands.remove_resource::<crate::foliage::FoliageField>();
    commands.remove_resource::<crate::snow::SnowField>();

    info!(
        "Tree scene torn down after {} frames ({} entities released)",
        frame_loop.frames(),
        despawned
    );
    complete.write(TeardownComplete);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_hand_gesture::HandGesturePlugin;

    #[derive(Resource, Default)]
    struct Ticks(u32);

    fn count_tick(mut ticks: ResMut<Ticks>) {
        ticks.0 += 1;
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HandGesturePlugin)
            .add_plugins(FrameLoopPlugin)
            .init_resource::<Ticks>()
            .add_systems(Update, count_tick.in_set(FrameSet::Advance));
        app
    }

    #[test]
    fn advance_runs_every_frame_until_teardown() {
        let mut app = test_app();
        let owned = app.world_mut().spawn(TreeOwned).id();
        let sender = app.world_mut().resource_mut::<LandmarkFeed>().connect();

        app.update();
        app.update();
        assert_eq!(app.world().resource::<Ticks>().0, 2);
        assert_eq!(app.world().resource::<FrameLoop>().frames(), 2);

        app.world_mut().write_message(TeardownRequested);
        app.update();
        // The request is handled at the end of this frame.
        assert_eq!(app.world().resource::<Ticks>().0, 3);
        assert!(!app.world().resource::<FrameLoop>().is_running());
        assert!(app.world().get_entity(owned).is_err());
        assert!(sender.send(bevy_hand_gesture::LandmarkFrame { timestamp: 1.0, hand: None }).is_err());

        app.update();
        app.update();
        assert_eq!(app.world().resource::<Ticks>().0, 3);
    }

    #[derive(Resource, Default)]
    struct SeenFrames(Vec<u64>);

    fn record_frame(frame_loop: Res<FrameLoop>, mut seen: ResMut<SeenFrames>) {
        seen.0.push(frame_loop.frames());
    }

    #[test]
    fn hooks_see_the_current_frame() {
        let mut app = test_app();
        app.init_resource::<SeenFrames>()
            .add_systems(Update, record_frame.in_set(FrameSet::Hook));

        app.update();
        app.update();
        app.update();
        assert_eq!(app.world().resource::<SeenFrames>().0, vec![1, 2, 3]);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut frame_loop = FrameLoop::default();
        frame_loop.tick(0.016);
        let first = frame_loop.elapsed();
        frame_loop.tick(0.016);
        assert!(frame_loop.elapsed() > first);
        assert_eq!(frame_loop.frames(), 2);
    }
}
