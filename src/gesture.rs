//! Connects hand readings (and the mouse, when no hand is tracked) to the
//! mode state: hover by ray cast, pinch to focus, fist/open to switch layout,
//! palm position to steer the assembly.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use bevy_hand_gesture::{GestureStatus, HandFrame, LandmarkFeed, LandmarkRecording};

use crate::camera::TreeCamera;
use crate::constants::camera;
use crate::decorations::{Decoration, DecorationPart};
use crate::settings::TreeSettings;
use crate::state::ModeState;

/// Most hits a single pointer ray collects.
const MAX_POINTER_HITS: u32 = 16;

/// On-screen hand cursor.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct GestureCursor {
    pub visible: bool,
    /// Normalized viewport position, `(0, 0)` top-left
    pub position: Vec2,
    pub hovering: bool,
    pub pinching: bool,
}

/// Nearest hit whose owner is a photo decoration.
pub fn first_photo_hit(
    mut hits: Vec<(Entity, f32)>,
    photo_owner: impl Fn(Entity) -> Option<Entity>,
) -> Option<Entity> {
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits.into_iter().find_map(|(entity, _)| photo_owner(entity))
}

/// Photo under a viewport position (logical pixels), if any.
fn photo_at(
    viewport_position: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    spatial_query: &SpatialQuery,
    parts: &Query<&DecorationPart>,
    decorations: &Query<&Decoration>,
) -> Option<Entity> {
    let ray = camera
        .viewport_to_world(camera_transform, viewport_position)
        .ok()?;
    let hits = spatial_query
        .ray_hits(
            ray.origin,
            ray.direction,
            camera::FAR,
            MAX_POINTER_HITS,
            true,
            &SpatialQueryFilter::default(),
        )
        .into_iter()
        .map(|hit| (hit.entity, hit.distance))
        .collect();

    first_photo_hit(hits, |entity| {
        let owner = parts.get(entity).ok()?.0;
        decorations
            .get(owner)
            .ok()
            .filter(|decoration| decoration.kind.is_photo())
            .map(|_| owner)
    })
}

/// Drive the feed from a recorded session when one is configured.
pub fn start_gesture_replay(
    settings: Res<TreeSettings>,
    mut feed: ResMut<LandmarkFeed>,
    mut status: ResMut<GestureStatus>,
) {
    let Some(path) = &settings.gesture_replay else {
        return;
    };

    let recording = match LandmarkRecording::load(path) {
        Ok(recording) => recording,
        Err(e) => {
            *status = GestureStatus::Failed(format!("{}: {}", path.display(), e));
            return;
        }
    };
    let frames = recording.frames.len();
    if let Err(e) = recording.play(feed.connect()) {
        feed.close();
        *status = GestureStatus::Failed(e.to_string());
        return;
    }
    info!("Replaying {} landmark frames from {:?}", frames, path);
}

/// Apply hand frames, oldest first, to the cursor and the mode state.
///
/// `pick` maps a normalized viewport position to the photo under it. A frame
/// without a hand only hides the cursor.
pub fn apply_hand_frames<'a>(
    frames: impl IntoIterator<Item = &'a HandFrame>,
    cursor: &mut GestureCursor,
    state: &mut ModeState,
    mut pick: impl FnMut(Vec2) -> Option<Entity>,
) {
    for frame in frames {
        let Some(reading) = frame.reading else {
            cursor.visible = false;
            cursor.pinching = false;
            continue;
        };
        cursor.visible = true;
        cursor.position = reading.cursor;

        // Hover is refreshed before the pinch check, so a pinch focuses the
        // photo under the fingertip in this same frame.
        let hovered = pick(reading.cursor);
        state.hovered = hovered;
        cursor.hovering = hovered.is_some();

        state.target_rotation = reading.palm_rotation;

        cursor.pinching = reading.pinching;
        if reading.pinching {
            if state.select_hovered() {
                debug!("Pinch focused {:?}", state.focus_target);
            }
        } else if state.apply_hand_shape(reading.hand_shape()) {
            debug!("Hand shape -> {}", state.mode.label());
        }
    }
}

/// Apply each new hand frame, picking photos with a ray from the tree camera.
pub fn interpret_hand_frames(
    mut frames: MessageReader<HandFrame>,
    status: Res<GestureStatus>,
    mut cursor: ResMut<GestureCursor>,
    mut state: ResMut<ModeState>,
    cameras: Query<(&Camera, &GlobalTransform), With<TreeCamera>>,
    spatial_query: SpatialQuery,
    parts: Query<&DecorationPart>,
    decorations: Query<&Decoration>,
) {
    if !status.is_ready() {
        cursor.set_if_neq(GestureCursor::default());
    }

    apply_hand_frames(frames.read(), &mut cursor, &mut state, |position| {
        let (camera, transform) = cameras.single().ok()?;
        let size = camera.logical_viewport_size()?;
        photo_at(
            position * size,
            camera,
            transform,
            &spatial_query,
            &parts,
            &decorations,
        )
    });
}

/// Mouse stand-in for the hand cursor: hover photos with the pointer and
/// right-click to focus. Only active while no hand is being tracked.
pub fn mouse_hover(
    status: Res<GestureStatus>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<TreeCamera>>,
    spatial_query: SpatialQuery,
    parts: Query<&DecorationPart>,
    decorations: Query<&Decoration>,
    mut contexts: EguiContexts,
    mut state: ResMut<ModeState>,
) {
    if status.is_ready() {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
            return;
        }
    }

    let hovered = match (windows.single(), cameras.single()) {
        (Ok(window), Ok((camera, transform))) => window.cursor_position().and_then(|position| {
            photo_at(position, camera, transform, &spatial_query, &parts, &decorations)
        }),
        _ => None,
    };
    if state.hovered != hovered {
        state.hovered = hovered;
    }

    if mouse_buttons.just_pressed(MouseButton::Right) && state.select_hovered() {
        debug!("Click focused {:?}", state.focus_target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneMode;
    use bevy_hand_gesture::landmarks::{LANDMARK_COUNT, index};
    use bevy_hand_gesture::{
        GestureSystems, HandGesturePlugin, HandLandmarks, Landmark, LandmarkFrame, LandmarkSender,
    };

    #[test]
    fn nearest_photo_wins() {
        let mut world = World::new();
        let [near_part, far_part, tree] = [(); 3].map(|_| world.spawn_empty().id());
        let near_photo = world.spawn_empty().id();
        let far_photo = world.spawn_empty().id();

        let owner = |entity: Entity| {
            if entity == near_part {
                Some(near_photo)
            } else if entity == far_part {
                Some(far_photo)
            } else {
                None
            }
        };

        let hits = vec![(far_part, 30.0), (tree, 5.0), (near_part, 12.0)];
        assert_eq!(first_photo_hit(hits, owner), Some(near_photo));
    }

    #[test]
    fn misses_leave_nothing_hovered() {
        let mut world = World::new();
        let tree = world.spawn_empty().id();
        assert_eq!(first_photo_hit(vec![(tree, 1.0)], |_| None), None);
        assert_eq!(first_photo_hit(Vec::new(), |_| None), None);
    }

    /// Photo the fingertip is over, standing in for the ray cast.
    #[derive(Resource, Default)]
    struct PhotoUnderFinger(Option<Entity>);

    fn interpret_with_fixed_pick(
        mut frames: MessageReader<HandFrame>,
        under_finger: Res<PhotoUnderFinger>,
        mut cursor: ResMut<GestureCursor>,
        mut state: ResMut<ModeState>,
    ) {
        let photo = under_finger.0;
        apply_hand_frames(frames.read(), &mut cursor, &mut state, |_| photo);
    }

    /// Fingertips `spread` above the wrist, palm at `palm`, thumb either
    /// on the index tip or well clear of it.
    fn hand(spread: f32, palm: Vec2, pinching: bool) -> HandLandmarks {
        let mut points = [Landmark::new(0.5, 0.8); LANDMARK_COUNT];
        points[index::PALM] = Landmark::new(palm.x, palm.y);
        for tip in index::OPENNESS_TIPS {
            points[tip] = Landmark::new(0.5, 0.8 - spread);
        }
        points[index::THUMB_TIP] = if pinching {
            points[index::INDEX_TIP]
        } else {
            Landmark::new(0.2, 0.7)
        };
        HandLandmarks(points)
    }

    fn send(sender: &LandmarkSender, timestamp: f64, hand: Option<HandLandmarks>) {
        sender.send(LandmarkFrame { timestamp, hand }).unwrap();
    }

    fn setup() -> (App, LandmarkSender) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HandGesturePlugin)
            .init_resource::<ModeState>()
            .init_resource::<GestureCursor>()
            .init_resource::<PhotoUnderFinger>()
            .add_systems(Update, interpret_with_fixed_pick.after(GestureSystems));
        let sender = app.world_mut().resource_mut::<LandmarkFeed>().connect();
        (app, sender)
    }

    #[test]
    fn open_hand_scatters_and_steers() {
        let (mut app, sender) = setup();
        send(&sender, 1.0, Some(hand(0.5, Vec2::new(0.3, 0.7), false)));
        app.update();

        let state = app.world().resource::<ModeState>();
        assert_eq!(state.mode, SceneMode::Scatter);
        assert!((state.target_rotation.x - 0.2).abs() < 1e-5);
        assert!((state.target_rotation.y - 0.6).abs() < 1e-5);
        let cursor = app.world().resource::<GestureCursor>();
        assert!(cursor.visible);
        assert!(!cursor.pinching);
        assert!(!cursor.hovering);
        assert!((cursor.position - Vec2::new(0.5, 0.3)).length() < 1e-5);
    }

    #[test]
    fn missing_hand_hides_cursor_and_keeps_state() {
        let (mut app, sender) = setup();
        send(&sender, 1.0, Some(hand(0.5, Vec2::new(0.3, 0.7), false)));
        app.update();
        let rotation = app.world().resource::<ModeState>().target_rotation;

        send(&sender, 2.0, None);
        app.update();
        let cursor = app.world().resource::<GestureCursor>();
        assert!(!cursor.visible);
        assert!(!cursor.pinching);
        let state = app.world().resource::<ModeState>();
        assert_eq!(state.mode, SceneMode::Scatter);
        assert_eq!(state.target_rotation, rotation);

        // Same video frame again, now with a fist: ignored.
        send(&sender, 2.0, Some(hand(0.1, Vec2::new(0.5, 0.5), false)));
        app.update();
        assert_eq!(app.world().resource::<ModeState>().mode, SceneMode::Scatter);
        assert!(!app.world().resource::<GestureCursor>().visible);
    }

    #[test]
    fn pinch_over_photo_focuses_it() {
        let (mut app, sender) = setup();
        let photo = app.world_mut().spawn_empty().id();
        send(&sender, 1.0, Some(hand(0.5, Vec2::new(0.5, 0.5), false)));
        app.update();

        // A pinch over nothing changes nothing, even with the fingers curled.
        send(&sender, 2.0, Some(hand(0.1, Vec2::new(0.5, 0.5), true)));
        app.update();
        let state = app.world().resource::<ModeState>();
        assert_eq!(state.mode, SceneMode::Scatter);
        assert!(state.focus_target.is_none());
        assert!(app.world().resource::<GestureCursor>().pinching);

        app.world_mut().resource_mut::<PhotoUnderFinger>().0 = Some(photo);
        send(&sender, 3.0, Some(hand(0.1, Vec2::new(0.5, 0.5), true)));
        app.update();
        let state = app.world().resource::<ModeState>();
        assert_eq!(state.mode, SceneMode::Focus);
        assert_eq!(state.focus_target, Some(photo));
        assert_eq!(state.hovered, Some(photo));
        let cursor = app.world().resource::<GestureCursor>();
        assert!(cursor.hovering);
        assert!(cursor.pinching);
    }
}
