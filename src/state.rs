use bevy::prelude::*;
use bevy_hand_gesture::HandShape;

/// Which layout the scene is converging toward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum SceneMode {
    /// Foliage and decorations assembled into the tree
    #[default]
    Tree,
    /// Everything pushed out into a spherical cloud
    Scatter,
    /// Scattered, with one photo pulled in front of the camera
    Focus,
}

impl SceneMode {
    pub fn label(&self) -> &'static str {
        match self {
            SceneMode::Tree => "Tree",
            SceneMode::Scatter => "Scatter",
            SceneMode::Focus => "Focus",
        }
    }

    /// Foliage uses the scattered layout in every mode except `Tree`.
    pub fn is_scattered(&self) -> bool {
        matches!(self, SceneMode::Scatter | SceneMode::Focus)
    }
}

/// Shared interaction state, written by the UI and gesture input and read by
/// every per-frame system.
///
/// Mode changes take effect immediately; all visual motion toward the new
/// layout is damped by the consumers.
#[derive(Debug, Default, Resource)]
pub struct ModeState {
    pub mode: SceneMode,
    /// Assembly rotation target: `x` pitch, `y` yaw
    pub target_rotation: Vec2,
    /// Photo decoration pulled into focus
    pub focus_target: Option<Entity>,
    /// Photo decoration under the pointer
    pub hovered: Option<Entity>,
}

impl ModeState {
    /// Switch to `Tree` or `Scatter`. Focus is only entered through
    /// [`ModeState::select_hovered`].
    pub fn set_layout(&mut self, mode: SceneMode) -> bool {
        if mode == SceneMode::Focus || self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.focus_target = None;
        true
    }

    /// Apply a classified hand shape. An ambiguous hand leaves the mode alone.
    pub fn apply_hand_shape(&mut self, shape: Option<HandShape>) -> bool {
        match shape {
            Some(HandShape::Fist) => self.set_layout(SceneMode::Tree),
            Some(HandShape::Open) => self.set_layout(SceneMode::Scatter),
            None => false,
        }
    }

    /// Focus the hovered photo, if any.
    pub fn select_hovered(&mut self) -> bool {
        let Some(hovered) = self.hovered else {
            return false;
        };
        self.focus_target = Some(hovered);
        self.mode = SceneMode::Focus;
        true
    }

    /// Leave focus for the scattered layout. No-op outside focus.
    pub fn reset(&mut self) -> bool {
        if self.mode != SceneMode::Focus {
            return false;
        }
        self.mode = SceneMode::Scatter;
        self.focus_target = None;
        true
    }

    pub fn is_focused_on(&self, entity: Entity) -> bool {
        self.mode == SceneMode::Focus && self.focus_target == Some(entity)
    }
}

/// Request a layout change from the UI.
#[derive(Message, Debug, Clone, Copy)]
pub struct SetSceneMode(pub SceneMode);

/// Request to focus whatever photo is currently hovered.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct SelectHovered;

/// Leave focus and return the camera to its starting pose.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetView;

pub struct ModeStatePlugin;

impl Plugin for ModeStatePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneMode>()
            .init_resource::<ModeState>()
            .add_message::<SetSceneMode>()
            .add_message::<SelectHovered>()
            .add_message::<ResetView>()
            .add_systems(
                Update,
                (handle_mode_requests, handle_reset_view).in_set(crate::frame::FrameSet::Input),
            );
    }
}

fn handle_mode_requests(
    mut set_mode: MessageReader<SetSceneMode>,
    mut select: MessageReader<SelectHovered>,
    mut state: ResMut<ModeState>,
) {
    for SetSceneMode(mode) in set_mode.read() {
        if state.set_layout(*mode) {
            debug!("Scene mode -> {}", mode.label());
        }
    }
    for _ in select.read() {
        if state.select_hovered() {
            debug!("Scene mode -> Focus ({:?})", state.focus_target);
        }
    }
}

fn handle_reset_view(mut events: MessageReader<ResetView>, mut state: ResMut<ModeState>) {
    // The camera side of the reset lives in the camera module.
    for _ in events.read() {
        if state.reset() {
            debug!("Scene mode -> Scatter (reset)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn starts_assembled() {
        let state = ModeState::default();
        assert_eq!(state.mode, SceneMode::Tree);
        assert!(state.focus_target.is_none());
    }

    #[test]
    fn hand_shapes_switch_layout() {
        let mut state = ModeState::default();
        assert!(state.apply_hand_shape(Some(HandShape::Open)));
        assert_eq!(state.mode, SceneMode::Scatter);
        assert!(!state.apply_hand_shape(None));
        assert_eq!(state.mode, SceneMode::Scatter);
        assert!(state.apply_hand_shape(Some(HandShape::Fist)));
        assert_eq!(state.mode, SceneMode::Tree);
    }

    #[test]
    fn select_requires_hover() {
        let photos = entities(2);
        let mut state = ModeState::default();
        assert!(!state.select_hovered());
        assert_eq!(state.mode, SceneMode::Tree);

        state.hovered = Some(photos[0]);
        assert!(state.select_hovered());
        assert_eq!(state.mode, SceneMode::Focus);
        assert!(state.is_focused_on(photos[0]));
        assert!(!state.is_focused_on(photos[1]));
    }

    #[test]
    fn reset_leaves_focus_for_scatter() {
        let mut state = ModeState {
            hovered: Some(entities(1)[0]),
            ..default()
        };
        state.select_hovered();
        assert!(state.reset());
        assert_eq!(state.mode, SceneMode::Scatter);
        assert!(state.focus_target.is_none());
    }

    #[test]
    fn reset_outside_focus_is_noop() {
        let mut state = ModeState::default();
        assert!(!state.reset());
        assert_eq!(state.mode, SceneMode::Tree);

        state.set_layout(SceneMode::Scatter);
        assert!(!state.reset());
        assert_eq!(state.mode, SceneMode::Scatter);
    }

    #[test]
    fn focus_cannot_be_set_as_a_layout() {
        let mut state = ModeState::default();
        assert!(!state.set_layout(SceneMode::Focus));
        assert_eq!(state.mode, SceneMode::Tree);
    }

    #[test]
    fn layout_change_drops_focus_target() {
        let mut state = ModeState {
            hovered: Some(entities(1)[0]),
            ..default()
        };
        state.select_hovered();
        assert!(state.apply_hand_shape(Some(HandShape::Fist)));
        assert_eq!(state.mode, SceneMode::Tree);
        assert!(state.focus_target.is_none());
    }
}
