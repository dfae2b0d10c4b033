use bevy::prelude::*;

use crate::camera::TreeCamera;
use crate::constants::snow;
use crate::frame::FrameLoop;

/// Heights and horizontal offsets of every flake, in the snow root's frame.
#[derive(Resource, Debug, Clone)]
pub struct SnowField {
    positions: Vec<Vec3>,
}

impl SnowField {
    /// Scatter `count` flakes through the snow box.
    pub fn new(count: usize, rng: &mut fastrand::Rng) -> Self {
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.f32() - 0.5) * snow::SPREAD,
                    snow::FLOOR + rng.f32() * (snow::CEILING - snow::FLOOR),
                    (rng.f32() - 0.5) * snow::SPREAD,
                )
            })
            .collect();
        Self { positions }
    }

    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// One frame of drift followed by recycling.
    pub fn step(&mut self) {
        for position in &mut self.positions {
            position.y = recycle(position.y - snow::FALL_STEP);
        }
    }
}

/// Flakes strictly below the floor restart at the ceiling.
pub fn recycle(height: f32) -> f32 {
    if height < snow::FLOOR {
        snow::CEILING
    } else {
        height
    }
}

/// Parent of every flake; turns slowly with the clock.
#[derive(Component, Default)]
pub struct SnowRoot;

/// Links a flake entity to its slot in the [`SnowField`].
#[derive(Component, Debug, Clone, Copy)]
pub struct SnowFlake(pub usize);

pub fn advance_snow(
    frame_loop: Res<FrameLoop>,
    field: Option<ResMut<SnowField>>,
    mut roots: Query<&mut Transform, With<SnowRoot>>,
) {
    if let Some(mut field) = field {
        field.step();
    }
    for mut transform in &mut roots {
        transform.rotation = Quat::from_rotation_y(frame_loop.elapsed() * snow::SPIN_RATE);
    }
}

/// Copy flake positions onto their entities and turn each sprite toward the
/// camera.
pub fn sync_snow_flakes(
    field: Option<Res<SnowField>>,
    cameras: Query<&Transform, (With<TreeCamera>, Without<SnowFlake>)>,
    roots: Query<&Transform, (With<SnowRoot>, Without<SnowFlake>)>,
    mut flakes: Query<(&SnowFlake, &mut Transform)>,
) {
    let Some(field) = field else {
        return;
    };
    // Sprites face the camera: undo the root's spin, then match the camera.
    let facing = match (cameras.single(), roots.single()) {
        (Ok(camera), Ok(root)) => root.rotation.inverse() * camera.rotation,
        _ => Quat::IDENTITY,
    };
    for (flake, mut transform) in &mut flakes {
        if let Some(position) = field.positions().get(flake.0) {
            transform.translation = *position;
            transform.rotation = facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_height_does_not_recycle() {
        assert_eq!(recycle(-20.0), -20.0);
        assert_eq!(recycle(-20.01), 40.0);
    }

    #[test]
    fn flake_at_floor_recycles_one_step_later() {
        let mut field = SnowField::from_positions(vec![Vec3::new(0.0, -20.0, 0.0)]);
        assert_eq!(field.positions()[0].y, -20.0);
        field.step();
        assert_eq!(field.positions()[0].y, 40.0);
    }

    #[test]
    fn flakes_drift_down() {
        let mut field = SnowField::from_positions(vec![Vec3::new(1.0, 10.0, 2.0)]);
        field.step();
        let p = field.positions()[0];
        assert!((p.y - 9.9).abs() < 1e-5);
        assert_eq!((p.x, p.z), (1.0, 2.0));
    }

    #[test]
    fn initial_flakes_fill_the_box() {
        let field = SnowField::new(1500, &mut fastrand::Rng::with_seed(3));
        assert_eq!(field.len(), 1500);
        for p in field.positions() {
            assert!(p.x.abs() <= 50.0 && p.z.abs() <= 50.0);
            assert!((-20.0..=40.0).contains(&p.y));
        }
    }

    #[test]
    fn snowfall_never_ends() {
        let mut field = SnowField::new(100, &mut fastrand::Rng::with_seed(9));
        for _ in 0..2000 {
            field.step();
        }
        assert!(field.positions().iter().all(|p| (-20.0..=40.0).contains(&p.y)));
    }
}
