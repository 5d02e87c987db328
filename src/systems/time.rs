//! Stage clock.
//!
//! The host hands [`Stage::update`](crate::stage::Stage::update) its frame
//! delta; this advances [`WorldTime`] with it before any stage system runs,
//! so the ending sequences and the player's walk cycle read the same clock.
use bevy_ecs::prelude::*;
use log::warn;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by `dt` seconds scaled by `time_scale`.
///
/// A negative or non-finite `dt` counts as a zero-length frame.
pub fn update_world_time(world: &mut World, dt: f64) {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        warn!("update_world_time: ignoring frame delta {}", dt);
        0.0
    };
    let mut clock = world.resource_mut::<WorldTime>();
    clock.delta = dt * clock.time_scale;
    clock.elapsed += clock.delta;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_applies_to_delta_and_elapsed() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(0.5));
        update_world_time(&mut world, 0.2);
        update_world_time(&mut world, 0.2);
        let wt = world.resource::<WorldTime>();
        assert!((wt.delta - 0.1).abs() < 1e-12);
        assert!((wt.elapsed - 0.2).abs() < 1e-12);
    }

    #[test]
    fn bad_delta_is_a_zero_frame() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 0.5);
        update_world_time(&mut world, f64::NAN);
        update_world_time(&mut world, -1.0);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.delta, 0.0);
        assert!((wt.elapsed - 0.5).abs() < 1e-12);
    }
}
