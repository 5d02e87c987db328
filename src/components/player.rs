//! Player movement state.
//!
//! Sits next to a [`Gimmick`](super::gimmick::Gimmick) of kind `Player`.
//! Speed is expressed in the player's own frame: `speed.x` along
//! [`PlayerBody::right`], `speed.y` along [`PlayerBody::down`], both as a
//! per-update displacement.

use bevy_ecs::prelude::*;
use glam::DVec2;

use crate::resources::input::InputState;
use crate::resources::stageconfig::StageConfig;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub down: DVec2,
    pub right: DVec2,
    pub speed: DVec2,
    pub grounded: bool,
    /// World angle the direction vectors were last derived from.
    pub facing_angle: f64,
    pub animation_frame: u32,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PlayerBody {
    pub fn new(world_angle: f64) -> Self {
        let down = DVec2::from_angle(world_angle).rotate(DVec2::Y);
        Self {
            down,
            right: DVec2::new(down.y, -down.x),
            speed: DVec2::ZERO,
            grounded: false,
            facing_angle: world_angle,
            animation_frame: 0,
        }
    }

    /// Re-derive `down`/`right` from `world_angle` and damp the vertical
    /// speed to a quarter.
    pub fn update_direction(&mut self, world_angle: f64) {
        self.down = DVec2::from_angle(world_angle).rotate(DVec2::Y);
        self.right = DVec2::new(self.down.y, -self.down.x);
        self.facing_angle = world_angle;
        self.speed.y /= 4.0;
    }

    /// Displacement for this update in world space.
    pub fn velocity(&self) -> DVec2 {
        self.down * self.speed.y + self.right * self.speed.x
    }

    /// Walk, decelerate, jump and fall for one update of `dt` seconds.
    ///
    /// Left takes priority when both walk keys are held.
    pub fn apply_controls(&mut self, input: &InputState, dt: f64, config: &StageConfig) {
        let max = config.player_max_speed;

        if input.left.active {
            self.speed.x -= max * dt;
        } else if input.right.active {
            self.speed.x += max * dt;
        } else {
            let brake = 2.0 * max * dt;
            self.speed.x = if self.speed.x > 0.0 {
                (self.speed.x - brake).max(0.0)
            } else {
                (self.speed.x + brake).min(0.0)
            };
        }
        self.speed.x = self.speed.x.clamp(-max, max);

        if self.grounded && input.jump.active {
            self.speed.y = config.player_jump_power;
        } else {
            self.speed.y += config.player_gravity * dt;
        }
    }

    /// Sprite frame: a three-frame walk cycle per facing side, driven by
    /// `phase` in `[0, 1]`. Standing still keeps the last frame.
    pub fn select_frame(&mut self, phase: f64) {
        if self.speed.x == 0.0 {
            return;
        }
        let base = if self.speed.x < 0.0 { 6 } else { 12 };
        self.animation_frame = base + (phase.clamp(0.0, 1.0) * 2.0 + 0.5) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn unrotated_player_falls_toward_positive_y() {
        let body = PlayerBody::new(0.0);
        assert!(approx(body.down, DVec2::new(0.0, 1.0)));
        assert!(approx(body.right, DVec2::new(1.0, 0.0)));
    }

    #[test]
    fn direction_update_rotates_frame_and_damps_vertical_speed() {
        let mut body = PlayerBody::new(0.0);
        body.speed = DVec2::new(2.0, 8.0);
        body.update_direction(FRAC_PI_2);
        assert!(approx(body.down, DVec2::new(-1.0, 0.0)));
        assert!(approx(body.right, DVec2::new(0.0, 1.0)));
        assert_eq!(body.speed, DVec2::new(2.0, 2.0));
    }

    #[test]
    fn velocity_follows_the_rotated_frame() {
        let mut body = PlayerBody::new(FRAC_PI_2);
        body.speed = DVec2::new(1.5, -2.0);
        assert!(approx(body.velocity(), DVec2::new(2.0, 1.5)));
    }

    #[test]
    fn controls_accelerate_clamp_and_brake() {
        let config = StageConfig::new();
        let mut input = InputState::default();
        let mut body = PlayerBody::new(0.0);

        input.right.active = true;
        for _ in 0..200 {
            body.apply_controls(&input, 0.1, &config);
        }
        assert_eq!(body.speed.x, config.player_max_speed);

        input.right.active = false;
        for _ in 0..200 {
            body.apply_controls(&input, 0.1, &config);
        }
        assert_eq!(body.speed.x, 0.0);
    }

    #[test]
    fn jump_needs_ground() {
        let config = StageConfig::new();
        let mut input = InputState::default();
        input.jump.active = true;

        let mut body = PlayerBody::new(0.0);
        body.apply_controls(&input, 0.5, &config);
        assert!((body.speed.y - config.player_gravity * 0.5).abs() < 1e-12);

        body.grounded = true;
        body.apply_controls(&input, 0.5, &config);
        assert_eq!(body.speed.y, config.player_jump_power);
    }

    #[test]
    fn left_wins_when_both_walk_keys_are_held() {
        let config = StageConfig::new();
        let mut input = InputState::default();
        input.left.active = true;
        input.right.active = true;

        let mut body = PlayerBody::new(0.0);
        body.apply_controls(&input, 0.1, &config);
        assert!((body.speed.x + config.player_max_speed * 0.1).abs() < 1e-12);
    }

    #[test]
    fn walk_cycle_has_three_frames_per_side() {
        let mut body = PlayerBody::new(0.0);
        body.speed.x = -1.0;
        let left: Vec<u32> = [0.0, 0.2, 0.25, 0.5, 0.74, 0.75, 1.0]
            .iter()
            .map(|&p| {
                body.select_frame(p);
                body.animation_frame
            })
            .collect();
        assert_eq!(left, vec![6, 6, 7, 7, 7, 8, 8]);

        body.speed.x = 1.0;
        body.select_frame(0.0);
        assert_eq!(body.animation_frame, 12);
        body.select_frame(1.0);
        assert_eq!(body.animation_frame, 14);
    }

    #[test]
    fn standing_still_keeps_the_frame() {
        let mut body = PlayerBody::new(0.0);
        body.speed.x = -1.0;
        body.select_frame(1.0);
        assert_eq!(body.animation_frame, 8);

        body.speed.x = 0.0;
        body.select_frame(0.0);
        assert_eq!(body.animation_frame, 8);
    }
}
