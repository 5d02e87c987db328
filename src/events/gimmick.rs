//! Gimmick contact event and observer.
//!
//! The player system fires [`GimmickContactEvent`] for every gimmick whose
//! collision circle the player's sweep touched this update.
//! [`observe_goal_contact`] consumes goals; other kinds are left alone.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::gimmick::{Gimmick, GimmickKind};

/// A player touched a gimmick.
#[derive(Event, Debug, Clone, Copy)]
pub struct GimmickContactEvent {
    pub player: Entity,
    pub gimmick: Entity,
}

/// Observer that consumes a goal the player touched.
///
/// The goal is only disabled, never despawned: it stays in the roster and
/// the hierarchy so ordering and handles remain valid for the round.
pub fn observe_goal_contact(trigger: On<GimmickContactEvent>, mut gimmicks: Query<&mut Gimmick>) {
    let event = trigger.event();
    let Ok(mut gimmick) = gimmicks.get_mut(event.gimmick) else {
        return;
    };
    if gimmick.kind != GimmickKind::Goal || !gimmick.is_enabled() {
        return;
    }
    gimmick.destroy();
    info!("Goal {:?} collected by {:?}", event.gimmick, event.player);
}
