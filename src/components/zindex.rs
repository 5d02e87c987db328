//! Z-index component for draw ordering of stage pieces.
//!
//! A piece's [`ZIndex`] is its position in the stage's piece list. Later
//! pieces draw on top, are tested first for cursor interaction and occlude
//! the ground of earlier pieces when hitboxes are composed.

use bevy_ecs::prelude::Component;

/// Draw order hint; higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
