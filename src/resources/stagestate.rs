//! Stage mode resources.
//!
//! [`StageState`] holds the authoritative [`StageMode`] together with the
//! round flags (arrangement requested, cleared, game over) and the
//! externally polled reload signals. A mode change is requested through
//! [`NextStageMode`] and applied by
//! [`observe_stage_mode_change`](crate::events::stagemode::observe_stage_mode_change),
//! so exactly one mode is active for the whole of a frame's update.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// The mode a stage is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageMode {
    /// Pieces are selected and transformed with the mouse.
    #[default]
    Arrangement,
    /// The player runs over the composed ground.
    Play,
    /// Every goal has been collected.
    Clear,
    GameOver,
}

/// Why a round ended in [`StageMode::GameOver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The player left the playable area.
    FallOut,
    /// The player was shrunk below the minimum scale.
    ScaleOut,
    /// The restart key was pressed.
    Restart,
}

/// Requested next mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextStageModes {
    #[default]
    Unchanged,
    Pending(StageMode),
}

/// Intent to change to a new stage mode.
#[derive(Resource, Debug, Clone, Default)]
pub struct NextStageMode {
    next: NextStageModes,
}

impl NextStageMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &NextStageModes {
        &self.next
    }

    /// Request a transition to `next`.
    pub fn set(&mut self, next: StageMode) {
        self.next = NextStageModes::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextStageModes::Unchanged;
    }
}

/// Authoritative mode plus round flags.
#[derive(Resource, Debug, Clone, Default)]
pub struct StageState {
    current: StageMode,
    pub(crate) piece_action: bool,
    clear: bool,
    game_over: Option<GameOverCause>,
    load_wait_stage: bool,
    load_wait_select: bool,
    /// Seconds spent in the current ending sequence.
    pub animation_time: f64,
}

impl StageState {
    /// Fresh round, starting in arrangement.
    pub fn new() -> Self {
        Self {
            piece_action: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> StageMode {
        self.current
    }

    /// Apply a mode immediately. Prefer [`NextStageMode`] so the change is
    /// observed and logged.
    pub fn set_mode(&mut self, mode: StageMode) {
        self.current = mode;
    }

    pub fn is_round_over(&self) -> bool {
        self.clear || self.game_over.is_some()
    }

    pub fn set_game_clear(&mut self) {
        self.clear = true;
    }

    pub fn is_clear(&self) -> bool {
        self.clear
    }

    /// Record a game over. The first cause of the round wins.
    pub fn set_game_over(&mut self, cause: GameOverCause) {
        if self.game_over.is_none() {
            self.game_over = Some(cause);
        }
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.game_over
    }

    /// True once the game-over sequence finished: reload this stage.
    pub fn load_stage_wait(&self) -> bool {
        self.load_wait_stage
    }

    /// True once the clear sequence finished: go back to stage select.
    pub fn load_select_wait(&self) -> bool {
        self.load_wait_select
    }

    pub(crate) fn raise_load_stage(&mut self) {
        self.load_wait_stage = true;
    }

    pub(crate) fn raise_load_select(&mut self) {
        self.load_wait_select = true;
    }
}
