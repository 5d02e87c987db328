//! Event types and observers used by the stage.
//!
//! Submodules:
//! - [`gimmick`] – a player touched a gimmick; goals are consumed
//! - [`stagemode`] – apply a pending stage mode transition
pub mod gimmick;
pub mod stagemode;
