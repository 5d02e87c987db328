//! ECS resources made available to systems.
//!
//! Overview
//! - `camera2d` – view target and zoom animated by the ending sequences
//! - `input` – per-frame button and cursor state fed by the host
//! - `roster` – ordered handles to stage objects, composed ground, cursor hint
//! - `screensize` – playable area; leaving it is a fall-out
//! - `stageconfig` – tile size, player tuning and composer epsilons (INI)
//! - `stagestate` – current and pending stage mode plus round flags
//! - `worldtime` – simulation time and delta
pub mod camera2d;
pub mod input;
pub mod roster;
pub mod screensize;
pub mod stageconfig;
pub mod stagestate;
pub mod worldtime;
