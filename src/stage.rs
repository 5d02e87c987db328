//! The stage facade.
//!
//! [`Stage`] owns the ECS world, the per-update schedule and the observers.
//! A host drives it with one [`Stage::update`] and one [`Stage::draw`] per
//! frame, and polls [`Stage::load_stage_wait`] / [`Stage::load_select_wait`]
//! to know when a round's ending sequence is over.
//!
//! Entity layout: a stage root node sits at the centre of the playable
//! area; pieces hang from it, tiles and gimmicks hang from their piece.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::info;

use crate::components::gimmick::{Gimmick, GimmickKind};
use crate::components::player::PlayerBody;
use crate::components::stagepiece::StagePiece;
use crate::components::tile::Tile;
use crate::components::transformnode::Pose;
use crate::components::zindex::ZIndex;
use crate::descriptor::StageDesc;
use crate::events::gimmick::observe_goal_contact;
use crate::events::stagemode::observe_stage_mode_change;
use crate::geometry::{Circle, Polygon};
use crate::resources::camera2d::StageCamera;
use crate::resources::input::{InputFrame, InputState};
use crate::resources::roster::{CursorHint, StageHitboxes, StageRoster};
use crate::resources::screensize::ScreenSize;
use crate::resources::stageconfig::StageConfig;
use crate::resources::stagestate::{GameOverCause, NextStageMode, StageMode, StageState};
use crate::resources::worldtime::WorldTime;
use crate::systems::composer::build_piece_hitboxes;
use crate::systems::ending::{update_game_clear, update_game_over};
use crate::systems::hierarchy::{spawn_node, world_pose};
use crate::systems::input::update_input_state;
use crate::systems::piece::update_piece_action;
use crate::systems::player::update_player_action;
use crate::systems::render::{DrawList, extract_draw_list};
use crate::systems::stagemode::{
    change_mode, check_pending_mode, gimmick_circle, mode_is_arrangement, mode_is_clear,
    mode_is_gameover, mode_is_play,
};
use crate::systems::time::update_world_time;

pub struct Stage {
    world: World,
    update: Schedule,
}

impl Stage {
    /// Empty stage with `config` installed. Call [`Stage::create_stage`]
    /// before the first update.
    pub fn new(config: StageConfig) -> Result<Self, String> {
        let mut world = World::new();
        let (w, h) = config.area_size();
        let screen = ScreenSize { w, h };

        world.insert_resource(WorldTime::default().with_time_scale(1.0));
        world.insert_resource(screen);
        world.insert_resource(InputState::default());
        world.insert_resource(StageState::new());
        world.insert_resource(NextStageMode::new());
        world.insert_resource(StageHitboxes::default());
        world.insert_resource(CursorHint::default());
        world.insert_resource(StageCamera::new(screen.center()));
        world.insert_resource(config);

        let root = spawn_node(&mut world, Pose::from_position(screen.center()), None);
        world.insert_resource(StageRoster::new(root));

        world.spawn(Observer::new(observe_stage_mode_change));
        world.spawn(Observer::new(observe_goal_contact));
        // Ensure the observers are registered before any system triggers events.
        world.flush();

        let mut update = Schedule::default();
        update.add_systems(
            (
                change_mode,
                check_pending_mode,
                update_piece_action.run_if(mode_is_arrangement),
                update_player_action.run_if(mode_is_play),
                update_game_clear.run_if(mode_is_clear),
                update_game_over.run_if(mode_is_gameover),
            )
                .chain(),
        );
        update
            .initialize(&mut world)
            .map_err(|e| format!("Failed to initialize stage schedule: {}", e))?;

        Ok(Self { world, update })
    }

    /// Replace whatever is on stage with the stage `desc` describes and
    /// start a new round in arrangement mode.
    pub fn create_stage(&mut self, desc: &StageDesc) {
        spawn_stage(&mut self.world, desc);
    }

    /// Advance one frame.
    pub fn update(&mut self, frame: InputFrame, dt: f64) {
        update_world_time(&mut self.world, dt);
        update_input_state(&mut self.world, frame);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn draw(&self) -> DrawList {
        extract_draw_list(&self.world)
    }

    pub fn mode(&self) -> StageMode {
        self.world.resource::<StageState>().mode()
    }

    pub fn state(&self) -> &StageState {
        self.world.resource::<StageState>()
    }

    pub fn roster(&self) -> &StageRoster {
        self.world.resource::<StageRoster>()
    }

    /// Composed ground in world space, as of the last committed arrangement.
    pub fn world_hitboxes(&self) -> Vec<Polygon> {
        let root = self.roster().root;
        world_pose(&self.world, root)
            .map(|pose| self.world.resource::<StageHitboxes>().world(&pose))
            .unwrap_or_default()
    }

    /// Collision circle of a gimmick.
    pub fn collision(&self, gimmick: Entity) -> Option<Circle> {
        gimmick_circle(&self.world, gimmick)
    }

    /// Collision circles of every enabled, active player.
    pub fn player_collisions(&self) -> Vec<Circle> {
        self.roster()
            .players
            .iter()
            .filter(|&&e| {
                self.world
                    .get::<Gimmick>(e)
                    .is_some_and(|g| g.is_enabled() && g.is_active())
            })
            .filter_map(|&e| self.collision(e))
            .collect()
    }

    pub fn set_game_clear(&mut self) {
        self.world.resource_mut::<StageState>().set_game_clear();
    }

    pub fn set_game_over(&mut self, cause: GameOverCause) {
        self.world.resource_mut::<StageState>().set_game_over(cause);
    }

    /// The game-over sequence is over: reload this stage.
    pub fn load_stage_wait(&self) -> bool {
        self.state().load_stage_wait()
    }

    /// The clear sequence is over: go to stage select.
    pub fn load_select_wait(&self) -> bool {
        self.state().load_select_wait()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

/// Build the entities for `desc` under a fresh stage root and reset the
/// round resources.
pub fn spawn_stage(world: &mut World, desc: &StageDesc) {
    let tile = world.resource::<StageConfig>().tile_size;
    let center = world.resource::<ScreenSize>().center();

    if let Some(old) = world.get_resource::<StageRoster>().map(|r| r.root) {
        // Despawning the root takes every piece, tile and gimmick with it.
        world.despawn(old);
    }

    let root = spawn_node(world, Pose::from_position(center), None);
    let mut roster = StageRoster::new(root);
    let mut tile_count = 0;

    for (index, pd) in desc.pieces.iter().enumerate() {
        let piece = spawn_node(
            world,
            Pose::new(pd.position * tile, DVec2::splat(pd.scale), pd.angle),
            Some(root),
        );
        let mut stage_piece = StagePiece::new(pd.kind, pd.back_size * tile, pd.capabilities());

        for td in &pd.tiles {
            let node = spawn_node(
                world,
                Pose::new(td.position * tile, DVec2::splat(tile), td.angle),
                Some(piece),
            );
            world.entity_mut(node).insert(Tile {
                shape: td.shape,
                uv: td.uv,
            });
            stage_piece.tiles.push(node);
        }
        tile_count += pd.tiles.len();

        for gd in &pd.gimmicks {
            let local = gd.position * tile + Gimmick::anchor_offset(gd.kind, tile);
            let node = spawn_node(world, Pose::new(local, DVec2::ONE, gd.angle), Some(piece));
            world.entity_mut(node).insert(Gimmick::new(gd.kind, tile));
            match gd.kind {
                GimmickKind::Player => {
                    let angle = world_pose(world, node).map_or(0.0, |p| p.angle);
                    world.entity_mut(node).insert(PlayerBody::new(angle));
                    roster.players.push(node);
                }
                GimmickKind::Goal => roster.goals.push(node),
            }
            stage_piece.gimmicks.push(node);
        }

        world
            .entity_mut(piece)
            .insert((stage_piece, ZIndex(index as i32)));
        build_piece_hitboxes(world, piece);
        roster.pieces.push(piece);
    }

    info!(
        "Stage '{}' created: {} pieces, {} tiles, {} players, {} goals",
        desc.name,
        roster.pieces.len(),
        tile_count,
        roster.players.len(),
        roster.goals.len()
    );

    world.insert_resource(roster);
    world.insert_resource(StageState::new());
    world.insert_resource(NextStageMode::new());
    world.insert_resource(StageHitboxes::default());
    world.insert_resource(CursorHint::default());
    world.insert_resource(StageCamera::new(center));
}
