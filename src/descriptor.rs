//! Stage descriptors.
//!
//! Plain serde records describing a stage: its pieces, each piece's tiles
//! and the gimmicks placed on it. Positions are in tile units; the stage
//! multiplies them by the configured tile size when it builds the world.
//!
//! [`StageDesc::fallback`] is the built-in stage used when no descriptor
//! file is given or it cannot be read.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::components::gimmick::GimmickKind;
use crate::components::stagepiece::{PieceCapabilities, PieceKind};
use crate::components::tile::TileShape;

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDesc {
    #[serde(default)]
    pub name: String,
    /// Pieces in draw order.
    pub pieces: Vec<PieceDesc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceDesc {
    /// Footprint centre relative to the stage centre.
    pub position: DVec2,
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default)]
    pub angle: f64,
    pub back_size: DVec2,
    #[serde(default)]
    pub can_move: bool,
    #[serde(default)]
    pub can_scale: bool,
    #[serde(default)]
    pub can_rotate: bool,
    #[serde(default)]
    pub kind: PieceKind,
    #[serde(default)]
    pub tiles: Vec<TileDesc>,
    #[serde(default)]
    pub gimmicks: Vec<GimmickDesc>,
}

/// A tile; `position` is its cell's top-left corner in piece space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileDesc {
    pub position: DVec2,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub shape: TileShape,
    #[serde(default)]
    pub uv: IVec2,
}

/// A gimmick standing on the bottom of the cell at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GimmickDesc {
    pub position: DVec2,
    #[serde(default)]
    pub angle: f64,
    pub kind: GimmickKind,
}

impl PieceDesc {
    pub fn new(kind: PieceKind, position: DVec2, back_size: DVec2) -> Self {
        Self {
            position,
            scale: 1.0,
            angle: 0.0,
            back_size,
            can_move: false,
            can_scale: false,
            can_rotate: false,
            kind,
            tiles: Vec::new(),
            gimmicks: Vec::new(),
        }
    }

    pub fn capabilities(&self) -> PieceCapabilities {
        PieceCapabilities {
            can_move: self.can_move,
            can_scale: self.can_scale,
            can_rotate: self.can_rotate,
        }
    }

    fn with_all_capabilities(mut self) -> Self {
        self.can_move = true;
        self.can_scale = true;
        self.can_rotate = true;
        self
    }

    fn tile(mut self, x: f64, y: f64, shape: TileShape, uv: IVec2) -> Self {
        self.tiles.push(TileDesc {
            position: DVec2::new(x, y),
            angle: 0.0,
            shape,
            uv,
        });
        self
    }

    fn gimmick(mut self, kind: GimmickKind, x: f64, y: f64) -> Self {
        self.gimmicks.push(GimmickDesc {
            position: DVec2::new(x, y),
            angle: 0.0,
            kind,
        });
        self
    }
}

impl StageDesc {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse stage descriptor: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize stage descriptor: {}", e))
    }

    /// Built-in five-piece stage: a fixed floor carrying the player, the
    /// goal and a slope; two solid blocks; a movable gravity strip and a
    /// movable void strip.
    pub fn fallback() -> Self {
        let square = TileShape::Square;

        let mut floor = PieceDesc::new(
            PieceKind::Normal,
            DVec2::new(0.0, 5.0),
            DVec2::new(10.0, 10.0),
        );
        for i in 0..10 {
            floor = floor.tile(-5.0 + i as f64, 4.0, square, IVec2::new(8, 0));
        }
        for y in 6..10 {
            floor = floor.tile(0.0, y as f64 - 5.0, square, IVec2::new(8, 0));
        }
        floor = floor
            .tile(-1.0, 3.0, TileShape::Triangle, IVec2::new(8, 1))
            .gimmick(GimmickKind::Player, -4.0, 3.0)
            .gimmick(GimmickKind::Goal, 3.0, 3.0);

        let mut left_block = PieceDesc::new(
            PieceKind::Normal,
            DVec2::new(-3.5, -3.0),
            DVec2::new(8.0, 6.0),
        );
        for y in 0..6 {
            for x in 0..8 {
                left_block = left_block.tile(
                    -4.0 + x as f64,
                    -3.0 + y as f64,
                    square,
                    IVec2::new(x, y),
                );
            }
        }

        let mut right_block = PieceDesc::new(
            PieceKind::Normal,
            DVec2::new(4.0, -3.0),
            DVec2::new(7.0, 6.0),
        );
        for y in 0..6 {
            for x in 0..7 {
                right_block = right_block.tile(
                    -3.5 + x as f64,
                    -3.0 + y as f64,
                    square,
                    IVec2::new(x + 9, y),
                );
            }
        }

        let strip = |kind: PieceKind, x: f64| {
            let mut piece = PieceDesc::new(kind, DVec2::new(x, 5.0), DVec2::new(6.0, 5.0))
                .with_all_capabilities();
            for i in 0..6 {
                piece = piece.tile(-3.0 + i as f64, -0.5, square, IVec2::new(8, 0));
            }
            piece
        };

        Self {
            name: "default".to_string(),
            pieces: vec![
                floor,
                left_block,
                right_block,
                strip(PieceKind::Gravity, -8.0),
                strip(PieceKind::Void, 8.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_one_player_and_one_goal() {
        let desc = StageDesc::fallback();
        assert_eq!(desc.pieces.len(), 5);
        let gimmicks: Vec<GimmickKind> = desc
            .pieces
            .iter()
            .flat_map(|p| p.gimmicks.iter().map(|g| g.kind))
            .collect();
        assert_eq!(gimmicks, vec![GimmickKind::Player, GimmickKind::Goal]);
        assert_eq!(desc.pieces[1].tiles.len(), 48);
        assert_eq!(desc.pieces[4].kind, PieceKind::Void);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let text = r#"{
            "pieces": [
                {
                    "position": [1.0, 2.0],
                    "back_size": [3.0, 3.0],
                    "kind": "Gravity",
                    "tiles": [ { "position": [0.0, 0.0], "shape": "Triangle" } ],
                    "gimmicks": [ { "position": [0.0, -1.0], "kind": "Goal" } ]
                }
            ]
        }"#;
        let desc = StageDesc::from_json(text).unwrap();
        let piece = &desc.pieces[0];
        assert_eq!(piece.scale, 1.0);
        assert_eq!(piece.kind, PieceKind::Gravity);
        assert!(!piece.capabilities().can_move);
        assert_eq!(piece.tiles[0].uv, IVec2::ZERO);
        assert_eq!(piece.gimmicks[0].kind, GimmickKind::Goal);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let text = r#"{ "pieces": [ { "position": [0, 0], "back_size": [1, 1], "kind": "Lava" } ] }"#;
        assert!(StageDesc::from_json(text).is_err());
    }
}
