//! Snapshot module - read-only views for renderers and the JSON driver

use serde::Serialize;

use crate::cell::{Cell, CellColor};
use crate::engine::Engine;
use crate::geometry::Point;
use crate::mino::Mino;
use crate::types::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub vertices: [Point; 4],
    pub area: f64,
    pub color: CellColor,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            vertices: *cell.vertices(),
            area: cell.area(),
            color: cell.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSnapshot {
    pub vertices: [Point; 4],
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSnapshot {
    pub name: String,
    pub color: Rgb,
    pub pivot: Point,
    pub can_fall: bool,
    pub blocks: Vec<BlockSnapshot>,
}

impl From<&Mino> for ActiveSnapshot {
    fn from(mino: &Mino) -> Self {
        Self {
            name: mino.name().to_string(),
            color: mino.color(),
            pivot: mino.pivot(),
            can_fall: mino.can_fall(),
            blocks: mino
                .blocks()
                .iter()
                .map(|b| BlockSnapshot {
                    vertices: *b.quad.vertices(),
                    density: b.density,
                })
                .collect(),
        }
    }
}

/// Everything a renderer draws in one frame.
///
/// `board` holds the interior cells of the board with the active piece
/// merged in (walls and floor are left out), top row first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub threshold: f64,
    pub score: f64,
    pub game_over: bool,
    pub board: Vec<Vec<CellSnapshot>>,
    pub active: ActiveSnapshot,
    pub next: Vec<String>,
    pub row_weights: Vec<f64>,
}

impl GameSnapshot {
    pub fn capture(engine: &Engine, preview: usize) -> Self {
        let board = engine.preview_board();
        let cells = (0..board.height())
            .map(|y| board.interior(y).iter().map(CellSnapshot::from).collect())
            .collect();

        Self {
            width: engine.width(),
            height: engine.height(),
            threshold: engine.threshold(),
            score: engine.score(),
            game_over: engine.game_over(),
            board: cells,
            active: ActiveSnapshot::from(engine.active()),
            next: engine
                .preview(preview)
                .map(|m| m.name().to_string())
                .collect(),
            row_weights: engine.row_weights(),
        }
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::library::PieceLibrary;

    #[test]
    fn test_snapshot_shape() {
        let engine = Engine::new(
            EngineConfig::default().with_size(6, 8),
            PieceLibrary::standard(),
            7,
        )
        .unwrap();
        let snap = engine.snapshot();

        assert_eq!(snap.board.len(), 8);
        assert!(snap.board.iter().all(|row| row.len() == 6));
        assert_eq!(snap.next.len(), 5);
        assert_eq!(snap.row_weights.len(), 8);
        assert_eq!(snap.active.blocks.len(), 4);
        assert!(snap.playable());

        // The active piece shows up in the rendered cells but not in the weights.
        let drawn: f64 = snap.board.iter().flatten().map(|c| c.area).sum();
        assert!((drawn - 4.0).abs() < 1e-9);
        assert!(snap.row_weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = Engine::new(EngineConfig::default(), PieceLibrary::standard(), 1).unwrap();
        let value = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(value["width"], 10);
        assert_eq!(value["board"][19][0]["color"], serde_json::json!([20, 20, 20]));
        assert_eq!(value["board"][19][0]["vertices"][0]["x"], 0.0);
    }
}
