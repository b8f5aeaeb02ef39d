//! Engine module - the merge / validate / commit state machine
//!
//! The engine owns the committed board, the active piece and the piece queue.
//! Every command builds a trial copy of the active piece, asks
//! [`Engine::merge`] what the board would look like with it, and only then
//! replaces live state. A rejected trial leaves everything untouched.
//!
//! The active piece is either *falling* or *grounded*. The first failed
//! downward step grounds it; a second one locks it. That single grace step is
//! the whole lock delay: timing belongs to whoever drives the engine.

use std::path::Path;

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::library::{LibraryError, PieceLibrary};
use crate::mino::Mino;
use crate::rng::PieceQueue;
use crate::scoring;
use crate::snapshot::GameSnapshot;
use crate::types::PREVIEW_LEN;

/// Hard drops never step by less than the tenths resolution of cell occupancy.
const MIN_HARD_DROP_STEP: f64 = 0.1;

/// Result of [`Engine::move_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved
    Moved,
    /// A downward step failed; the piece is now grounded
    Grounded,
    /// A downward step failed on a grounded piece; it was placed
    Locked,
    /// A sideways step failed; nothing changed
    Rejected,
}

/// Emitted every time a piece is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockEvent {
    pub lines_cleared: usize,
    pub points: f64,
    /// The piece could not be merged where it stood and the game ended
    pub topped_out: bool,
}

#[derive(Debug)]
pub enum EngineError {
    Library(LibraryError),
    Config(ConfigError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Library(e) => write!(f, "piece library: {}", e),
            EngineError::Config(e) => write!(f, "engine config: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Library(e) => Some(e),
            EngineError::Config(e) => Some(e),
        }
    }
}

impl From<LibraryError> for EngineError {
    fn from(e: LibraryError) -> Self {
        EngineError::Library(e)
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    queue: PieceQueue,
    active: Mino,
    score: f64,
    game_over: bool,
    /// Last placement (consumed by observers).
    last_event: Option<LockEvent>,
}

impl Engine {
    /// Create a game and spawn its first piece
    pub fn new(config: EngineConfig, library: PieceLibrary, seed: u32) -> Result<Self, EngineError> {
        config.validate()?;

        let mut queue = PieceQueue::new(library, seed);
        let active = Self::spawn(&mut queue, config.width);

        Ok(Self {
            config,
            board: Board::new(config.width, config.height),
            queue,
            active,
            score: 0.0,
            game_over: false,
            last_event: None,
        })
    }

    /// Create a game from a piece library file
    pub fn from_library_path(
        config: EngineConfig,
        path: impl AsRef<Path>,
        seed: u32,
    ) -> Result<Self, EngineError> {
        let library = PieceLibrary::from_path(path)?;
        Self::new(config, library, seed)
    }

    fn spawn(queue: &mut PieceQueue, width: usize) -> Mino {
        let mut mino = queue.draw();
        mino.move_by((width / 2) as f64 - 1.0, 0.0);
        mino
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Change the line-clear threshold (and score multiplier) between calls.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        let updated = self.config.with_threshold(threshold);
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> &Mino {
        &self.active
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    /// The next `n` pieces
    pub fn preview(&self, n: usize) -> impl Iterator<Item = &Mino> {
        self.queue.peek(n)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Take and clear the last placement event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// A shuffled copy of the whole library
    pub fn new_bag(&mut self) -> Vec<Mino> {
        self.queue.new_bag()
    }

    /// Draw the next piece and move it to the spawn column
    pub fn new_mino(&mut self) -> Mino {
        Self::spawn(&mut self.queue, self.config.width)
    }

    /// What the board would look like with `mino` merged in, or `None` if
    /// the placement is illegal. Never changes the engine.
    pub fn merge(&self, mino: &Mino) -> Option<Board> {
        self.board.merged_with(mino)
    }

    /// The board with the active piece merged in when that is legal,
    /// otherwise the committed board.
    pub fn preview_board(&self) -> Board {
        self.merge(&self.active)
            .unwrap_or_else(|| self.board.clone())
    }

    /// Try to translate the active piece
    pub fn move_by(&mut self, dx: f64, dy: f64) -> MoveOutcome {
        if !dx.is_finite() || !dy.is_finite() {
            return MoveOutcome::Rejected;
        }

        let mut trial = self.active.clone();
        trial.move_by(dx, dy);

        if self.merge(&trial).is_some() {
            self.active = trial;
            return MoveOutcome::Moved;
        }

        if dy == 0.0 {
            return MoveOutcome::Rejected;
        }

        if self.active.can_fall() {
            self.active.set_can_fall(false);
            MoveOutcome::Grounded
        } else {
            self.place();
            MoveOutcome::Locked
        }
    }

    /// Try to rotate the active piece about its pivot; no wall kicks.
    pub fn rotate(&mut self, angle_deg: f64) -> bool {
        if !angle_deg.is_finite() {
            return false;
        }

        let mut trial = self.active.clone();
        trial.rotate(angle_deg);

        if self.merge(&trial).is_some() {
            self.active = trial;
            return true;
        }
        false
    }

    /// Step down by `dy` until the piece is grounded, then place it.
    ///
    /// A non-positive step cannot make progress, so the piece is placed where
    /// it is.
    pub fn hard_drop(&mut self, dy: f64) -> LockEvent {
        if dy.is_finite() && dy > 0.0 {
            let step = dy.max(MIN_HARD_DROP_STEP);
            while self.active.can_fall() {
                self.move_by(0.0, step);
            }
        }
        self.place()
    }

    /// Commit the active piece, clear lines, score and draw the next piece.
    ///
    /// If the piece cannot be merged where it stands the game is over and the
    /// board is left as it was.
    pub fn place(&mut self) -> LockEvent {
        let topped_out = match self.merge(&self.active) {
            Some(board) => {
                self.board = board;
                false
            }
            None => {
                self.game_over = true;
                true
            }
        };

        let lines_cleared = self.clear_lines();
        let points = self.calculate_points(lines_cleared);
        self.active = self.new_mino();

        let event = LockEvent {
            lines_cleared,
            points,
            topped_out,
        };
        self.last_event = Some(event);
        event
    }

    /// Clear saturated rows at the current threshold. Awards no points.
    pub fn clear_lines(&mut self) -> usize {
        self.board.clear_lines(self.config.threshold)
    }

    /// Award points for `lines` cleared rows and return them.
    pub fn calculate_points(&mut self, lines: usize) -> f64 {
        let points = scoring::calculate_points(lines, self.config.threshold);
        self.score += points;
        points
    }

    /// Occupancy of each playable row of the committed board
    pub fn row_weights(&self) -> Vec<f64> {
        self.board.row_weights()
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self, PREVIEW_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// A one-block piece: lands predictably and never rotates into walls.
    fn dot_library() -> PieceLibrary {
        PieceLibrary::from_json_str(r#"[{"name": "dot", "color": [200, 0, 0], "blocks": [[0, 0, 1]]}]"#)
            .unwrap()
    }

    fn dot_engine(width: usize, height: usize) -> Engine {
        Engine::new(
            EngineConfig::default().with_size(width, height),
            dot_library(),
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_new_engine_spawns_centered() {
        let engine = dot_engine(6, 4);
        // width / 2 - 1 = 2
        assert_eq!(engine.active().pivot(), Point::new(2.5, 0.5));
        assert!(engine.active().can_fall());
        assert_eq!(engine.score(), 0.0);
        assert!(!engine.game_over());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Engine::new(
            EngineConfig::default().with_size(0, 4),
            dot_library(),
            1,
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_missing_library_fails_construction() {
        let result = Engine::from_library_path(EngineConfig::default(), "/no/such/pieces.json", 1);
        assert!(matches!(result, Err(EngineError::Library(_))));
    }

    #[test]
    fn test_move_accepts_and_rejects() {
        let mut engine = dot_engine(4, 4);
        // Spawn at x = 1.
        assert_eq!(engine.move_by(-1.0, 0.0), MoveOutcome::Moved);
        assert_eq!(engine.move_by(-1.0, 0.0), MoveOutcome::Rejected);
        assert_eq!(engine.active().pivot(), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_lock_delay_is_one_failed_step() {
        let mut engine = dot_engine(4, 2);
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Moved);
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Grounded);
        assert!(!engine.active().can_fall());
        assert!(engine.board().get(1, 1).unwrap().is_empty());

        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Locked);
        assert_eq!(engine.board().get(1, 1).unwrap().area(), 1.0);
        assert!(engine.active().can_fall());
        assert_eq!(engine.active().pivot(), Point::new(1.5, 0.5));
    }

    #[test]
    fn test_grounded_piece_can_still_slide() {
        let mut engine = dot_engine(4, 1);
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Grounded);
        assert_eq!(engine.move_by(1.0, 0.0), MoveOutcome::Moved);
        assert!(!engine.active().can_fall());
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Locked);
        assert_eq!(engine.board().get(2, 0).unwrap().area(), 1.0);
    }

    #[test]
    fn test_grounded_piece_stays_grounded_after_sliding_off_a_ledge() {
        let mut engine = dot_engine(4, 2);
        // Ledge right under the spawn cell, on the bottom row.
        let ledge = Mino::new("ledge", &[(1.0, 1.0, 1.0)], [5, 5, 5], None).unwrap();
        *engine.board_mut() = engine.board().merged_with(&ledge).unwrap();

        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Grounded);
        assert_eq!(engine.move_by(1.0, 0.0), MoveOutcome::Moved);
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Moved);
        assert!(!engine.active().can_fall());

        // No second grace step: the next failed fall locks.
        assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Locked);
        assert_eq!(engine.board().get(2, 1).unwrap().area(), 1.0);
    }

    #[test]
    fn test_hard_drop_lands_on_floor() {
        let mut engine = dot_engine(4, 5);
        let event = engine.hard_drop(1.0);
        assert_eq!(event.lines_cleared, 0);
        assert!(!event.topped_out);
        assert_eq!(engine.board().get(1, 4).unwrap().area(), 1.0);
        assert_eq!(engine.take_last_event(), Some(event));
        assert_eq!(engine.take_last_event(), None);
    }

    #[test]
    fn test_hard_drop_with_fractional_step() {
        let mut engine = dot_engine(4, 3);
        engine.hard_drop(0.5);
        assert_eq!(engine.board().get(1, 2).unwrap().area(), 1.0);
        assert!(engine.board().within_capacity());
    }

    #[test]
    fn test_hard_drop_without_progress_places_in_place() {
        let mut engine = dot_engine(4, 3);
        engine.hard_drop(0.0);
        assert_eq!(engine.board().get(1, 0).unwrap().area(), 1.0);
        engine.hard_drop(-1.0);
        // Second dot spawned on top of the first one.
        assert!(engine.game_over());
    }

    #[test]
    fn test_place_over_full_cell_ends_game() {
        let mut engine = dot_engine(4, 3);
        engine.place();
        let board_before = engine.board().clone();

        let event = engine.place();
        assert!(event.topped_out);
        assert!(engine.game_over());
        assert_eq!(engine.board(), &board_before);
    }

    #[test]
    fn test_full_row_scores_threshold() {
        let mut engine = dot_engine(2, 2);
        // Spawn column for width 2 is x = 0.
        engine.hard_drop(1.0);
        engine.move_by(1.0, 0.0);
        let event = engine.hard_drop(1.0);

        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.points, 100.0);
        assert_eq!(engine.score(), 100.0);
        assert_eq!(engine.row_weights(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_set_threshold_validates() {
        let mut engine = dot_engine(4, 4);
        assert!(engine.set_threshold(50.0).is_ok());
        assert_eq!(engine.threshold(), 50.0);
        assert!(engine.set_threshold(f64::INFINITY).is_err());
        assert_eq!(engine.threshold(), 50.0);
    }

    #[test]
    fn test_non_finite_commands_are_rejected() {
        let mut engine = dot_engine(4, 4);
        let before = engine.active().clone();
        assert_eq!(engine.move_by(f64::NAN, 0.0), MoveOutcome::Rejected);
        assert_eq!(engine.move_by(0.0, f64::INFINITY), MoveOutcome::Rejected);
        assert!(!engine.rotate(f64::NAN));
        assert_eq!(engine.active(), &before);
    }

    #[test]
    fn test_preview_board_shows_active_piece() {
        let engine = dot_engine(4, 4);
        let preview = engine.preview_board();
        assert_eq!(preview.get(1, 0).unwrap().area(), 1.0);
        assert!(engine.board().get(1, 0).unwrap().is_empty());
    }
}
