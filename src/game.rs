//! Placement engine: board, piece queue, validity check, movement, rotation, commit, completion.

use crate::board::{Cell, Grid, Piece, Position};
use crate::catalog::{Catalog, PiecePicker};
use crate::{Eligibility, GameConfig};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No playable cell remains: the silhouette is covered.
    Completed,
    /// The freshly spawned piece has no valid placement.
    Blocked,
}

/// Engine lifecycle. `Committed` is transient inside [`GameState::place`] and never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Active,
    GameOver(Outcome),
}

/// Owned read-only copy of the engine state for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub position: Position,
    pub phase: Phase,
    pub eligibility: Eligibility,
    pub parity: bool,
    pub placed: u32,
    pub target_cells: usize,
    /// Board cells written by the most recent commit.
    pub last_commit: Vec<Position>,
}

impl GameSnapshot {
    pub fn remaining(&self) -> usize {
        self.grid.count(Cell::Playable)
    }

    /// Covered share of the silhouette, 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        if self.target_cells == 0 {
            return 1.0;
        }
        let covered = self.target_cells.saturating_sub(self.remaining());
        (covered as f64 / self.target_cells as f64).min(1.0)
    }
}

/// Game state: board, current/next piece, position, phase.
///
/// Whenever `current` is present the phase is [`Phase::Active`] and the piece is validly
/// placed at `position`. Every mutator rejects instead of breaking that.
#[derive(Debug)]
pub struct GameState {
    catalog: Catalog,
    grid: Grid,
    picker: Box<dyn PiecePicker>,
    eligibility: Eligibility,
    parity: bool,
    current: Option<Piece>,
    next: Option<Piece>,
    position: Position,
    phase: Phase,
    placed: u32,
    target_cells: usize,
    last_commit: Vec<Position>,
}

impl GameState {
    /// Engine in `Spawning` with no pieces; call [`GameState::reset`] to start.
    pub fn new(catalog: Catalog, config: &GameConfig, picker: Box<dyn PiecePicker>) -> Self {
        let grid = catalog.shape().clone();
        let target_cells = grid.count(Cell::Playable);
        Self {
            catalog,
            grid,
            picker,
            eligibility: config.eligibility,
            parity: config.parity,
            current: None,
            next: None,
            position: Position::ORIGIN,
            phase: Phase::Spawning,
            placed: 0,
            target_cells,
            last_commit: Vec::new(),
        }
    }

    /// Restore the board from the catalog shape and spawn fresh current/next pieces.
    pub fn reset(&mut self) {
        self.grid = self.catalog.shape().clone();
        self.current = None;
        self.next = None;
        self.position = Position::ORIGIN;
        self.placed = 0;
        self.last_commit.clear();
        log::info!(
            "reset: {}x{} board, {} target cells, {:?}{}",
            self.grid.width(),
            self.grid.height(),
            self.target_cells,
            self.eligibility,
            if self.parity { " with parity" } else { "" }
        );
        self.spawn();
    }

    /// Whether a piece may currently occupy `cell`.
    pub fn is_eligible(&self, cell: Cell) -> bool {
        match self.eligibility {
            Eligibility::Obstacle => cell != Cell::Filled,
            Eligibility::MaskFill => cell == Cell::Playable,
        }
    }

    /// True if every occupied cell of `piece` lands in bounds on an eligible cell (and on
    /// the matching triangle orientation when parity is on).
    pub fn can_place(&self, piece: &Piece, position: Position) -> bool {
        let origin_parity = (position.x + position.y).rem_euclid(2);
        piece.occupied().all(|(r, c)| {
            let x = position.x + c as i32;
            let y = position.y + r as i32;
            let eligible = self
                .grid
                .get(x, y)
                .is_some_and(|cell| self.is_eligible(cell));
            eligible && (!self.parity || (x + y).rem_euclid(2) == origin_parity)
        })
    }

    /// First valid position for `piece` in row-major order, starting where its occupied
    /// cells first touch the top-left corner. Empty edge rows and columns may hang off the board.
    pub fn first_fit(&self, piece: &Piece) -> Option<Position> {
        let (min_r, max_r, min_c, max_c) = piece.occupied().fold(
            (usize::MAX, 0, usize::MAX, 0),
            |(min_r, max_r, min_c, max_c), (r, c)| {
                (min_r.min(r), max_r.max(r), min_c.min(c), max_c.max(c))
            },
        );
        let xs = -(min_c as i32)..self.grid.width() as i32 - max_c as i32;
        let ys = -(min_r as i32)..self.grid.height() as i32 - max_r as i32;
        ys.flat_map(|y| xs.clone().map(move |x| Position::new(x, y)))
            .find(|&p| self.can_place(piece, p))
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let Some(piece) = self.current.as_ref() else {
            return false;
        };
        let target = self.position.offset(dx, dy);
        if !self.can_place(piece, target) {
            return false;
        }
        self.position = target;
        true
    }

    /// Quarter-turn the current piece in place; discarded when the result would not fit.
    pub fn rotate_current(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let Some(rotated) = self.current.as_ref().map(Piece::rotated) else {
            return false;
        };
        if !self.can_place(&rotated, self.position) {
            return false;
        }
        self.current = Some(rotated);
        true
    }

    /// Commit the current piece at `target`, or at the tracked position when `None`.
    ///
    /// On success the queue advances (next becomes current, a fresh piece becomes next)
    /// and the new piece spawns, unless the silhouette is now covered.
    pub fn place(&mut self, target: Option<Position>) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let position = target.unwrap_or(self.position);
        let valid = self
            .current
            .as_ref()
            .is_some_and(|piece| self.can_place(piece, position));
        if !valid {
            log::debug!("commit rejected at ({}, {})", position.x, position.y);
            return false;
        }
        let Some(piece) = self.current.take() else {
            return false;
        };

        self.last_commit.clear();
        for (r, c) in piece.occupied() {
            let x = position.x + c as i32;
            let y = position.y + r as i32;
            // In bounds: checked by can_place.
            self.grid.set(x as usize, y as usize, Cell::Filled);
            self.last_commit.push(Position::new(x, y));
        }
        self.placed += 1;
        self.position = Position::ORIGIN;
        log::debug!(
            "committed piece #{} at ({}, {}), {} cells left",
            self.placed,
            position.x,
            position.y,
            self.remaining()
        );

        if self.target_cells > 0 && self.remaining() == 0 {
            self.complete();
        } else {
            self.spawn();
        }
        true
    }

    fn complete(&mut self) {
        self.current = None;
        self.position = Position::ORIGIN;
        self.phase = Phase::GameOver(Outcome::Completed);
        log::info!("silhouette completed with {} pieces", self.placed);
    }

    /// One gravity step: fall one row, or commit where the piece rests.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.move_by(0, 1) || self.place(None)
    }

    fn draw(&mut self) -> Piece {
        let len = self.catalog.variants().len();
        let index = self.picker.pick(len) % len;
        self.catalog.variants()[index].clone()
    }

    fn spawn(&mut self) {
        self.phase = Phase::Spawning;
        // Mask-fill play has nothing left to cover once no playable cell remains.
        if self.eligibility == Eligibility::MaskFill && self.remaining() == 0 {
            self.complete();
            return;
        }
        let piece = match self.next.take() {
            Some(p) => p,
            None => self.draw(),
        };
        self.next = Some(self.draw());

        match self.spawn_placement(piece) {
            Some((piece, position)) => {
                log::debug!(
                    "spawned {}x{} piece at ({}, {})",
                    piece.width(),
                    piece.height(),
                    position.x,
                    position.y
                );
                self.current = Some(piece);
                self.position = position;
                self.phase = Phase::Active;
            }
            None => {
                self.current = None;
                self.position = Position::ORIGIN;
                self.phase = Phase::GameOver(Outcome::Blocked);
                log::info!(
                    "blocked after {} pieces, {} cells left",
                    self.placed,
                    self.remaining()
                );
            }
        }
    }

    /// Falling play spawns at the origin only; mask-fill scans from it, trying all four turns.
    fn spawn_placement(&self, piece: Piece) -> Option<(Piece, Position)> {
        match self.eligibility {
            Eligibility::Obstacle => self
                .can_place(&piece, Position::ORIGIN)
                .then_some((piece, Position::ORIGIN)),
            Eligibility::MaskFill => {
                let mut candidate = piece;
                for _ in 0..4 {
                    if let Some(position) = self.first_fit(&candidate) {
                        return Some((candidate, position));
                    }
                    candidate = candidate.rotated();
                }
                None
            }
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[inline]
    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    #[inline]
    pub fn placed(&self) -> u32 {
        self.placed
    }

    /// Playable cells not yet covered.
    pub fn remaining(&self) -> usize {
        self.grid.count(Cell::Playable)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.clone(),
            current: self.current.clone(),
            next: self.next.clone(),
            position: self.position,
            phase: self.phase,
            eligibility: self.eligibility,
            parity: self.parity,
            placed: self.placed,
            target_cells: self.target_cells,
            last_commit: self.last_commit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{grid, piece};
    use crate::catalog::{CyclePicker, RandomPicker, DEFAULT_BOARD};
    use proptest::prelude::*;

    fn engine_with(
        shape: &[&str],
        pieces: &[&[&str]],
        eligibility: Eligibility,
        parity: bool,
    ) -> GameState {
        let catalog =
            Catalog::new(grid(shape), pieces.iter().map(|p| piece(p)).collect()).unwrap();
        let config = GameConfig {
            eligibility,
            parity,
        };
        let mut state = GameState::new(catalog, &config, Box::new(CyclePicker::default()));
        state.reset();
        state
    }

    fn engine(shape: &[&str], pieces: &[&[&str]], eligibility: Eligibility) -> GameState {
        engine_with(shape, pieces, eligibility, false)
    }

    #[test]
    fn test_single_cell_fills_silhouette() {
        let mut state = engine(&["000", "010", "000"], &[&["1"]], Eligibility::MaskFill);
        let single = piece(&["1"]);
        let centre = Position::new(1, 1);
        assert_eq!(state.position(), centre);
        assert!(state.can_place(&single, centre));

        assert!(state.place(Some(centre)));
        assert_eq!(state.grid().get(1, 1), Some(Cell::Filled));
        assert!(state.is_over());
        assert_eq!(state.outcome(), Some(Outcome::Completed));

        assert!(!state.can_place(&single, centre));
        assert!(!state.place(Some(centre)));
    }

    #[test]
    fn test_can_place_is_translation_aware() {
        let single = piece(&["1"]);
        for (shape, eligibility) in [
            (["0000", "0000", "0000"], Eligibility::Obstacle),
            (["1111", "1111", "1111"], Eligibility::MaskFill),
        ] {
            let state = engine(&shape, &[&["1"]], eligibility);
            for y in -2..5 {
                for x in -2..6 {
                    let inside = (0..4).contains(&x) && (0..3).contains(&y);
                    assert_eq!(
                        state.can_place(&single, Position::new(x, y)),
                        inside,
                        "({x}, {y}) {eligibility:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_place_twice_at_same_position() {
        let mut state = engine(&["111"], &[&["1"]], Eligibility::MaskFill);
        let target = Position::new(1, 0);
        assert!(state.place(Some(target)));
        let before = state.grid().clone();
        assert!(!state.place(Some(target)));
        assert_eq!(state.grid(), &before);
        assert_eq!(state.placed(), 1);
    }

    #[test]
    fn test_obstacle_mode_rejects_filled_accepts_empty() {
        let state = engine(&["0x1"], &[&["1"]], Eligibility::Obstacle);
        let single = piece(&["1"]);
        assert!(state.can_place(&single, Position::new(0, 0)));
        assert!(!state.can_place(&single, Position::new(1, 0)));
        assert!(state.can_place(&single, Position::new(2, 0)));
    }

    #[test]
    fn test_mask_fill_rejects_outside_silhouette() {
        let state = engine(&["01", "11"], &[&["1"]], Eligibility::MaskFill);
        assert!(!state.can_place(&piece(&["11"]), Position::new(0, 0)));
        assert!(state.can_place(&piece(&["11"]), Position::new(0, 1)));
        assert!(state.can_place(&piece(&["01", "11"]), Position::new(0, 0)));
    }

    #[test]
    fn test_reset_restores_shape_and_spawn() {
        let shape = ["0110", "1111", "0110"];
        let mut state = engine(&shape, &[&["11"], &["1"]], Eligibility::MaskFill);
        assert!(state.place(None));
        assert!(state.place(None));
        assert_ne!(state.grid(), &grid(&shape));

        state.reset();
        assert_eq!(state.grid(), &grid(&shape));
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.placed(), 0);
        let current = state.current().unwrap();
        assert!(state.can_place(current, state.position()));
        assert!(state.next().is_some());
    }

    #[test]
    fn test_move_past_right_edge_is_rejected() {
        let mut state = engine(&["000", "000", "000"], &[&["11"]], Eligibility::Obstacle);
        assert_eq!(state.position(), Position::ORIGIN);
        assert!(state.move_by(1, 0));
        assert!(!state.move_by(1, 0));
        assert_eq!(state.position(), Position::new(1, 0));
        assert!(!state.move_by(-2, 0));
        assert!(!state.move_by(0, 3));
        assert_eq!(state.position(), Position::new(1, 0));
    }

    #[test]
    fn test_operations_before_spawn_are_noops() {
        let catalog = Catalog::new(grid(&["11"]), vec![piece(&["1"])]).unwrap();
        let config = GameConfig {
            eligibility: Eligibility::MaskFill,
            parity: false,
        };
        let mut state = GameState::new(catalog, &config, Box::new(CyclePicker::default()));
        assert_eq!(state.phase(), Phase::Spawning);
        assert!(!state.move_by(1, 0));
        assert!(!state.rotate_current());
        assert!(!state.place(None));
        assert!(!state.place(Some(Position::ORIGIN)));
        assert!(!state.tick());
        assert!(state.current().is_none());
        assert_eq!(state.grid(), &grid(&["11"]));
    }

    #[test]
    fn test_rotation_rejected_when_it_would_not_fit() {
        let mut state = engine(&["000"], &[&["111"]], Eligibility::Obstacle);
        assert!(!state.rotate_current());
        assert_eq!(state.current(), Some(&piece(&["111"])));
    }

    #[test]
    fn test_rotation_applied_when_it_fits() {
        let mut state = engine(&["000", "000"], &[&["11", "10"]], Eligibility::Obstacle);
        assert!(state.rotate_current());
        assert_eq!(state.current(), Some(&piece(&["11", "01"])));
    }

    #[test]
    fn test_obstacle_spawn_blocked_at_origin() {
        let mut state = engine(&["11"], &[&["1"]], Eligibility::Obstacle);
        assert!(state.place(None));
        assert_eq!(state.outcome(), Some(Outcome::Blocked));
        assert!(state.current().is_none());
        assert!(!state.move_by(1, 0));
        assert!(!state.rotate_current());
        assert!(!state.place(Some(Position::new(1, 0))));
        assert_eq!(state.grid().get(1, 0), Some(Cell::Playable));
    }

    #[test]
    fn test_mask_fill_spawn_rotates_to_fit() {
        let state = engine(&["1", "1"], &[&["11"]], Eligibility::MaskFill);
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.current(), Some(&piece(&["1", "1"])));
        assert_eq!(state.position(), Position::ORIGIN);
    }

    #[test]
    fn test_mask_fill_spawn_blocked_when_nothing_fits() {
        let state = engine(&["101"], &[&["11"]], Eligibility::MaskFill);
        assert_eq!(state.outcome(), Some(Outcome::Blocked));
        assert!(state.next().is_some());
    }

    #[test]
    fn test_parity_requires_matching_orientation() {
        let state = engine_with(&["111", "111", "111"], &[&["1"]], Eligibility::MaskFill, true);
        let domino = piece(&["11"]);
        for y in 0..3 {
            for x in 0..2 {
                assert!(!state.can_place(&domino, Position::new(x, y)));
            }
        }
        assert!(state.can_place(&piece(&["101"]), Position::new(0, 0)));
        assert!(state.can_place(&piece(&["10", "01"]), Position::new(1, 1)));

        let plain = engine(&["111", "111", "111"], &[&["1"]], Eligibility::MaskFill);
        assert!(plain.can_place(&domino, Position::new(1, 2)));
    }

    #[test]
    fn test_tick_falls_then_commits() {
        let mut state = engine(&["11", "11", "11"], &[&["1"]], Eligibility::Obstacle);
        assert!(state.tick());
        assert_eq!(state.position(), Position::new(0, 1));
        assert!(state.tick());
        assert_eq!(state.position(), Position::new(0, 2));
        assert!(state.tick());
        assert_eq!(state.grid().get(0, 2), Some(Cell::Filled));
        assert_eq!(state.placed(), 1);
        assert_eq!(state.position(), Position::ORIGIN);
        assert_eq!(state.phase(), Phase::Active);
    }

    #[test]
    fn test_queue_advances_on_commit() {
        let mut state = engine(
            &["1111", "1111"],
            &[&["1"], &["11"], &["1", "1"]],
            Eligibility::MaskFill,
        );
        assert_eq!(state.current(), Some(&piece(&["1"])));
        assert_eq!(state.next(), Some(&piece(&["11"])));
        assert!(state.place(Some(Position::new(3, 1))));
        assert_eq!(state.current(), Some(&piece(&["11"])));
        assert_eq!(state.next(), Some(&piece(&["1", "1"])));
        assert_eq!(state.position(), Position::ORIGIN);
    }

    #[test]
    fn test_explicit_target_writes_there() {
        let mut state = engine(&["0000", "0000"], &[&["11", "10"]], Eligibility::Obstacle);
        assert!(state.place(Some(Position::new(2, 0))));
        let snapshot = state.snapshot();
        assert_eq!(
            snapshot.last_commit,
            vec![
                Position::new(2, 0),
                Position::new(3, 0),
                Position::new(2, 1)
            ]
        );
        assert_eq!(snapshot.grid.count(Cell::Filled), 3);
        assert_eq!(snapshot.placed, 1);
    }

    #[test]
    fn test_piece_with_empty_leading_column_may_sit_left_of_board() {
        let mut state = engine(&["000", "000"], &[&["1"]], Eligibility::Obstacle);
        let hook = piece(&["01", "11"]);
        assert!(!state.can_place(&hook, Position::new(-1, 0)));
        let hanging = piece(&["01", "01"]);
        assert!(state.can_place(&hanging, Position::new(-1, 0)));
        assert!(state.place(Some(Position::new(2, 1))));
        assert_eq!(state.grid().get(2, 1), Some(Cell::Filled));
    }

    #[test]
    fn test_game_over_rejects_until_reset() {
        let mut state = engine(&["1"], &[&["1"]], Eligibility::MaskFill);
        assert!(state.place(None));
        assert_eq!(state.outcome(), Some(Outcome::Completed));
        assert!(!state.tick());
        assert!(!state.move_by(0, 0));
        assert!(!state.rotate_current());
        state.reset();
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.remaining(), 1);
    }

    #[test]
    fn test_padded_piece_spawns_hanging_off_board() {
        let padded = piece(&["00", "01"]);
        let mut state = engine(&["1"], &[&["00", "01"]], Eligibility::MaskFill);
        assert!(!state.is_over());
        assert_eq!(state.first_fit(&padded), Some(Position::new(-1, -1)));
        assert_eq!(state.position(), Position::new(-1, -1));
        assert!(state.place(None));
        assert_eq!(state.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_first_fit_scans_row_major_over_occupied_extent() {
        let state = engine(&["001", "010"], &[&["1"]], Eligibility::MaskFill);
        assert_eq!(
            state.first_fit(&piece(&["0", "1"])),
            Some(Position::new(2, -1))
        );
        assert_eq!(state.first_fit(&piece(&["10", "00"])), Some(Position::new(2, 0)));
        assert_eq!(state.first_fit(&piece(&["11"])), None);
    }

    #[test]
    fn test_mask_fill_without_playable_cells_is_completed() {
        let mut state = engine(&["000"], &[&["1"]], Eligibility::MaskFill);
        assert_eq!(state.outcome(), Some(Outcome::Completed));
        assert!(state.current().is_none());
        assert!(!state.place(Some(Position::ORIGIN)));
        state.reset();
        assert_eq!(state.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_obstacle_board_without_playable_cells_keeps_going() {
        let mut state = engine(&["000", "000"], &[&["1"]], Eligibility::Obstacle);
        assert_eq!(state.phase(), Phase::Active);
        assert!(state.place(Some(Position::new(2, 1))));
        assert_eq!(state.phase(), Phase::Active);
        assert!(state.place(None));
        assert_eq!(state.outcome(), Some(Outcome::Blocked));
    }

    #[test]
    fn test_snapshot_progress() {
        let mut state = engine(&["11", "11"], &[&["11"]], Eligibility::MaskFill);
        assert_eq!(state.snapshot().progress(), 0.0);
        assert!(state.place(None));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.remaining(), 2);
        assert!((snapshot.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Move(i32, i32),
        Rotate,
        Place,
        PlaceAt(i32, i32),
        Tick,
        Reset,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-2i32..=2, -2i32..=2).prop_map(|(dx, dy)| Op::Move(dx, dy)),
            Just(Op::Rotate),
            Just(Op::Place),
            (-1i32..6, -1i32..6).prop_map(|(x, y)| Op::PlaceAt(x, y)),
            Just(Op::Tick),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn engine_never_leaves_valid_states(
            seed in any::<u64>(),
            obstacle in any::<bool>(),
            ops in proptest::collection::vec(arb_op(), 1..60),
        ) {
            let catalog = Catalog::parse(DEFAULT_BOARD, false).unwrap();
            let shape = catalog.shape().clone();
            let config = GameConfig {
                eligibility: if obstacle { Eligibility::Obstacle } else { Eligibility::MaskFill },
                parity: false,
            };
            let mut state = GameState::new(catalog, &config, Box::new(RandomPicker::new(seed)));
            state.reset();

            for op in ops {
                let filled_before = state.grid().count(Cell::Filled);
                let grid_before = state.grid().clone();
                let accepted = match op {
                    Op::Move(dx, dy) => state.move_by(dx, dy),
                    Op::Rotate => state.rotate_current(),
                    Op::Place => state.place(None),
                    Op::PlaceAt(x, y) => state.place(Some(Position::new(x, y))),
                    Op::Tick => state.tick(),
                    Op::Reset => {
                        state.reset();
                        prop_assert_eq!(state.grid(), &shape);
                        true
                    }
                };

                if let Some(current) = state.current() {
                    prop_assert_eq!(state.phase(), Phase::Active);
                    prop_assert!(state.can_place(current, state.position()));
                } else {
                    prop_assert!(state.is_over());
                }
                if !accepted {
                    prop_assert_eq!(state.grid(), &grid_before);
                } else if !matches!(op, Op::Reset) {
                    prop_assert!(state.grid().count(Cell::Filled) >= filled_before);
                }
                prop_assert_eq!(state.grid().width(), shape.width());
                prop_assert_eq!(state.grid().height(), shape.height());
            }
        }
    }
}
