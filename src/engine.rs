//! Core engine for the sliding-tile puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Board`: the permutation of tile values over the grid, with O(1)
//!   value/position lookups, adjacency helpers and win detection.
//! - `Game`: the session state machine (idle, playing, won) that validates
//!   and applies moves, drives the shuffle, throttles hints and queues
//!   `GameEvent`s for the surrounding UI layer.
//! - `GameError` / `GameEvent`: the typed signals crossing the engine
//!   boundary.
use crate::hint::{self, Hint, HintThrottle, DEFAULT_HINT_COOLDOWN};
use crate::shuffle::{ShuffleConfig, ShuffleRun};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Smallest supported board edge length.
pub const MIN_SIZE: usize = 2;
/// Largest supported board edge length. Keeps every tile value within `u8`
/// with room to spare; practical play happens on 3 to 6.
pub const MAX_SIZE: usize = 10;

/// The session phase of a [`Game`].
///
/// A game starts `Idle` (solved board, waiting for a shuffle), becomes
/// `Playing` when a shuffle completes, and `Won` when the win detector
/// fires. `Won` freezes moves and hints until a reset or a new shuffle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created or reset; not yet shuffled.
    Idle,
    /// Shuffled and accepting moves.
    Playing,
    /// Solved; moves and hints are rejected.
    Won,
}

/// Errors reported across the engine boundary. All of them are
/// recoverable; none leaves the board in a partial state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// The requested tile is not on the board or not adjacent to the
    /// empty cell. Carries the computed indices so the caller can flag
    /// the rejected tile.
    IllegalMove {
        value: u8,
        tile_index: Option<usize>,
        empty_index: usize,
    },
    /// A move or hint was requested outside the `Playing` phase.
    InvalidState { phase: Phase },
    /// A hint was requested before the cooldown window elapsed.
    HintThrottled { remaining: Duration },
    /// The requested board size is outside `MIN_SIZE..=MAX_SIZE`.
    InvalidConfiguration { size: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove {
                value,
                tile_index: Some(tile_index),
                empty_index,
            } => write!(
                f,
                "tile {} (at index {}) is not adjacent to the empty cell (index {})",
                value, tile_index, empty_index
            ),
            GameError::IllegalMove { value, tile_index: None, .. } => {
                write!(f, "tile {} is not on this board", value)
            }
            GameError::InvalidState { phase: Phase::Idle } => {
                write!(f, "no round in progress; shuffle first")
            }
            GameError::InvalidState { phase: Phase::Won } => {
                write!(f, "the puzzle is already solved; reset or shuffle to keep playing")
            }
            GameError::InvalidState { phase: Phase::Playing } => {
                write!(f, "a round is already in progress")
            }
            GameError::HintThrottled { remaining } => {
                write!(f, "please wait {:.1}s before the next hint", remaining.as_secs_f64())
            }
            GameError::InvalidConfiguration { size } => write!(
                f,
                "board size {} is unsupported; expected {}..={}",
                size, MIN_SIZE, MAX_SIZE
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Notifications queued by the engine for the caller to drain with
/// [`Game::poll_event`]. Snapshots are row-major copies of the cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The board mutated structurally (move, shuffle step, reset).
    BoardChanged { snapshot: Vec<u8> },
    /// A move request was rejected for non-adjacency; lets the UI flash
    /// the offending tile.
    IllegalMove { value: u8 },
    /// One shuffle step was performed. `step` counts from 1 to `total`.
    ShuffleStepped {
        snapshot: Vec<u8>,
        step: usize,
        total: usize,
    },
    /// The shuffle finished; the session is now `Playing`.
    ShuffleComplete,
    /// The board reached the solved configuration.
    Won,
    /// A hint was produced.
    Hint { value: u8, rationale: String },
    /// A hint request was rejected by the cooldown throttle.
    HintRejected { remaining: Duration },
}

/// The board: a permutation of `{0, 1, .., size * size - 1}` over a `size` x `size`
/// grid in row-major order, where `0` marks the empty cell.
///
/// A reverse index is maintained alongside the cells, so both
/// [`Board::value_at`] and [`Board::position_of`] are O(1); every swap
/// updates both sides, keeping the permutation invariant intact.
///
/// # Examples
/// ```
/// use fifteen_engine::engine::Board;
/// let board = Board::new_solved(4).unwrap();
/// assert_eq!(board.value_at(0), 1);
/// assert_eq!(board.empty_index(), 15);
/// assert!(board.is_solved());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<u8>,
    positions: Vec<usize>,
}

impl Board {
    /// Creates a solved board: `[1, 2, .., size * size - 1, 0]`.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidConfiguration`] when `size` is outside
    /// `MIN_SIZE..=MAX_SIZE`.
    pub fn new_solved(size: usize) -> Result<Self, GameError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GameError::InvalidConfiguration { size });
        }
        let count = size * size;
        let mut cells: Vec<u8> = (1..count as u8).collect();
        cells.push(0);
        let positions = Self::index_positions(&cells);
        Ok(Board { size, cells, positions })
    }

    /// Creates a board from an explicit row-major cell sequence.
    ///
    /// This is useful for testing or setting up specific scenarios. The
    /// sequence must be a permutation of `{0, .., size * size - 1}`; solvability
    /// is not checked (see [`Board::is_solvable`]).
    ///
    /// # Errors
    /// Returns a description of the first violation found: unsupported
    /// size, wrong length, out-of-range value or duplicate value.
    pub fn from_cells(size: usize, cells: Vec<u8>) -> Result<Self, String> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(format!(
                "Unsupported board size {}. Expected {}..={}",
                size, MIN_SIZE, MAX_SIZE
            ));
        }
        let count = size * size;
        if cells.len() != count {
            return Err(format!(
                "Invalid cell count. Expected {}, found {}",
                count,
                cells.len()
            ));
        }
        let mut seen = vec![false; count];
        for &value in &cells {
            let value = value as usize;
            if value >= count {
                return Err(format!(
                    "Tile value {} is out of range for a {}x{} board",
                    value, size, size
                ));
            }
            if seen[value] {
                return Err(format!("Tile value {} appears more than once", value));
            }
            seen[value] = true;
        }
        let positions = Self::index_positions(&cells);
        Ok(Board { size, cells, positions })
    }

    fn index_positions(cells: &[u8]) -> Vec<usize> {
        let mut positions = vec![0; cells.len()];
        for (index, &value) in cells.iter().enumerate() {
            positions[value as usize] = index;
        }
        positions
    }

    /// Re-initializes this board to the solved configuration for its size.
    pub fn reset(&mut self) {
        let count = self.cells.len();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            *cell = ((index + 1) % count) as u8;
        }
        self.positions = Self::index_positions(&self.cells);
    }

    /// The edge length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells, `size * size`.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The row-major cell sequence. Index `i` maps to grid row `i / size`,
    /// column `i % size`.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns the value at the given index (`0` is the empty cell).
    ///
    /// # Panics
    /// Panics if `index >= size * size`.
    pub fn value_at(&self, index: usize) -> u8 {
        self.cells[index]
    }

    /// Returns the current index of the given value. O(1) via the reverse
    /// index. `position_of(0)` is the empty cell, see [`Board::empty_index`].
    ///
    /// # Panics
    /// Panics if `value >= size * size`.
    pub fn position_of(&self, value: u8) -> usize {
        self.positions[value as usize]
    }

    /// The current index of the empty cell.
    pub fn empty_index(&self) -> usize {
        self.positions[0]
    }

    /// Grid row of an index.
    pub fn row(&self, index: usize) -> usize {
        index / self.size
    }

    /// Grid column of an index.
    pub fn col(&self, index: usize) -> usize {
        index % self.size
    }

    /// Manhattan distance between two indices on the grid.
    pub fn manhattan(&self, a: usize, b: usize) -> usize {
        self.row(a).abs_diff(self.row(b)) + self.col(a).abs_diff(self.col(b))
    }

    /// True iff the two indices are 4-directionally adjacent. Diagonal or
    /// same-cell pairs are not adjacent.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.manhattan(a, b) == 1
    }

    /// The index a tile value occupies on the solved board.
    ///
    /// # Panics
    /// Panics if `value` is `0`; the empty cell has no home of its own.
    pub fn home_index(&self, value: u8) -> usize {
        assert!(value != 0, "the empty cell has no home index");
        value as usize - 1
    }

    /// True iff the tile currently sits at its solved position.
    pub fn tile_is_home(&self, value: u8) -> bool {
        self.position_of(value) == self.home_index(value)
    }

    /// Indices adjacent to the empty cell, in up, down, left, right order.
    /// Always 2 to 4 entries for supported sizes. The enumeration order is
    /// load-bearing for hint tie-breaking.
    pub fn neighbors_of_empty(&self) -> Vec<usize> {
        let empty = self.empty_index();
        let (row, col) = (self.row(empty), self.col(empty));
        let mut neighbors = Vec::with_capacity(4);
        if row > 0 {
            neighbors.push(empty - self.size);
        }
        if row < self.size - 1 {
            neighbors.push(empty + self.size);
        }
        if col > 0 {
            neighbors.push(empty - 1);
        }
        if col < self.size - 1 {
            neighbors.push(empty + 1);
        }
        neighbors
    }

    /// Swaps the cell at `index` with the empty cell and updates the
    /// reverse index. The permutation invariant survives any swap, but
    /// non-adjacent swaps can leave the reachable state space; game flow
    /// goes through [`Game::request_move`], which checks adjacency first.
    ///
    /// # Panics
    /// Panics if `index >= size * size`.
    pub fn swap_with_empty(&mut self, index: usize) {
        let empty = self.empty_index();
        let value = self.cells[index];
        self.cells.swap(index, empty);
        self.positions[value as usize] = empty;
        self.positions[0] = index;
    }

    /// True iff the board equals the solved configuration. Every cell
    /// before the last must hold `index + 1`; the last cell is then forced
    /// to `0` by the permutation invariant.
    pub fn is_solved(&self) -> bool {
        self.cells[..self.cells.len() - 1]
            .iter()
            .enumerate()
            .all(|(index, &value)| value as usize == index + 1)
    }

    /// Inversion-parity solvability test.
    ///
    /// Boards produced by the shuffle are solvable by construction; this
    /// predicate exists for boards built via [`Board::from_cells`]. On odd
    /// sizes the inversion count must be even; on even sizes the inversion
    /// count plus the empty cell's row (from the top) must be odd.
    pub fn is_solvable(&self) -> bool {
        let inversions: usize = self
            .cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0)
            .map(|(index, &value)| {
                self.cells[index + 1..]
                    .iter()
                    .filter(|&&later| later != 0 && later < value)
                    .count()
            })
            .sum();
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.row(self.empty_index())) % 2 == 1
        }
    }

    /// Renders the board for a terminal, with ANSI styling: tiles sitting
    /// at their home index are green, and `highlight` (if any) is shown in
    /// inverse video. The empty cell renders as a dot.
    pub fn to_string_with_highlight(&self, highlight: Option<usize>) -> String {
        let width = (self.cells.len() - 1).to_string().len();
        let mut output = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let index = row * self.size + col;
                let value = self.cells[index];
                if value == 0 {
                    output.push_str(&format!("{:>width$} ", ".", width = width));
                } else if highlight == Some(index) {
                    output.push_str(&format!("\x1b[1;7m{:>width$}\x1b[m ", value, width = width));
                } else if self.tile_is_home(value) {
                    output.push_str(&format!("\x1b[32m{:>width$}\x1b[m ", value, width = width));
                } else {
                    output.push_str(&format!("{:>width$} ", value, width = width));
                }
            }
            if row < self.size - 1 {
                output.push('\n');
            }
        }
        output
    }
}

impl fmt::Display for Board {
    /// Plain-text rendering, one row per line, the empty cell as a dot.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.cells[row * self.size + col];
                if value == 0 {
                    write!(f, "{:>width$} ", ".", width = width)?;
                } else {
                    write!(f, "{:>width$} ", value, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Manages one puzzle session: the board, the session phase, the move
/// counter, the active shuffle run (at most one), the hint throttle and
/// the outbound event queue.
///
/// All operations run to completion synchronously; the engine owns no
/// timers. The caller paces shuffle animation by calling
/// [`Game::step_shuffle`] (or runs it in one go with [`Game::shuffle`])
/// and drains notifications with [`Game::poll_event`].
///
/// # Examples
/// ```
/// use fifteen_engine::engine::Game;
///
/// let mut game = Game::new(4).unwrap();
/// assert!(!game.is_playing());
///
/// game.shuffle_seeded(7);
/// assert!(game.is_playing());
/// assert_eq!(game.moves(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    phase: Phase,
    moves: u32,
    shuffle: Option<ShuffleRun>,
    throttle: HintThrottle,
    events: VecDeque<GameEvent>,
}

impl Game {
    /// Creates a session with a solved board of the given size, in the
    /// `Idle` phase.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidConfiguration`] before any state is
    /// built when `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn new(size: usize) -> Result<Self, GameError> {
        let board = Board::new_solved(size)?;
        Ok(Game {
            board,
            phase: Phase::Idle,
            moves: 0,
            shuffle: None,
            throttle: HintThrottle::new(DEFAULT_HINT_COOLDOWN),
            events: VecDeque::new(),
        })
    }

    /// Creates a session over a specific board, entering `Playing`
    /// directly (or `Won` when the board is already solved). Useful for
    /// tests and replays.
    pub fn with_board(board: Board) -> Self {
        let phase = if board.is_solved() { Phase::Won } else { Phase::Playing };
        Game {
            board,
            phase,
            moves: 0,
            shuffle: None,
            throttle: HintThrottle::new(DEFAULT_HINT_COOLDOWN),
            events: VecDeque::new(),
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A row-major copy of the current cells.
    pub fn snapshot(&self) -> Vec<u8> {
        self.board.cells().to_vec()
    }

    /// The board edge length.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Successful moves since the last shuffle completion or reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// The current session phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while moves are accepted.
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// True once the win detector has fired and until a reset or shuffle.
    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    /// Cancels any in-flight shuffle, restores the solved board and
    /// returns to `Idle`. Queues a `BoardChanged` event.
    pub fn reset(&mut self) {
        self.shuffle = None;
        self.board.reset();
        self.phase = Phase::Idle;
        self.moves = 0;
        self.throttle.reset();
        self.events.push_back(GameEvent::BoardChanged { snapshot: self.snapshot() });
    }

    /// Installs a new shuffle run with default configuration. See
    /// [`Game::begin_shuffle_with`].
    pub fn begin_shuffle(&mut self) {
        self.begin_shuffle_with(ShuffleConfig::default());
    }

    /// Installs a new shuffle run, replacing (and thereby cancelling) any
    /// run still in flight; the engine holds at most one run per session.
    /// The session leaves `Playing` until the run completes. The board is
    /// walked from its current state, so every intermediate state stays
    /// reachable from solved.
    pub fn begin_shuffle_with(&mut self, config: ShuffleConfig) {
        self.shuffle = Some(ShuffleRun::new(self.board.size(), config));
        self.phase = Phase::Idle;
    }

    /// True while a shuffle run is installed and unfinished.
    pub fn shuffle_in_progress(&self) -> bool {
        self.shuffle.is_some()
    }

    /// Drops the active shuffle run, if any, without touching the board.
    /// The session stays in `Idle`.
    pub fn cancel_shuffle(&mut self) {
        self.shuffle = None;
    }

    /// Advances the active shuffle run by one step: one uniform-random
    /// legal move of the empty cell. Queues `ShuffleStepped` and
    /// `BoardChanged`; the final step completes the run (see
    /// [`Game::step_shuffle`] return value).
    ///
    /// Returns `true` when a step was performed, `false` when there is no
    /// active run (or the run had nothing left to do and was completed).
    /// Completion flips the session to `Playing`, zeroes the move counter
    /// and queues `ShuffleComplete`.
    pub fn step_shuffle(&mut self) -> bool {
        let Some(run) = self.shuffle.as_mut() else {
            return false;
        };
        let advanced = run.advance(&mut self.board);
        let finished = run.is_finished();
        match advanced {
            Some((step, total)) => {
                let snapshot = self.board.cells().to_vec();
                self.events.push_back(GameEvent::ShuffleStepped {
                    snapshot: snapshot.clone(),
                    step,
                    total,
                });
                self.events.push_back(GameEvent::BoardChanged { snapshot });
                if finished {
                    self.finish_shuffle();
                }
                true
            }
            None => {
                self.finish_shuffle();
                false
            }
        }
    }

    fn finish_shuffle(&mut self) {
        self.shuffle = None;
        self.phase = Phase::Playing;
        self.moves = 0;
        self.throttle.reset();
        self.events.push_back(GameEvent::ShuffleComplete);
    }

    /// Runs a whole shuffle synchronously. Step events are still queued,
    /// so a caller can replay them for animation afterwards.
    pub fn shuffle(&mut self) {
        self.begin_shuffle();
        while self.step_shuffle() {}
    }

    /// Like [`Game::shuffle`], but deterministic for a given seed.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        self.begin_shuffle_with(ShuffleConfig {
            seed: Some(seed),
            ..ShuffleConfig::default()
        });
        while self.step_shuffle() {}
    }

    /// Attempts to move the tile with the given value into the empty cell.
    ///
    /// The move is applied only when the session is `Playing` and the tile
    /// is 4-adjacent to the empty cell; otherwise the board is unchanged
    /// and the error describes why. A successful move increments the move
    /// counter, queues `BoardChanged` and runs the win detector; on a win
    /// the session flips to `Won` and a `Won` event is queued.
    ///
    /// # Errors
    /// [`GameError::InvalidState`] outside `Playing`;
    /// [`GameError::IllegalMove`] for unknown or non-adjacent tiles (an
    /// `IllegalMove` event is queued as well, for UI rejection feedback).
    pub fn request_move(&mut self, value: u8) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidState { phase: self.phase });
        }
        let empty_index = self.board.empty_index();
        if value == 0 || value as usize >= self.board.cell_count() {
            self.events.push_back(GameEvent::IllegalMove { value });
            return Err(GameError::IllegalMove {
                value,
                tile_index: None,
                empty_index,
            });
        }
        let tile_index = self.board.position_of(value);
        if !self.board.is_adjacent(tile_index, empty_index) {
            self.events.push_back(GameEvent::IllegalMove { value });
            return Err(GameError::IllegalMove {
                value,
                tile_index: Some(tile_index),
                empty_index,
            });
        }
        self.board.swap_with_empty(tile_index);
        self.moves += 1;
        self.events.push_back(GameEvent::BoardChanged { snapshot: self.snapshot() });
        if self.board.is_solved() {
            self.phase = Phase::Won;
            self.events.push_back(GameEvent::Won);
        }
        Ok(())
    }

    /// Asks the hint heuristic for a suggested move.
    ///
    /// Returns `Ok(Some(hint))` with the chosen tile and its rationale,
    /// queueing a `Hint` event. `Ok(None)` means no suggestion is
    /// available, which cannot happen on supported sizes but is handled
    /// rather than assumed away.
    ///
    /// # Errors
    /// [`GameError::InvalidState`] outside `Playing`;
    /// [`GameError::HintThrottled`] when the cooldown window has not
    /// elapsed, in which case nothing is recomputed and a `HintRejected`
    /// event is queued.
    pub fn request_hint(&mut self) -> Result<Option<Hint>, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidState { phase: self.phase });
        }
        if let Err(remaining) = self.throttle.try_acquire(Instant::now()) {
            self.events.push_back(GameEvent::HintRejected { remaining });
            return Err(GameError::HintThrottled { remaining });
        }
        let suggestion = hint::suggest(&self.board);
        if let Some(hint) = &suggestion {
            self.events.push_back(GameEvent::Hint {
                value: hint.value,
                rationale: hint.rationale.clone(),
            });
        }
        Ok(suggestion)
    }

    /// The current hint cooldown window.
    pub fn hint_cooldown(&self) -> Duration {
        self.throttle.cooldown()
    }

    /// Adjusts the hint cooldown. The throttle is a UX knob, not part of
    /// the scoring algorithm; batch consumers set it to zero.
    pub fn set_hint_cooldown(&mut self, cooldown: Duration) {
        self.throttle.set_cooldown(cooldown);
    }

    /// Pops the oldest queued event, if any.
    // TODO: cap the queue length if long-lived callers that never poll
    // turn out to exist in practice.
    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Drops all queued events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
