//! Greedy move-suggestion heuristic.
//!
//! The heuristic scores every tile adjacent to the empty cell and
//! recommends the highest-scoring one together with a human-readable
//! rationale. The scoring biases toward a row-by-row, column-by-column
//! solving order. It is deliberately not a solver; it looks one move
//! ahead and nothing more.
//!
//! The score constants are tie-break priorities, not tunable weights:
//! their relative ordering is what the selection depends on.
use crate::engine::Board;
use std::time::{Duration, Instant};

/// Moving the tile lands it on its home index.
pub const FINAL_PLACEMENT_SCORE: i32 = 1000;
/// The tile clutters the first row or first column without living there.
pub const ANCHOR_LINE_SCORE: i32 = 500;
/// Base for moves that shrink the tile's distance to its home index;
/// reduced by [`APPROACH_DISTANCE_STEP`] per remaining grid step.
pub const APPROACH_BASE_SCORE: i32 = 300;
/// Per-step reduction applied to [`APPROACH_BASE_SCORE`].
pub const APPROACH_DISTANCE_STEP: i32 = 10;
/// Fallback for moves that only open up working space.
pub const CREATES_SPACE_SCORE: i32 = 100;
/// Added when the tile value is at most the board size, reinforcing the
/// first-row-first bias.
pub const LOW_TILE_BONUS: i32 = 50;
/// Subtracted from the base score when the tile already sits at its home
/// index; moving it would undo finished work.
pub const DISTURB_SOLVED_PENALTY: i32 = 2000;

/// The reference cooldown between hint requests.
pub const DEFAULT_HINT_COOLDOWN: Duration = Duration::from_secs(3);

/// Which scoring rule produced a hint's winning score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintRule {
    /// The move puts the tile on its home index.
    FinalPlacement,
    /// The move clears the tile off the anchor row or column.
    AnchorLine,
    /// The move shrinks the tile's distance to its home index.
    ApproachTarget,
    /// Nothing better: the move at least frees up space.
    CreatesSpace,
    /// The tile is already home; moving it is actively discouraged.
    DisturbsSolved,
}

impl HintRule {
    fn rationale(self, value: u8) -> String {
        match self {
            HintRule::FinalPlacement => {
                format!("Tile {} slides straight into its home square.", value)
            }
            HintRule::AnchorLine => format!(
                "Tile {} is cluttering the first row or column; clear it out of the way.",
                value
            ),
            HintRule::ApproachTarget => {
                format!("Moving tile {} brings it closer to its home square.", value)
            }
            HintRule::CreatesSpace => format!(
                "Moving tile {} opens up working space around the gap.",
                value
            ),
            HintRule::DisturbsSolved => format!(
                "Do not move tile {} if you can avoid it; it is already in its home square.",
                value
            ),
        }
    }
}

/// A recommended move: the tile, where it currently sits, the score that
/// won the selection, the rule behind it and the rationale text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hint {
    pub value: u8,
    pub index: usize,
    pub score: i32,
    pub rule: HintRule,
    pub rationale: String,
}

/// Scores the empty cell's neighbors and returns the best candidate.
///
/// Candidates are enumerated in up, down, left, right order and ties go
/// to the first one seen. Returns `None` only when the empty cell has no
/// neighbors, which cannot happen on a supported board.
///
/// A tile that already sits on its home index is penalized far below
/// every other tier rather than excluded, so when every neighbor is
/// already home the least bad one is still returned, carrying the
/// do-not-move rationale.
///
/// # Examples
/// ```
/// use fifteen_engine::engine::Board;
/// use fifteen_engine::hint;
///
/// let board = Board::from_cells(
///     4,
///     vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12],
/// )
/// .unwrap();
/// let hint = hint::suggest(&board).unwrap();
/// assert_eq!(hint.value, 12);
/// ```
pub fn suggest(board: &Board) -> Option<Hint> {
    let empty = board.empty_index();
    let mut best: Option<Hint> = None;
    for index in board.neighbors_of_empty() {
        let candidate = score_candidate(board, index, empty);
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

fn score_candidate(board: &Board, index: usize, empty: usize) -> Hint {
    let value = board.value_at(index);
    let (base, rule) = if value as usize == empty + 1 {
        // The empty cell is this tile's home index.
        (FINAL_PLACEMENT_SCORE, HintRule::FinalPlacement)
    } else if (board.row(index) == 0 || board.col(index) == 0) && value as usize != index + 1 {
        (ANCHOR_LINE_SCORE, HintRule::AnchorLine)
    } else {
        let home = board.home_index(value);
        let new_distance = board.manhattan(empty, home);
        if new_distance < board.manhattan(index, home) {
            (
                APPROACH_BASE_SCORE - APPROACH_DISTANCE_STEP * new_distance as i32,
                HintRule::ApproachTarget,
            )
        } else {
            (CREATES_SPACE_SCORE, HintRule::CreatesSpace)
        }
    };

    let mut score = base;
    let mut rule = rule;
    if value as usize <= board.size() {
        score += LOW_TILE_BONUS;
    }
    if value as usize == index + 1 {
        // Overrides everything else, bonus included.
        score = base - DISTURB_SOLVED_PENALTY;
        rule = HintRule::DisturbsSolved;
    }

    Hint {
        value,
        index,
        score,
        rule,
        rationale: rule.rationale(value),
    }
}

/// Cooldown gate for hint requests.
///
/// The clock is passed in explicitly so the gate can be exercised with
/// synthetic instants; the engine feeds it `Instant::now()`.
#[derive(Clone, Debug)]
pub struct HintThrottle {
    cooldown: Duration,
    last: Option<Instant>,
}

impl HintThrottle {
    pub fn new(cooldown: Duration) -> Self {
        HintThrottle { cooldown, last: None }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    /// Forgets the last grant, so the next request passes immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Grants a hint request at `now`, or reports how long the caller
    /// still has to wait.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        if let Some(last) = self.last {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                return Err(self.cooldown - elapsed);
            }
        }
        self.last = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Game, GameError, GameEvent};
    use crate::utils::board_from_rows;

    #[test]
    fn final_placement_wins_on_reference_board() {
        let board = board_from_rows(&[
            "1 2 3 4",
            "5 6 7 8",
            "9 10 11 0",
            "13 14 15 12",
        ])
        .unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 12);
        assert_eq!(hint.index, 15);
        assert_eq!(hint.score, FINAL_PLACEMENT_SCORE);
        assert_eq!(hint.rule, HintRule::FinalPlacement);
    }

    #[test]
    fn anchor_line_with_low_tile_bonus() {
        // Empty in the center; tile 3 sits misplaced on the first row,
        // every other neighbor is already home.
        let board = board_from_rows(&["2 3 1", "4 0 6", "7 8 5"]).unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 3);
        assert_eq!(hint.score, ANCHOR_LINE_SCORE + LOW_TILE_BONUS);
        assert_eq!(hint.rule, HintRule::AnchorLine);
    }

    #[test]
    fn approach_scoring_and_first_seen_tie_break() {
        // Tiles 8 and 6 both get one step closer to home (score 290); 6
        // sits below the empty cell and is enumerated first.
        let board = board_from_rows(&["1 2 3", "4 0 8", "7 6 5"]).unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 6);
        assert_eq!(
            hint.score,
            APPROACH_BASE_SCORE - APPROACH_DISTANCE_STEP
        );
        assert_eq!(hint.rule, HintRule::ApproachTarget);
    }

    #[test]
    fn creates_space_fallback() {
        // The only non-home neighbor of the empty corner moves away from
        // its home square.
        let board = board_from_rows(&["1 2 3", "4 6 5", "7 8 0"]).unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 5);
        assert_eq!(hint.score, CREATES_SPACE_SCORE);
        assert_eq!(hint.rule, HintRule::CreatesSpace);
    }

    #[test]
    fn home_tile_is_never_preferred_over_a_modest_alternative() {
        // Neighbors of the empty cell: 5 and 7 are home (penalized), 6 is
        // a plain creates-space candidate. The penalized tiles must lose.
        let board = board_from_rows(&["1 2 3", "4 5 8", "7 0 6"]).unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 6);
        assert_eq!(hint.rule, HintRule::CreatesSpace);
    }

    #[test]
    fn hint_still_suggests_when_every_neighbor_is_home() {
        // Both neighbors of the empty corner already sit on their home
        // squares. The heuristic has nothing good to offer but still
        // answers, with the do-not-move warning.
        let board = board_from_rows(&["2 1 3", "4 5 6", "7 8 0"]).unwrap();
        let hint = suggest(&board).unwrap();
        assert_eq!(hint.value, 6);
        assert_eq!(hint.rule, HintRule::DisturbsSolved);
        assert!(hint.score < 0);
        assert!(hint.rationale.contains("Do not move"));
    }

    #[test]
    fn penalty_ignores_the_low_tile_bonus() {
        // Tile 2 is home and low-valued; its bonus must not survive the
        // override.
        let board = board_from_rows(&["5 2 3", "4 0 6", "7 8 1"]).unwrap();
        let candidates: Vec<Hint> = board
            .neighbors_of_empty()
            .into_iter()
            .map(|index| super::score_candidate(&board, index, board.empty_index()))
            .collect();
        let two = candidates.iter().find(|h| h.value == 2).unwrap();
        assert_eq!(two.rule, HintRule::DisturbsSolved);
        assert_eq!(two.score, CREATES_SPACE_SCORE - DISTURB_SOLVED_PENALTY);
    }

    #[test]
    fn throttle_grants_then_blocks_until_cooldown_elapses() {
        let mut throttle = HintThrottle::new(Duration::from_secs(3));
        let start = Instant::now();
        assert!(throttle.try_acquire(start).is_ok());

        let early = throttle.try_acquire(start + Duration::from_secs(1));
        assert_eq!(early, Err(Duration::from_secs(2)));

        assert!(throttle.try_acquire(start + Duration::from_secs(3)).is_ok());
    }

    #[test]
    fn throttle_reset_and_zero_cooldown() {
        let mut throttle = HintThrottle::new(Duration::from_secs(3));
        let start = Instant::now();
        throttle.try_acquire(start).unwrap();
        throttle.reset();
        assert!(throttle.try_acquire(start).is_ok());

        let mut free = HintThrottle::new(Duration::ZERO);
        assert!(free.try_acquire(start).is_ok());
        assert!(free.try_acquire(start).is_ok());
    }

    #[test]
    fn engine_rejects_hints_outside_playing() {
        let mut game = Game::new(4).unwrap();
        assert!(matches!(
            game.request_hint(),
            Err(GameError::InvalidState { .. })
        ));

        let board = board_from_rows(&["1 2 3", "4 5 6", "7 0 8"]).unwrap();
        let mut game = Game::with_board(board);
        game.request_move(8).unwrap();
        assert!(game.is_won());
        assert!(matches!(
            game.request_hint(),
            Err(GameError::InvalidState { .. })
        ));
    }

    #[test]
    fn engine_throttles_back_to_back_hints() {
        let mut game = Game::new(4).unwrap();
        game.shuffle_seeded(2);
        game.clear_events();

        let first = game.request_hint().unwrap();
        assert!(first.is_some());
        let second = game.request_hint();
        assert!(matches!(second, Err(GameError::HintThrottled { .. })));

        // One Hint event for the grant, one HintRejected for the refusal.
        assert!(matches!(game.poll_event(), Some(GameEvent::Hint { .. })));
        assert!(matches!(
            game.poll_event(),
            Some(GameEvent::HintRejected { .. })
        ));

        // With the cooldown disabled, requests flow freely.
        game.set_hint_cooldown(Duration::ZERO);
        assert!(game.request_hint().unwrap().is_some());
        assert!(game.request_hint().unwrap().is_some());
    }
}
