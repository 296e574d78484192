use super::board::{Board, BoardError};
use super::direction::Direction;
use super::rules::Rules;
use super::snake::Snake;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;
use tracing::{debug, info};

/// A single game of Snake, from the snake's first move to its collision.
///
/// A session starts out running; once it is over it never changes again,
/// and playing again means constructing a new session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameSession<R> {
    pub(super) rng: R,
    pub(super) board: Board,
    pub(super) rules: Rules,
    pub(super) snake: Snake,

    /// The direction the snake moved in on the last tick
    pub(super) direction: Direction,

    /// The direction the snake will move in on the next tick
    pub(super) pending: Direction,

    /// `None` only once the snake fills the board
    pub(super) food: Option<Position>,

    pub(super) score: u32,

    /// Milliseconds between moves
    pub(super) interval: u64,

    /// The snake moves on the first tick whose time marker is strictly
    /// greater than this
    pub(super) next_move_at: u64,

    pub(super) state: GameState,
}

impl<R: Rng> GameSession<R> {
    /// Start a new game on `board`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the board is empty or too narrow for the starting
    /// snake.
    pub(crate) fn new(
        board: Board,
        rules: Rules,
        mut rng: R,
    ) -> Result<GameSession<R>, BoardError> {
        let (head, direction) = board.snake_start()?;
        let snake = Snake::new(head, direction, consts::INITIAL_SNAKE_LENGTH, board);
        let food = random_free_cell(&mut rng, board, &snake);
        let state = if food.is_some() {
            GameState::Running
        } else {
            GameState::Exhausted
        };
        debug!(
            columns = board.columns,
            rows = board.rows,
            "Created new game session"
        );
        Ok(GameSession {
            rng,
            board,
            rules,
            snake,
            direction,
            pending: direction,
            food,
            score: 0,
            interval: rules.initial_interval,
            next_move_at: 0,
            state,
        })
    }

    /// Advance the game to time `now` (in milliseconds on any monotonic
    /// clock).  The snake moves at most one cell per call, and only if the
    /// current tick interval has elapsed since its last move; calling this
    /// more often than that is harmless.
    pub(crate) fn tick(&mut self, now: u64) -> TickOutcome {
        if !self.running() || now <= self.next_move_at {
            return self.outcome(false, false);
        }
        self.direction = self.pending;
        let Some(head) = self.direction.advance(self.snake.head(), self.board) else {
            self.end(Collision::Wall);
            return self.outcome(false, false);
        };
        if self.snake.occupies(head) {
            self.end(Collision::Body);
            return self.outcome(false, false);
        }
        let ate_food = self.food == Some(head);
        self.snake.advance(head, ate_food);
        if ate_food {
            self.eat();
        }
        self.next_move_at = now.saturating_add(self.interval);
        self.outcome(true, ate_food)
    }

    fn eat(&mut self) {
        self.score += 1;
        let interval = self.rules.interval_after(self.score, self.interval);
        if interval != self.interval {
            debug!(score = self.score, interval, "Snake sped up");
            self.interval = interval;
        }
        self.food = random_free_cell(&mut self.rng, self.board, &self.snake);
        debug!(score = self.score, food = ?self.food, "Snake ate food");
        if self.food.is_none() {
            info!(score = self.score, "Snake filled the board");
            self.state = GameState::Exhausted;
        }
    }
}

impl<R> GameSession<R> {
    /// Queue a change of direction for the next tick.  Turning straight back
    /// the way the snake came is ignored, as is any input after the game has
    /// ended.
    pub(crate) fn handle_input(&mut self, direction: Direction) {
        if self.running() && !direction.is_opposite(self.direction) {
            self.pending = direction;
        }
    }

    pub(crate) fn board(&self) -> Board {
        self.board
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn is_over(&self) -> bool {
        !self.running()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Milliseconds between moves at the current speed
    pub(crate) fn tick_interval(&self) -> u64 {
        self.interval
    }

    pub(crate) fn food(&self) -> Option<Position> {
        self.food
    }

    /// Return the snake's head
    pub(crate) fn head(&self) -> Position {
        self.snake.head()
    }

    /// Iterate over the snake's cells from head to tail
    pub(crate) fn snake(&self) -> impl Iterator<Item = Position> + '_ {
        self.snake.cells()
    }

    fn running(&self) -> bool {
        self.state == GameState::Running
    }

    fn end(&mut self, collision: Collision) {
        info!(?collision, score = self.score, "Game over");
        self.state = GameState::Dead(collision);
    }

    fn outcome(&self, moved: bool, ate_food: bool) -> TickOutcome {
        TickOutcome {
            moved,
            ate_food,
            is_over: self.is_over(),
            score: self.score,
        }
    }
}

/// Pick a cell not occupied by `snake`, uniformly at random.  A handful of
/// random draws are tried first; if they all land on the snake, the choice is
/// made among the free cells directly.  Returns `None` if there are no free
/// cells.
fn random_free_cell<R: Rng>(rng: &mut R, board: Board, snake: &Snake) -> Option<Position> {
    if snake.len() >= board.cell_count() {
        return None;
    }
    for _ in 0..consts::FOOD_PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.random_range(0..board.columns),
            rng.random_range(0..board.rows),
        );
        if !snake.occupies(pos) {
            return Some(pos);
        }
    }
    board.positions().filter(|&p| !snake.occupies(p)).choose(rng)
}

/// What happened during a call to [`GameSession::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TickOutcome {
    /// Did the snake move one cell?
    pub(crate) moved: bool,

    /// Did the snake eat the food (and thus grow)?
    pub(crate) ate_food: bool,

    /// Has the game ended?
    pub(crate) is_over: bool,

    /// The score after the tick
    pub(crate) score: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    Running,
    Dead(Collision),
    /// The snake has filled the board and there is nowhere left to place
    /// food.
    Exhausted,
}

/// What the snake ran into
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    Body,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::{HashSet, VecDeque};

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn new_session(board: Board) -> GameSession<ChaCha12Rng> {
        GameSession::new(board, Rules::default(), ChaCha12Rng::seed_from_u64(RNG_SEED))
            .expect("board should be valid")
    }

    /// A 10×10 session with the snake stretched along row 5 from (5, 5) back
    /// to (0, 5), facing right, and the food at `food`
    fn row_five_session(food: Position) -> GameSession<ChaCha12Rng> {
        let mut session = new_session(Board::new(10, 10));
        session.snake.head = Position::new(5, 5);
        session.snake.body = (0..5).rev().map(|x| Position::new(x, 5)).collect();
        session.direction = Direction::Right;
        session.pending = Direction::Right;
        session.food = Some(food);
        session
    }

    fn assert_food_off_snake(session: &GameSession<ChaCha12Rng>) {
        let food = session.food().expect("food should be placed");
        assert!(
            !session.snake().any(|p| p == food),
            "food {food:?} placed on the snake"
        );
    }

    #[test]
    fn new_session_layout() {
        let session = new_session(Board::new(10, 10));
        assert_eq!(session.state(), GameState::Running);
        assert!(!session.is_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.direction(), Direction::Right);
        assert_eq!(session.tick_interval(), 100);
        assert_eq!(
            session.snake().collect::<Vec<_>>(),
            [
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5),
                Position::new(2, 5),
                Position::new(1, 5),
            ]
        );
        assert_food_off_snake(&session);
    }

    #[rstest::rstest]
    #[case(Board::new(0, 0))]
    #[case(Board::new(3, 10))]
    #[case(Board::from_pixels(ratatui::layout::Size::new(200, 600)))]
    fn new_session_rejects_bad_board(#[case] board: Board) {
        let r = GameSession::new(board, Rules::default(), ChaCha12Rng::seed_from_u64(RNG_SEED));
        assert!(r.is_err());
    }

    #[test]
    fn tick_waits_for_interval() {
        let mut session = new_session(Board::new(20, 10));
        let out = session.tick(0);
        assert!(!out.moved);
        let out = session.tick(1);
        assert!(out.moved);
        assert_eq!(session.head(), Position::new(11, 5));
        assert_eq!(session.next_move_at, 101);
        for now in [2, 50, 100, 101] {
            let out = session.tick(now);
            assert!(!out.moved, "moved early at {now}");
        }
        assert_eq!(session.head(), Position::new(11, 5));
        let out = session.tick(102);
        assert!(out.moved);
        assert_eq!(session.head(), Position::new(12, 5));
    }

    #[test]
    fn eat_food() {
        let mut session = row_five_session(Position::new(6, 5));
        let out = session.tick(1);
        assert_eq!(
            out,
            TickOutcome {
                moved: true,
                ate_food: true,
                is_over: false,
                score: 1,
            }
        );
        assert_eq!(session.snake.len(), 7);
        assert_eq!(session.head(), Position::new(6, 5));
        assert_eq!(session.snake.body.back(), Some(&Position::new(0, 5)));
        assert_food_off_snake(&session);
    }

    #[test]
    fn move_without_eating() {
        let mut session = row_five_session(Position::new(0, 0));
        let out = session.tick(1);
        assert!(out.moved);
        assert!(!out.ate_food);
        assert_eq!(out.score, 0);
        assert_eq!(session.snake.len(), 6);
        assert_eq!(session.snake.body.back(), Some(&Position::new(1, 5)));
        assert_eq!(session.food(), Some(Position::new(0, 0)));
    }

    #[test]
    fn reversal_rejected() {
        let mut session = row_five_session(Position::new(0, 0));
        session.handle_input(Direction::Left);
        assert_eq!(session.pending, Direction::Right);
        session.tick(1);
        assert_eq!(session.head(), Position::new(6, 5));
        assert!(!session.is_over());
    }

    #[test]
    fn turn_applies_on_next_tick() {
        let mut session = row_five_session(Position::new(0, 0));
        session.handle_input(Direction::Up);
        assert_eq!(session.direction(), Direction::Right);
        session.tick(1);
        assert_eq!(session.direction(), Direction::Up);
        assert_eq!(session.head(), Position::new(5, 4));
    }

    #[test]
    fn last_input_before_tick_wins() {
        let mut session = row_five_session(Position::new(0, 0));
        session.handle_input(Direction::Up);
        session.handle_input(Direction::Down);
        // Still facing right, so "left" is refused even though "up" was queued
        session.handle_input(Direction::Left);
        session.tick(1);
        assert_eq!(session.head(), Position::new(5, 6));
    }

    #[test]
    fn wall_collision() {
        let mut session = new_session(Board::new(10, 10));
        session.snake.head = Position::new(0, 5);
        session.snake.body = (1..6).map(|x| Position::new(x, 5)).collect();
        session.direction = Direction::Left;
        session.pending = Direction::Left;
        session.food = Some(Position::new(9, 9));
        let before = session.snake.clone();
        let out = session.tick(1);
        assert_eq!(
            out,
            TickOutcome {
                moved: false,
                ate_food: false,
                is_over: true,
                score: 0,
            }
        );
        assert_eq!(session.state(), GameState::Dead(Collision::Wall));
        assert_eq!(session.snake, before);
    }

    #[test]
    fn self_collision_against_tail() {
        // A 2x2 loop: moving up from (1, 1) runs into the tail at (1, 0),
        // which counts even though the tail would have moved away.
        let mut session = new_session(Board::new(10, 10));
        session.snake.head = Position::new(1, 1);
        session.snake.body = VecDeque::from([
            Position::new(0, 1),
            Position::new(0, 0),
            Position::new(1, 0),
        ]);
        session.direction = Direction::Right;
        session.pending = Direction::Up;
        session.food = Some(Position::new(9, 9));
        session.score = 2;
        let out = session.tick(1);
        assert!(out.is_over);
        assert_eq!(out.score, 2);
        assert_eq!(session.state(), GameState::Dead(Collision::Body));
        assert_eq!(session.snake.len(), 4);
    }

    #[test]
    fn over_is_frozen() {
        let mut session = new_session(Board::new(10, 10));
        session.snake.head = Position::new(9, 5);
        session.snake.body = (4..9).rev().map(|x| Position::new(x, 5)).collect();
        session.food = Some(Position::new(0, 0));
        assert!(session.tick(1).is_over);
        let frozen = session.clone();
        session.handle_input(Direction::Up);
        for now in [2, 1000, 5000, u64::MAX] {
            let out = session.tick(now);
            assert!(out.is_over);
            assert!(!out.moved);
        }
        assert_eq!(session, frozen);
    }

    #[test]
    fn speed_ramp() {
        let mut session = new_session(Board::new(40, 3));
        session.snake.head = Position::new(6, 1);
        session.snake.body = (1..6).rev().map(|x| Position::new(x, 1)).collect();
        let mut now = 1;
        let mut intervals = Vec::new();
        for x in 7..22 {
            session.food = Some(Position::new(x, 1));
            let out = session.tick(now);
            assert!(out.ate_food, "missed food at x = {x}");
            intervals.push((out.score, session.interval));
            now += session.interval + 1;
        }
        assert_eq!(intervals[3], (4, 100));
        assert_eq!(intervals[4], (5, 90));
        assert_eq!(intervals[9], (10, 80));
        assert_eq!(intervals[14], (15, 70));
        assert_eq!(session.snake.len(), 21);
    }

    #[test]
    fn food_never_on_snake() {
        let mut session = new_session(Board::new(8, 4));
        // Lay the snake over most of the board so that random draws mostly
        // hit it.
        session.snake.head = Position::new(7, 3);
        session.snake.body = session
            .board
            .positions()
            .filter(|p| *p != Position::new(7, 3))
            .take(28)
            .collect();
        let snake_cells = session.snake().collect::<HashSet<_>>();
        for _ in 0..50 {
            let food = random_free_cell(&mut session.rng, session.board, &session.snake)
                .expect("there should be free cells");
            assert!(!snake_cells.contains(&food), "food {food:?} placed on snake");
        }
    }

    #[test]
    fn random_playthroughs_keep_invariants() {
        let mut inputs = ChaCha12Rng::seed_from_u64(RNG_SEED ^ 0xFFFF);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        for seed in 0..20 {
            let board = Board::new(12, 8);
            let mut session =
                GameSession::new(board, Rules::default(), ChaCha12Rng::seed_from_u64(seed))
                    .expect("board should be valid");
            let mut now = 0;
            while !session.is_over() {
                if inputs.random_bool(0.3) {
                    let d = directions[inputs.random_range(0..directions.len())];
                    session.handle_input(d);
                }
                // Steer towards the food some of the time so that games last
                if let Some(food) = session.food() {
                    if inputs.random_bool(0.5) {
                        let head = session.head();
                        let d = if food.x > head.x {
                            Direction::Right
                        } else if food.x < head.x {
                            Direction::Left
                        } else if food.y > head.y {
                            Direction::Down
                        } else {
                            Direction::Up
                        };
                        session.handle_input(d);
                    }
                }
                let len_before = session.snake.len();
                let score_before = session.score();
                now += session.interval + 1;
                let out = session.tick(now);
                if matches!(session.state(), GameState::Dead(_)) {
                    assert!(!out.moved);
                    assert_eq!(session.snake.len(), len_before);
                    assert_eq!(out.score, score_before);
                    break;
                }
                assert!(out.moved);
                let head = session.head();
                assert!(head.x < 12 && head.y < 8, "head {head:?} off the board");
                let cells = session.snake().collect::<HashSet<_>>();
                assert_eq!(cells.len(), session.snake.len(), "snake overlaps itself");
                if out.ate_food {
                    assert_eq!(session.snake.len(), len_before + 1);
                    assert_eq!(out.score, score_before + 1);
                } else {
                    assert_eq!(session.snake.len(), len_before);
                    assert_eq!(out.score, score_before);
                }
                if let Some(food) = session.food() {
                    assert!(!cells.contains(&food), "food {food:?} placed on snake");
                }
                assert!(session.interval >= 40);
            }
        }
    }

    #[test]
    fn board_filled() {
        let mut session = new_session(Board::new(7, 1));
        assert_eq!(session.food(), Some(Position::new(0, 0)));
        session.handle_input(Direction::Down);
        assert_eq!(session.pending, Direction::Down);
        session.pending = Direction::Left;
        session.direction = Direction::Left;
        // Turn the snake around by hand so that it faces the last free cell
        session.snake.head = Position::new(1, 0);
        session.snake.body = (2..7).map(|x| Position::new(x, 0)).collect();
        let out = session.tick(1);
        assert!(out.ate_food);
        assert!(out.is_over);
        assert_eq!(out.score, 1);
        assert_eq!(session.state(), GameState::Exhausted);
        assert_eq!(session.food(), None);
        assert_eq!(session.snake.len(), 7);
    }

    /// An RNG whose every output is zero, so that every random cell it picks
    /// is the top-left corner
    #[derive(Debug)]
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn food_placed_in_only_free_cell_after_misses() {
        let board = Board::new(7, 1);
        let snake = Snake::new(Position::new(5, 0), Direction::Right, 6, board);
        assert!(snake.occupies(Position::ORIGIN));
        assert_eq!(
            random_free_cell(&mut ZeroRng, board, &snake),
            Some(Position::new(6, 0))
        );
    }

    #[test]
    fn food_placed_among_free_cells_after_misses() {
        let board = Board::new(9, 1);
        let snake = Snake::new(Position::new(5, 0), Direction::Right, 6, board);
        let pos = random_free_cell(&mut ZeroRng, board, &snake).expect("board has free cells");
        assert!((6..9).contains(&pos.x), "{pos:?}");
        assert_eq!(pos.y, 0);
    }

    #[test]
    fn no_food_cell_on_full_board() {
        let board = Board::new(7, 1);
        let snake = Snake::new(Position::new(6, 0), Direction::Right, 7, board);
        assert_eq!(snake.len(), board.cell_count());
        assert_eq!(random_free_cell(&mut ZeroRng, board, &snake), None);
    }
}
