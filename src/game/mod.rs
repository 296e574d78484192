mod board;
mod direction;
mod rules;
mod session;
mod snake;
pub(crate) use self::board::BoardError;
pub(crate) use self::rules::Rules;
use self::board::Board;
use self::direction::Direction;
use self::session::{Collision, GameSession, GameState};
use crate::app::{AppError, Screen};
use crate::command::Command;
use crate::config::Config;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::{info, trace};

/// The game screen: hosts one [`GameSession`] at a time, feeds it key
/// presses & clock ticks, and starts a new one a short while after each game
/// ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game {
    /// Seeds the RNG of each new session
    rng: ChaCha12Rng,
    board: Board,
    rules: Rules,
    restart_delay: Duration,
    session: GameSession<ChaCha12Rng>,

    /// When the current session started.  The time markers passed to
    /// `GameSession::tick()` are milliseconds since this instant.
    started: Instant,

    /// When to replace the current session, once it's over
    restart_at: Option<Instant>,

    /// Highest score reached since the program started
    best: u32,
}

impl Game {
    /// Create a game screen for the canvas & rules in `config`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configured canvas does not yield a usable board
    /// or yields one too large to display.
    pub(crate) fn new(config: &Config, mut rng: ChaCha12Rng) -> Result<Game, BoardError> {
        let board = Board::from_pixels(config.canvas.size());
        board.check_fits(consts::MAX_BOARD_SIZE)?;
        let rules = config.rules;
        let session = GameSession::new(board, rules, ChaCha12Rng::from_rng(&mut rng))?;
        info!(
            columns = board.columns,
            rows = board.rows,
            ?rules,
            "Starting game"
        );
        Ok(Game {
            rng,
            board,
            rules,
            restart_delay: config.restart_delay(),
            session,
            started: Instant::now(),
            restart_at: None,
            best: 0,
        })
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Run one frame: advance the session, then wait until the next frame is
    /// due for a key press to handle.
    pub(crate) fn process_input(&mut self) -> Result<Option<Screen>, AppError> {
        let now = Instant::now();
        self.advance(now)?;
        let wait = (now + consts::FRAME_PERIOD).saturating_duration_since(Instant::now());
        if poll(wait)? {
            self.handle_event(read()?).map_err(Into::into)
        } else {
            Ok(None)
        }
    }

    fn advance(&mut self, now: Instant) -> Result<(), BoardError> {
        if let Some(when) = self.restart_at {
            if now >= when {
                self.restart(now)?;
            }
            return Ok(());
        }
        let outcome = self.session.tick(self.time_marker(now));
        if outcome.moved {
            trace!(head = ?self.session.head(), "Snake moved");
        }
        if outcome.ate_food {
            self.best = self.best.max(outcome.score);
            trace!(
                score = outcome.score,
                interval = self.session.tick_interval(),
                "Food eaten"
            );
        }
        if outcome.is_over {
            self.restart_at = Some(now + self.restart_delay);
        }
        Ok(())
    }

    fn restart(&mut self, now: Instant) -> Result<(), BoardError> {
        self.session = GameSession::new(
            self.board,
            self.rules,
            ChaCha12Rng::from_rng(&mut self.rng),
        )?;
        self.started = now;
        self.restart_at = None;
        info!(best = self.best, "Restarted game");
        Ok(())
    }

    fn time_marker(&self, now: Instant) -> u64 {
        u64::try_from(now.saturating_duration_since(self.started).as_millis()).unwrap_or(u64::MAX)
    }

    fn handle_event(&mut self, event: Event) -> Result<Option<Screen>, BoardError> {
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return Ok(None);
        };
        match cmd {
            Command::Quit | Command::Q => return Ok(Some(Screen::Quit)),
            Command::R => self.restart(Instant::now())?,
            Command::Up => self.session.handle_input(Direction::Up),
            Command::Down => self.session.handle_input(Direction::Down),
            Command::Left => self.session.handle_input(Direction::Left),
            Command::Right => self.session.handle_input(Direction::Right),
        }
        Ok(None)
    }

    fn head_symbol(&self) -> char {
        match self.session.direction() {
            Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
            Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }
}

impl Widget for &Game {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}   Best: {}", self.session.score(), self.best),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let mut block_size = self.session.board().size();
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let board_area = block_area.inner(Margin::new(1, 1));
        let mut canvas = Canvas {
            area: board_area,
            buf,
        };
        for p in self.session.snake().skip(1) {
            canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if let Some(pos) = self.session.food() {
            canvas.draw_cell(pos, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        let state = self.session.state();
        if matches!(state, GameState::Dead(_)) {
            canvas.draw_cell(
                self.session.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_cell(self.session.head(), self.head_symbol(), consts::SNAKE_STYLE);
        }

        let score = self.session.score();
        let msg = match state {
            GameState::Running => return,
            GameState::Dead(Collision::Wall) => {
                format!(" GAME OVER! Score: {score} (hit the wall)")
            }
            GameState::Dead(Collision::Body) => format!(" GAME OVER! Score: {score} (hit itself)"),
            GameState::Exhausted => format!(" BOARD CLEARED! Score: {score}"),
        };
        Span::from(msg).render(msg1_area, buf);
        Line::from_iter([
            Span::raw(" Restart ("),
            Span::styled("r", consts::KEY_STYLE),
            Span::raw(") / Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(msg2_area, buf);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw `symbol` at board position `pos`.  Positions outside the canvas
    /// area are not drawn.
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if pos.x >= self.area.width || pos.y >= self.area.height {
            return;
        }
        let Some(x) = self.area.x.checked_add(pos.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}
