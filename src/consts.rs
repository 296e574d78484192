//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Edge length, in canvas pixels, of one cell of the board
pub(crate) const TILE_SIZE: u16 = 32;

/// Canvas size used when the configuration does not give one.  With
/// [`TILE_SIZE`], this yields a 32×18 board.
pub(crate) const DEFAULT_CANVAS_SIZE: Size = Size {
    width: 1024,
    height: 576,
};

/// Number of cells in a freshly-created snake
pub(crate) const INITIAL_SNAKE_LENGTH: u16 = 6;

/// Milliseconds between movements of the snake at the start of a game
pub(crate) const INITIAL_TICK_INTERVAL: u64 = 100;

/// How many milliseconds are taken off the tick interval at each speed-up
pub(crate) const TICK_INTERVAL_STEP: u64 = 10;

/// The tick interval never drops below this many milliseconds
pub(crate) const MIN_TICK_INTERVAL: u64 = 40;

/// The snake speeds up each time the score reaches a multiple of this
pub(crate) const SPEEDUP_EVERY: u32 = 5;

/// Milliseconds between a game ending and a new one starting automatically
pub(crate) const RESTART_DELAY_MS: u64 = 1200;

/// Number of random cells tried when placing food before falling back to
/// choosing among all free cells
pub(crate) const FOOD_PLACEMENT_ATTEMPTS: usize = 64;

/// Time between redraws of the screen
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// The largest board that can be drawn: the display area minus the board's
/// border, the score bar, and the two message lines beneath the board
pub(crate) const MAX_BOARD_SIZE: Size = Size {
    width: DISPLAY_SIZE.width - 2,
    height: DISPLAY_SIZE.height - 5,
};

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);
