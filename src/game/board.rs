use super::direction::Direction;
use crate::consts;
use ratatui::layout::{Position, Positions, Rect, Size};
use thiserror::Error;

/// The playing field: a grid of `columns × rows` cells, fixed for the
/// lifetime of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    pub(crate) columns: u16,
    pub(crate) rows: u16,
}

impl Board {
    pub(crate) fn new(columns: u16, rows: u16) -> Board {
        Board { columns, rows }
    }

    /// Derive the board that fits on a canvas of the given pixel size, one
    /// cell per [`TILE_SIZE`][consts::TILE_SIZE]-pixel tile.  Partial tiles
    /// at the right & bottom edges are discarded.
    pub(crate) fn from_pixels(canvas: Size) -> Board {
        Board::new(
            canvas.width / consts::TILE_SIZE,
            canvas.height / consts::TILE_SIZE,
        )
    }

    pub(crate) fn size(self) -> Size {
        Size {
            width: self.columns,
            height: self.rows,
        }
    }

    pub(crate) fn cell_count(self) -> usize {
        usize::from(self.columns) * usize::from(self.rows)
    }

    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }

    /// Check that the board is no larger than `limit` in either dimension.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the board is wider or taller than `limit`.
    pub(crate) fn check_fits(self, limit: Size) -> Result<(), BoardError> {
        if self.columns > limit.width || self.rows > limit.height {
            Err(BoardError::TooLarge {
                columns: self.columns,
                rows: self.rows,
                max_columns: limit.width,
                max_rows: limit.height,
            })
        } else {
            Ok(())
        }
    }

    /// Return the head position & facing of a new snake: vertically
    /// centered, facing right, far enough from the left edge that the whole
    /// body fits behind it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the board has no cells or is too narrow to hold the
    /// starting snake.
    pub(super) fn snake_start(self) -> Result<(Position, Direction), BoardError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(BoardError::Empty {
                columns: self.columns,
                rows: self.rows,
            });
        }
        let x = consts::INITIAL_SNAKE_LENGTH.max(self.columns / 2);
        if x >= self.columns {
            return Err(BoardError::TooNarrow {
                columns: self.columns,
                required: x.saturating_add(1),
            });
        }
        Ok((Position::new(x, self.rows / 2), Direction::Right))
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum BoardError {
    #[error("board has no cells ({columns}x{rows}); the canvas must be at least one tile in each dimension")]
    Empty { columns: u16, rows: u16 },
    #[error("board is {columns} columns wide, but the starting snake needs at least {required}")]
    TooNarrow { columns: u16, required: u16 },
    #[error("board is {columns}x{rows}, but at most {max_columns}x{max_rows} can be displayed; use a smaller canvas")]
    TooLarge {
        columns: u16,
        rows: u16,
        max_columns: u16,
        max_rows: u16,
    },
}
