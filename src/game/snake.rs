use super::board::Board;
use super::direction::Direction;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake's body.
///
/// All positions are relative to the top-left corner of the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The position of the snake's head
    pub(super) head: Position,

    /// The positions of the rest of the snake, starting with the cell just
    /// behind the head and ending with the tail
    pub(super) body: VecDeque<Position>,
}

impl Snake {
    /// Create a snake of `length` cells with its head at `head`, facing in
    /// `direction`, with its body stretched out straight behind it.  The body
    /// is cut short if it would run off `board`.
    pub(super) fn new(head: Position, direction: Direction, length: u16, board: Board) -> Snake {
        let behind = direction.reverse();
        let body = std::iter::successors(Some(head), |&p| behind.advance(p, board))
            .skip(1)
            .take(usize::from(length.saturating_sub(1)))
            .collect();
        Snake { head, body }
    }

    /// Return the position of the snake's head
    pub(super) fn head(&self) -> Position {
        self.head
    }

    /// Return the number of cells the snake occupies
    pub(super) fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// Iterate over the snake's cells from head to tail
    pub(super) fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.head).chain(self.body.iter().copied())
    }

    /// Does any part of the snake, head through tail, occupy `pos`?
    pub(super) fn occupies(&self, pos: Position) -> bool {
        self.head == pos || self.body.contains(&pos)
    }

    /// Move the head to `pos`.  Unless `grow` is true, the tail is dropped so
    /// that the length stays the same.
    pub(super) fn advance(&mut self, pos: Position, grow: bool) {
        self.body.push_front(self.head);
        self.head = pos;
        if !grow {
            let _ = self.body.pop_back();
        }
    }
}
