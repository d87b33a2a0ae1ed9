use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::Heading;

/// Ordered snake body (front is head) plus its current heading.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Heading,
}

impl Snake {
    /// Creates an idle one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Cell) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            heading: Heading::None,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, heading: Heading) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
            heading,
        }
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the last segment, which is vacated on a non-growing move.
    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the head cell the snake would enter when moving along `heading`.
    #[must_use]
    pub fn next_head(&self, heading: Heading) -> Cell {
        self.head().offset(heading.delta())
    }

    /// Returns true when `cell` would hit the body after the next move.
    ///
    /// Without growth the tail moves out of the way in the same step, so it does not count.
    #[must_use]
    pub fn collides_after_move(&self, cell: Cell, grow: bool) -> bool {
        let considered = if grow {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(considered).any(|segment| *segment == cell)
    }

    /// Moves the head into `new_head`, keeping the tail when `grow` is set.
    pub fn advance(&mut self, new_head: Cell, heading: Heading, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
        self.heading = heading;
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the heading applied on the most recent move.
    #[must_use]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
