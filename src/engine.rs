use std::collections::HashSet;

use rand::Rng;

use crate::food;
use crate::grid::{Cell, GridSize};
use crate::input::Heading;
use crate::snake::Snake;

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TerminalReason {
    WallCollision,
    SelfCollision,
    /// The snake ate and no free cell is left for the next food.
    BoardFilled,
}

/// Outcome of one engine step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickResult {
    /// Heading is `None`; nothing moved.
    Idle,
    Advanced { ate_food: bool },
    Terminal {
        final_score: u32,
        reason: TerminalReason,
    },
}

impl TickResult {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}

/// Board state for one session: snake, food and score on a fixed grid.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Cell,
    pub score: u32,
    grid: GridSize,
}

impl GameState {
    /// Creates the opening state: a one-cell snake at the grid origin and fresh food.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(grid: GridSize, rng: &mut R) -> Self {
        let snake = Snake::new(grid.origin());
        let occupied: HashSet<Cell> = snake.segments().copied().collect();
        let food = food::place(rng, grid, &occupied)
            .expect("a fresh grid always has a free cell beside the snake");

        Self {
            snake,
            food,
            score: 0,
            grid,
        }
    }

    /// Builds a state from explicit parts. `score` follows the body length.
    #[must_use]
    pub fn from_parts(grid: GridSize, snake: Snake, food: Cell) -> Self {
        let score = u32::try_from(snake.len() - 1).unwrap_or(u32::MAX);
        Self {
            snake,
            food,
            score,
            grid,
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Advances the board by exactly one step along `heading`.
    ///
    /// On a collision the board is left untouched and a terminal result is returned.
    pub fn tick<R: Rng + ?Sized>(&mut self, heading: Heading, rng: &mut R) -> TickResult {
        if !heading.is_moving() {
            return TickResult::Idle;
        }

        let new_head = self.snake.next_head(heading);
        if !new_head.is_within(self.grid) {
            return self.terminal(TerminalReason::WallCollision);
        }

        let ate_food = new_head == self.food;
        if self.snake.collides_after_move(new_head, ate_food) {
            return self.terminal(TerminalReason::SelfCollision);
        }

        self.snake.advance(new_head, heading, ate_food);
        if !ate_food {
            return TickResult::Advanced { ate_food };
        }

        self.score += 1;
        let occupied: HashSet<Cell> = self.snake.segments().copied().collect();
        match food::place(rng, self.grid, &occupied) {
            Some(cell) => {
                self.food = cell;
                TickResult::Advanced { ate_food }
            }
            None => self.terminal(TerminalReason::BoardFilled),
        }
    }

    fn terminal(&self, reason: TerminalReason) -> TickResult {
        TickResult::Terminal {
            final_score: self.score,
            reason,
        }
    }
}
