use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::SessionConfig;
use crate::engine::TerminalReason;
use crate::input::{GameInput, Heading};

/// Rows of the start menu, top to bottom.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MenuRow {
    Speed,
    Background,
    SnakeColor,
    Start,
}

const ROWS: [MenuRow; 4] = [
    MenuRow::Speed,
    MenuRow::Background,
    MenuRow::SnakeColor,
    MenuRow::Start,
];

/// What the start menu asks the caller to do after an input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MenuAction {
    None,
    Start(SessionConfig),
}

/// Selection state of the start menu; edits a draft config until the player starts.
#[derive(Debug, Clone, Copy)]
pub struct StartMenu {
    selected: usize,
    draft: SessionConfig,
}

impl StartMenu {
    #[must_use]
    pub fn new(draft: SessionConfig) -> Self {
        Self {
            selected: ROWS.len() - 1,
            draft,
        }
    }

    #[must_use]
    pub fn selected(&self) -> MenuRow {
        ROWS[self.selected]
    }

    #[must_use]
    pub fn draft(&self) -> SessionConfig {
        self.draft
    }

    /// Up/Down move the selection, Left/Right change the selected value.
    pub fn apply(&mut self, input: GameInput) -> MenuAction {
        match input {
            GameInput::Turn(Heading::Up) => {
                self.selected = (self.selected + ROWS.len() - 1) % ROWS.len();
            }
            GameInput::Turn(Heading::Down) => {
                self.selected = (self.selected + 1) % ROWS.len();
            }
            GameInput::Turn(Heading::Left) => self.cycle(false),
            GameInput::Turn(Heading::Right) => self.cycle(true),
            GameInput::Confirm => return MenuAction::Start(self.draft),
            GameInput::Turn(Heading::None) | GameInput::Quit => {}
        }
        MenuAction::None
    }

    fn cycle(&mut self, forward: bool) {
        let row = self.selected();
        let draft = &mut self.draft;
        match row {
            MenuRow::Speed => draft.speed = draft.speed.cycled(forward),
            MenuRow::Background => {
                draft.colors.background = draft.colors.background.cycled(forward);
            }
            MenuRow::SnakeColor => draft.colors.snake = draft.colors.snake.cycled(forward),
            MenuRow::Start => {}
        }
    }
}

/// Draws the start screen with its configuration rows.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, menu: &StartMenu, high_score: u32) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(7),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let draft = menu.draft();
    let mut body = vec![Line::from(format!("High score: {high_score}")), Line::from("")];
    for row in ROWS {
        let text = match row {
            MenuRow::Speed => format!("Speed: < {} >", draft.speed.label()),
            MenuRow::Background => format!("Background: < {} >", draft.colors.background),
            MenuRow::SnakeColor => format!("Snake: < {} >", draft.colors.snake),
            MenuRow::Start => "[ Start ]".to_owned(),
        };
        let style = if row == menu.selected() {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default()
        };
        body.push(Line::from(Span::styled(text, style)));
    }

    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Up/Down select, Left/Right change, Enter start, Q quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    is_new_high: bool,
    reason: TerminalReason,
) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(format!("High score: {high_score}")),
        Line::from(match reason {
            TerminalReason::WallCollision => "Cause: hit wall",
            TerminalReason::SelfCollision => "Cause: hit yourself",
            TerminalReason::BoardFilled => "Cause: board full",
        }),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter]/[Space] Back to menu"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
