use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::Rgb;
use crate::grid::{Cell, GridSize};
use crate::session::{Phase, Snapshot};
use crate::ui::hud::render_hud;
use crate::ui::menu::{StartMenu, render_game_over_menu, render_start_menu};
use crate::ui::signals::SessionSignals;

/// Terminal columns per grid cell; two keeps cells roughly square.
const CELL_WIDTH: u16 = 2;
const CELL_GLYPH: &str = "  ";
const FOOD_COLOR: Rgb = Rgb::new(0xff, 0x00, 0x00);

/// Presentation-only values that are not part of the session snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ViewInfo<'a> {
    pub menu: &'a StartMenu,
    /// Latest values reported to the front-end's session observer.
    pub signals: SessionSignals,
}

/// Renders the full frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, view: ViewInfo<'_>) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, view.signals);
    let field = field_area(play_area, snapshot.grid);

    let block = Block::bordered().border_style(Style::new().fg(Color::Gray));
    let outer = Rect {
        x: field.x.saturating_sub(1),
        y: field.y.saturating_sub(1),
        width: field.width.saturating_add(2).min(play_area.width),
        height: field.height.saturating_add(2).min(play_area.height),
    };
    frame.render_widget(block, outer);

    let background = Color::from(snapshot.config.colors.background);
    frame
        .buffer_mut()
        .set_style(field, Style::new().bg(background));

    if snapshot.phase != Phase::Idle {
        render_food(frame, field, snapshot);
        render_snake(frame, field, snapshot);
    }

    match snapshot.phase {
        Phase::Idle => render_start_menu(frame, play_area, view.menu, snapshot.high_score),
        Phase::Terminated {
            final_score,
            reason,
        } => {
            let (final_score, reason) = view.signals.game_over.unwrap_or((final_score, reason));
            render_game_over_menu(
                frame,
                play_area,
                final_score,
                view.signals.high_score.max(snapshot.high_score),
                view.signals.new_high_score,
                reason,
            );
        }
        Phase::Running => {}
    }
}

/// Centers the grid inside `area`, clipping when the terminal is too small.
fn field_area(area: Rect, grid: GridSize) -> Rect {
    let inner = area.inner(ratatui::layout::Margin::new(1, 1));
    let tiles = grid.tile_count();
    let width = tiles.saturating_mul(CELL_WIDTH).min(inner.width);
    let height = tiles.min(inner.height);

    Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, field: Rect, snapshot: &Snapshot<'_>) {
    paint_cell(frame, field, snapshot.food, FOOD_COLOR);
}

fn render_snake(frame: &mut Frame<'_>, field: Rect, snapshot: &Snapshot<'_>) {
    let base = snapshot.config.colors.snake;
    let head = snapshot.snake.head();

    for segment in snapshot.snake.segments() {
        let color = if *segment == head {
            base.lighten(20)
        } else {
            base.darken(10)
        };
        paint_cell(frame, field, *segment, color);
    }
}

fn paint_cell(frame: &mut Frame<'_>, field: Rect, cell: Cell, color: Rgb) {
    let Some((x, y)) = cell_to_terminal(field, cell) else {
        return;
    };
    frame
        .buffer_mut()
        .set_string(x, y, CELL_GLYPH, Style::new().bg(Color::from(color)));
}

fn cell_to_terminal(field: Rect, cell: Cell) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = field.x.saturating_add(x_offset);
    let y = field.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > field.right() || y >= field.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::SessionConfig;
    use crate::engine::GameState;
    use crate::grid::{Cell, GridSize};
    use crate::input::Heading;
    use crate::score::MemoryScoreStore;
    use crate::session::SessionController;
    use crate::snake::Snake;
    use crate::ui::menu::StartMenu;
    use crate::ui::signals::SignalRecorder;

    use super::{ViewInfo, cell_to_terminal, field_area, render};

    fn screen_text(
        session: &SessionController<MemoryScoreStore>,
        recorder: &SignalRecorder,
    ) -> String {
        let menu = StartMenu::new(SessionConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test backend");
        terminal
            .draw(|frame| {
                let view = ViewInfo {
                    menu: &menu,
                    signals: recorder.latest(),
                };
                render(frame, &session.snapshot(), view);
            })
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn game_over_popup_reads_observed_signals() {
        let mut session =
            SessionController::with_seed(GridSize::new(10), MemoryScoreStore::with_value(3), 2);
        let recorder = SignalRecorder::new(session.high_score());
        session.subscribe(Box::new(recorder.clone()));
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(10),
            Snake::from_segments(
                vec![Cell::new(0, 5), Cell::new(0, 6), Cell::new(0, 7), Cell::new(0, 8)],
                Heading::Up,
            ),
            Cell::new(0, 4),
        ));

        session.on_tick();
        session.request_heading_change(Heading::Left);
        session.on_tick();

        let text = screen_text(&session, &recorder);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Score: 4"));
        assert!(text.contains("High score: 4"));
        assert!(text.contains("New high score!"));
    }

    #[test]
    fn game_over_without_record_has_no_banner() {
        let mut session =
            SessionController::with_seed(GridSize::new(10), MemoryScoreStore::with_value(9), 2);
        let recorder = SignalRecorder::new(session.high_score());
        session.subscribe(Box::new(recorder.clone()));
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(10),
            Snake::from_segments(vec![Cell::new(0, 5)], Heading::Left),
            Cell::new(9, 9),
        ));

        session.on_tick();

        let text = screen_text(&session, &recorder);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("High score: 9"));
        assert!(!text.contains("New high score!"));
    }

    #[test]
    fn cells_map_to_double_width_columns() {
        let field = Rect::new(10, 5, 40, 20);
        assert_eq!(cell_to_terminal(field, Cell::new(0, 0)), Some((10, 5)));
        assert_eq!(cell_to_terminal(field, Cell::new(3, 2)), Some((16, 7)));
        assert_eq!(cell_to_terminal(field, Cell::new(20, 0)), None);
        assert_eq!(cell_to_terminal(field, Cell::new(-1, 0)), None);
    }

    #[test]
    fn field_is_centered_and_clipped() {
        let field = field_area(Rect::new(0, 0, 80, 30), GridSize::new(20));
        assert_eq!((field.width, field.height), (40, 20));
        assert_eq!((field.x, field.y), (20, 5));

        let clipped = field_area(Rect::new(0, 0, 12, 8), GridSize::new(20));
        assert_eq!((clipped.width, clipped.height), (10, 6));
    }
}
