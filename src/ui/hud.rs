use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::session::Snapshot;
use crate::ui::signals::SessionSignals;

/// Renders the one-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    signals: SessionSignals,
) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(snapshot, signals))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hud_area,
    );

    play_area
}

fn info_line(snapshot: &Snapshot<'_>, signals: SessionSignals) -> Line<'static> {
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    // Gold while the running session holds the record.
    let high = if signals.new_high_score {
        value.fg(Color::Yellow)
    } else {
        value
    };

    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(snapshot.score.to_string(), value),
        Span::raw(" | "),
        Span::raw("High score: "),
        Span::styled(snapshot.high_score.to_string(), high),
        Span::raw(" | "),
        Span::raw(format!("Speed: {}", snapshot.config.speed.label())),
    ])
}
