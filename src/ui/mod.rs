pub mod header;
pub mod known;
pub mod network_list;
pub mod prompts;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, Mode};

/// Top-level draw function: device header, network list, status bar, and
/// whichever modal the current mode calls for.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    network_list::render(f, app, chunks[1]);
    status_bar::render(f, app, chunks[2]);

    match &app.mode {
        Mode::Normal => {}
        Mode::Known => known::render(f, app, f.area()),
        Mode::Password(prompt) => prompts::render_password(f, app, prompt),
        Mode::Enterprise(form) => prompts::render_enterprise(f, app, form),
    }
}

/// Create a centered rectangle of fixed size within `area`.
pub(crate) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
