use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Mode};
use crate::ui::theme::Theme;

/// Render the bottom line: a transient status message when one is active,
/// otherwise context-sensitive keybinding hints.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    if let Some(status) = &app.status {
        let style = if status.is_error {
            t.style_error()
        } else {
            t.style_connected()
        };
        let para = Paragraph::new(Line::from(Span::styled(status.message.clone(), style)))
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
        return;
    }

    let hints = match app.mode {
        Mode::Normal => normal_hints(t),
        Mode::Known => known_hints(t),
        Mode::Password(_) | Mode::Enterprise(_) => prompt_hints(t),
    };

    let para = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn normal_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "↑↓/jk"),
        desc(t, "Navigate "),
        key(t, "Enter"),
        desc(t, "Connect "),
        key(t, "d"),
        desc(t, "Disconnect "),
        key(t, "s"),
        desc(t, "Scan "),
        key(t, "n"),
        desc(t, "Known "),
        key(t, "a"),
        desc(t, "Power on "),
        key(t, "Tab"),
        desc(t, "Device "),
        key(t, "q"),
        desc(t, "Quit"),
    ]
}

fn known_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "↑↓/jk"),
        desc(t, "Navigate "),
        key(t, "f"),
        desc(t, "Forget "),
        key(t, "Esc"),
        desc(t, "Close"),
    ]
}

fn prompt_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "Enter"),
        desc(t, "Submit "),
        key(t, "Esc"),
        desc(t, "Cancel "),
        key(t, "Ctrl+H"),
        desc(t, "Toggle visibility"),
    ]
}

fn key(t: &Theme, k: &'static str) -> Span<'static> {
    Span::styled(format!(" [{k}] "), t.style_key_hint())
}

fn desc(t: &Theme, d: &'static str) -> Span<'static> {
    Span::styled(d, t.style_key_desc())
}
