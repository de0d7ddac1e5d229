use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::centered_rect_fixed;

/// Render the known-networks popup: persisted networks with a forget action.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let known = app.manager.known_networks();

    let width = 56_u16.min(area.width.saturating_sub(4));
    let height = (known.len() as u16 + 4).clamp(6, area.height.saturating_sub(4));
    let dialog = centered_rect_fixed(width, height, area);

    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(
            format!(" Known networks ({}) ", known.len()),
            t.style_accent_bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.style_accent())
        .style(t.style_popup());

    if known.is_empty() {
        let para = Paragraph::new("No known networks.")
            .block(block)
            .style(t.style_dim())
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(para, dialog);
        return;
    }

    let items: Vec<ListItem> = known
        .iter()
        .enumerate()
        .map(|(idx, net)| {
            let selector = if idx == app.known_selected {
                Span::styled("> ", t.style_accent())
            } else {
                Span::raw("  ")
            };
            let line = Line::from(vec![
                selector,
                Span::styled(net.ssid.clone(), t.style_default()),
                Span::styled(format!("  {}", net.security), t.style_dim()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(t.style_selected())
        .highlight_symbol("");

    let mut state = ListState::default();
    state.select(Some(app.known_selected));

    frame.render_stateful_widget(list, dialog, &mut state);
}
