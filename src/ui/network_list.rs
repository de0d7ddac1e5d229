use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const SSID_WIDTH: usize = 32;

/// Render the visible-network list
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let networks = app.manager.networks();

    let block = Block::default()
        .title(Span::styled(
            format!(" Networks ({}) ", networks.len()),
            t.style_accent_bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.style_border())
        .style(t.style_default());

    if networks.is_empty() {
        let msg = if app.manager.current_device().is_powered() {
            "No networks found. Press [s] to scan."
        } else {
            "Device is powered off. Press [a] to power it on."
        };
        let para = Paragraph::new(msg)
            .block(block)
            .style(t.style_dim())
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(para, area);
        return;
    }

    let items: Vec<ListItem> = networks
        .iter()
        .enumerate()
        .map(|(idx, net)| {
            let is_selected = idx == app.selected;

            let selector = if is_selected {
                Span::styled("> ", t.style_accent())
            } else {
                Span::raw("  ")
            };

            let status_dot = if net.connected {
                Span::styled("● ", t.style_connected())
            } else {
                Span::raw("  ")
            };

            let ssid_display = if net.ssid.width() > SSID_WIDTH {
                let truncated: String = net.ssid.chars().take(SSID_WIDTH - 1).collect();
                format!("{truncated}…")
            } else {
                format!("{:<width$}", net.ssid, width = SSID_WIDTH)
            };

            let ssid_style = if net.connected {
                t.style_connected()
            } else if is_selected {
                t.style_selected()
            } else {
                t.style_default()
            };

            let security = if net.security.needs_passphrase() {
                Span::styled(format!("  {}", net.security), t.style_dim())
            } else {
                Span::styled("  open".to_string(), t.style_warning())
            };

            let line = Line::from(vec![
                selector,
                status_dot,
                Span::styled(ssid_display, ssid_style),
                security,
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(t.style_selected())
        .highlight_symbol("");

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}
