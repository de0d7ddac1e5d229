use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Render the device bar: current device, its power state, and how many
/// devices are available to Tab through.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let device = app.manager.current_device();

    let power = if device.is_powered() {
        Span::styled("on", t.style_connected())
    } else {
        Span::styled("off — press [a] to power on", t.style_warning())
    };

    let mut spans = vec![
        Span::styled(device.name.clone(), t.style_accent_bold()),
        Span::styled(format!("  {}", device.address), t.style_dim()),
        Span::styled(format!("  {}  ", device.mode), t.style_dim()),
        power,
    ];

    let extra = app.manager.devices().len().saturating_sub(1);
    if extra > 0 {
        spans.push(Span::styled(
            format!("  (+{extra} more, Tab to switch)"),
            t.style_dim(),
        ));
    }

    let block = Block::default()
        .title(Span::styled(" iwtui ", t.style_accent_bold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.style_border())
        .style(t.style_default());

    let para = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(para, area);
}
