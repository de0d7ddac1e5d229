use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, EnterpriseForm, PasswordPrompt};
use crate::ui::centered_rect_fixed;

/// Render the passphrase input modal
pub fn render_password(frame: &mut Frame, app: &App, prompt: &PasswordPrompt) {
    let t = &app.theme;
    let area = frame.area();
    let width = 56_u16.min(area.width.saturating_sub(4));
    let height = 7_u16.min(area.height.saturating_sub(4));
    let dialog = centered_rect_fixed(width, height, area);

    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(
            format!(" Connect to \"{}\" ({}) ", prompt.ssid, prompt.security),
            t.style_accent_bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.style_accent())
        .style(t.style_popup());
    frame.render_widget(block, dialog);

    let display = if prompt.hide {
        "●".repeat(prompt.input.chars().count())
    } else {
        prompt.input.clone()
    };

    let input_line = Line::from(vec![
        Span::styled("Passphrase: ", t.style_dim()),
        Span::styled(display, t.style_default()),
        Span::styled("█", t.style_accent()),
    ]);
    frame.render_widget(
        Paragraph::new(input_line),
        inner_line(dialog, 2),
    );

    let toggle = if prompt.hide { "Show" } else { "Hide" };
    let hints = Line::from(vec![
        Span::styled("[Enter]", t.style_key_hint()),
        Span::styled(" Connect  ", t.style_key_desc()),
        Span::styled("[Esc]", t.style_key_hint()),
        Span::styled(" Cancel  ", t.style_key_desc()),
        Span::styled("[Ctrl+H]", t.style_key_hint()),
        Span::styled(format!(" {toggle}"), t.style_key_desc()),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Left),
        inner_line(dialog, height.saturating_sub(2)),
    );
}

/// Render the 802.1x login form
pub fn render_enterprise(frame: &mut Frame, app: &App, form: &EnterpriseForm) {
    let t = &app.theme;
    let area = frame.area();
    let width = 60_u16.min(area.width.saturating_sub(4));
    let height = 11_u16.min(area.height.saturating_sub(4));
    let dialog = centered_rect_fixed(width, height, area);

    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(
            format!(" Login to \"{}\" ({}) ", form.ssid, form.security),
            t.style_accent_bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(t.style_accent())
        .style(t.style_popup());
    frame.render_widget(block, dialog);

    for (idx, label) in EnterpriseForm::LABELS.iter().enumerate() {
        let focused = idx == form.focus;
        let value = &form.fields[idx];
        let display = if form.is_masked(idx) {
            "●".repeat(value.chars().count())
        } else {
            value.clone()
        };

        let mut spans = vec![
            Span::styled(
                format!("{label:<20}"),
                if focused { t.style_accent() } else { t.style_dim() },
            ),
            Span::styled(display, t.style_default()),
        ];
        if focused {
            spans.push(Span::styled("█", t.style_accent()));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            inner_line(dialog, 2 + idx as u16),
        );
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", t.style_key_hint()),
        Span::styled(" Next field  ", t.style_key_desc()),
        Span::styled("[Enter]", t.style_key_hint()),
        Span::styled(" Connect  ", t.style_key_desc()),
        Span::styled("[Esc]", t.style_key_hint()),
        Span::styled(" Cancel", t.style_key_desc()),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Left),
        inner_line(dialog, height.saturating_sub(2)),
    );
}

/// One text row inside a dialog, with a margin for the border.
fn inner_line(dialog: Rect, row: u16) -> Rect {
    Rect {
        x: dialog.x + 3,
        y: dialog.y + row,
        width: dialog.width.saturating_sub(6),
        height: 1,
    }
}
