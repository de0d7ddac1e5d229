use ratatui::style::{Color, Modifier, Style};

/// Color slots for the UI. Defaults are terminal-adaptive (Reset background
/// respects the terminal's own); every slot can be overridden from the
/// config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub dim: Color,
    pub border: Color,
    pub accent: Color,
    pub selectable: Color,
    pub selectable_active: Color,
    pub connected: Color,
    pub warning: Color,
    pub error: Color,
    pub popup_background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            dim: Color::DarkGray,
            border: Color::DarkGray,
            accent: Color::Cyan,
            selectable: Color::Gray,
            selectable_active: Color::DarkGray,
            connected: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            popup_background: Color::Reset,
        }
    }
}

impl Theme {
    pub fn style_default(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn style_dim(&self) -> Style {
        Style::default().fg(self.dim).bg(self.background)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent).bg(self.background)
    }

    pub fn style_accent_bold(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_selected(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .bg(self.selectable_active)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_connected(&self) -> Style {
        Style::default()
            .fg(self.connected)
            .bg(self.background)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_warning(&self) -> Style {
        Style::default().fg(self.warning).bg(self.background)
    }

    pub fn style_error(&self) -> Style {
        Style::default().fg(self.error).bg(self.background)
    }

    pub fn style_border(&self) -> Style {
        Style::default().fg(self.border).bg(self.background)
    }

    pub fn style_popup(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.popup_background)
    }

    pub fn style_key_hint(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_key_desc(&self) -> Style {
        self.style_dim()
    }
}
