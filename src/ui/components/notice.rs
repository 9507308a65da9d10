use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// A message shown under a screen after an operation, in place of a popup alert
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

pub fn render_notice<B: Backend>(f: &mut Frame<B>, notice: &Notice, area: Rect) {
    let (title, color) = if notice.is_error() {
        ("Erro", Color::Red)
    } else {
        ("Aviso", Color::Green)
    };

    let paragraph = Paragraph::new(notice.text())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}
