//! Multi-line text pane backed by tui-textarea

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};
use tui_textarea::TextArea;

pub struct Editor {
    textarea: TextArea<'static>,
    title: &'static str,
    placeholder: &'static str,
}

impl Editor {
    pub fn new(title: &'static str, placeholder: &'static str) -> Self {
        Self {
            textarea: TextArea::default(),
            title,
            placeholder,
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Replace the contents. Returns false if `value` is already shown.
    pub fn set_text(&mut self, value: &str) -> bool {
        if self.text() == value {
            return false;
        }
        // split keeps trailing empty lines so text() round-trips
        self.textarea = TextArea::from(value.split('\n').map(str::to_string));
        true
    }

    /// Feed a key to the text area. Returns true if the text changed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        self.textarea.input(key)
    }

    /// Draw the pane. `status` is appended to the title (e.g. "Generating...").
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, status: Option<&str>) {
        let border = if focused { Color::Cyan } else { Color::DarkGray };

        let mut title = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if let Some(status) = status {
            title.push(Span::styled(
                format!("{status} "),
                Style::default().fg(Color::Yellow),
            ));
        }

        self.textarea.set_block(
            Block::default()
                .title(Line::from(title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_cursor_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
        self.textarea.set_placeholder_text(self.placeholder);
        self.textarea
            .set_placeholder_style(Style::default().fg(Color::DarkGray));

        frame.render_widget(&self.textarea, area);
    }
}
