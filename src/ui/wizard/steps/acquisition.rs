//! Step 1: fetch or type the news content

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::loading_status;
use crate::ui::wizard::WizardScreen;
use crate::wizard::{Action, Wizard};

impl WizardScreen {
    pub(crate) fn render_acquisition_step(&mut self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Fetch error
                Constraint::Min(4),    // Content
                Constraint::Length(1), // Actions
            ])
            .split(area);

        if let Some(error) = wizard.fetch_error() {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Fetch failed: ", Style::default().fg(Color::Red)),
                    Span::raw(error.to_string()),
                ])),
                chunks[0],
            );
        }

        self.content.render(
            frame,
            chunks[1],
            true,
            loading_status(wizard, Action::FetchNews),
        );
        self.action_bar(frame, chunks[2], wizard, &[Action::FetchNews]);
    }
}
