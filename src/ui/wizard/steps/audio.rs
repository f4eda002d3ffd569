//! Step 4: voice the script

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::loading_status;
use crate::ui::wizard::WizardScreen;
use crate::wizard::{Action, Wizard};

impl WizardScreen {
    pub(crate) fn render_audio_step(&mut self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // Script
                Constraint::Length(3), // Player
                Constraint::Length(1), // Actions
            ])
            .split(area);

        self.script.render(
            frame,
            chunks[0],
            true,
            loading_status(wizard, Action::GenerateAudio),
        );

        let player = match wizard.audio_url() {
            Some(url) => Line::from(vec![
                Span::styled(
                    url.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled("  (^O to play)", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                "No audio generated yet",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(
            Paragraph::new(player).block(
                Block::default()
                    .title(" Audio ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            ),
            chunks[1],
        );

        self.action_bar(frame, chunks[2], wizard, &[Action::GenerateAudio]);
    }
}
