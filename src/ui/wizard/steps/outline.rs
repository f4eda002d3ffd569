//! Step 2: outline and questions side by side

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::loading_status;
use crate::ui::wizard::WizardScreen;
use crate::wizard::{Action, Wizard};

impl WizardScreen {
    pub(crate) fn render_outline_step(&mut self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let questions_focused = self.questions_focused;
        self.outline.render(
            frame,
            panes[0],
            !questions_focused,
            loading_status(wizard, Action::GenerateOutline),
        );
        self.questions.render(
            frame,
            panes[1],
            questions_focused,
            loading_status(wizard, Action::GenerateQuestions),
        );

        self.action_bar(
            frame,
            rows[1],
            wizard,
            &[Action::GenerateOutline, Action::GenerateQuestions],
        );
    }
}
