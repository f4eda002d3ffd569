//! Step 3: generate the dialogue script

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::loading_status;
use crate::ui::wizard::WizardScreen;
use crate::wizard::{Action, Wizard};

impl WizardScreen {
    pub(crate) fn render_script_step(&mut self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(area);

        self.generated_script.render(
            frame,
            chunks[0],
            true,
            loading_status(wizard, Action::GenerateScript),
        );
        self.action_bar(frame, chunks[1], wizard, &[Action::GenerateScript]);
    }
}
