//! Terminal view of the four-step wizard.
//!
//! `WizardScreen` owns one text area per session field and keeps them in
//! step with the session through a subscription. Keys either map to a
//! shortcut (see `keybindings`) or are typed into the focused area, in which
//! case the new text is written back through `Wizard::edit`.

use std::collections::HashMap;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc::error::TryRecvError;

use crate::session::{Field, Subscription};
use crate::ui::editor::Editor;
use crate::ui::keybindings::{self, Command};
use crate::ui::toast::render_notifications;
use crate::wizard::{Action, StepId, Wizard};

mod steps;


/// What the event loop should do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Continue,
    OpenAudio(String),
    Quit,
}

pub struct WizardScreen {
    content: Editor,
    outline: Editor,
    questions: Editor,
    generated_script: Editor,
    script: Editor,
    /// Step 2 has two panes; false = outline
    questions_focused: bool,
    subscription: Subscription,
}

impl WizardScreen {
    pub fn new(wizard: &mut Wizard) -> Self {
        let subscription = wizard.session_mut().subscribe(Field::all());
        let mut screen = Self {
            content: Editor::new("News content", "Fetch today's news or type your own"),
            outline: Editor::new("Outline", "Generate or write an outline"),
            questions: Editor::new("Questions", "Generate or write questions"),
            generated_script: Editor::new("Podcast script", "Generate the podcast script"),
            script: Editor::new("Script for audio", "Enter the script to voice"),
            questions_focused: false,
            subscription,
        };
        for field in Field::all() {
            screen.editor_mut(*field).set_text(wizard.session().get(*field));
        }
        screen
    }

    fn editor_mut(&mut self, field: Field) -> &mut Editor {
        match field {
            Field::Content => &mut self.content,
            Field::Outline => &mut self.outline,
            Field::Questions => &mut self.questions,
            Field::GeneratedScript => &mut self.generated_script,
            Field::Script => &mut self.script,
        }
    }

    /// Field edited by the focused pane on `step`
    pub fn focused_field(&self, step: StepId) -> Field {
        match step {
            StepId::ContentAcquisition => Field::Content,
            StepId::ContentOutline if self.questions_focused => Field::Questions,
            StepId::ContentOutline => Field::Outline,
            StepId::ScriptGeneration => Field::GeneratedScript,
            StepId::AudioGeneration => Field::Script,
        }
    }

    /// Action bound to the focused pane
    pub fn focused_action(&self, step: StepId) -> Action {
        match self.focused_field(step) {
            Field::Content => Action::FetchNews,
            Field::Outline => Action::GenerateOutline,
            Field::Questions => Action::GenerateQuestions,
            Field::GeneratedScript => Action::GenerateScript,
            Field::Script => Action::GenerateAudio,
        }
    }

    /// Mirror session changes (from the backend or elsewhere) into the panes.
    /// Only the newest value per field is applied, so echoes of our own
    /// keystrokes never reset the cursor.
    pub fn sync_from_session(&mut self) -> usize {
        let mut latest: HashMap<Field, String> = HashMap::new();
        loop {
            match self.subscription.changes.try_recv() {
                Ok(change) => {
                    latest.insert(change.field, change.value);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        let mut applied = 0;
        for (field, value) in latest {
            if self.editor_mut(field).set_text(&value) {
                applied += 1;
            }
        }
        applied
    }

    pub fn handle_key(&mut self, wizard: &mut Wizard, key: KeyEvent) -> ScreenEvent {
        match keybindings::resolve(&key) {
            Some(Command::Quit) => return ScreenEvent::Quit,
            Some(Command::Run) => {
                wizard.start(self.focused_action(wizard.step()));
            }
            Some(Command::SwitchFocus) => {
                if wizard.step() == StepId::ContentOutline {
                    self.questions_focused = !self.questions_focused;
                }
            }
            Some(Command::NextStep) => {
                wizard.next();
            }
            Some(Command::PrevStep) => {
                wizard.back();
            }
            Some(Command::SyncCache) => wizard.flush_cache(),
            Some(Command::OpenAudio) => {
                if let Some(url) = wizard.audio_url() {
                    return ScreenEvent::OpenAudio(url.to_string());
                }
            }
            None => {
                let field = self.focused_field(wizard.step());
                let editor = self.editor_mut(field);
                if editor.input(key) {
                    let text = editor.text();
                    wizard.edit(field, text);
                }
            }
        }
        ScreenEvent::Continue
    }

    pub fn render(&mut self, frame: &mut Frame, wizard: &Wizard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Step tabs
                Constraint::Length(2), // Description
                Constraint::Min(6),    // Step body
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0], wizard.step());

        let desc = Paragraph::new(Line::from(Span::styled(
            wizard.step().description(),
            Style::default().fg(Color::Gray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(desc, chunks[1]);

        match wizard.step() {
            StepId::ContentAcquisition => self.render_acquisition_step(frame, chunks[2], wizard),
            StepId::ContentOutline => self.render_outline_step(frame, chunks[2], wizard),
            StepId::ScriptGeneration => self.render_script_step(frame, chunks[2], wizard),
            StepId::AudioGeneration => self.render_audio_step(frame, chunks[2], wizard),
        }

        render_footer(frame, chunks[3], wizard);
        let full = frame.area();
        render_notifications(frame, full, wizard.notifications());
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, current: StepId) {
        let mut spans = Vec::new();
        for (i, step) in StepId::all().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ›  ", Style::default().fg(Color::DarkGray)));
            }
            let style = if *step == current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if *step < current {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(
                format!("{}. {}", step.number(), step.title()),
                style,
            ));
        }

        let tabs = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(Span::styled(
                        " Podcast Wizard ",
                        Style::default()
                            .fg(Color::LightRed)
                            .add_modifier(Modifier::BOLD),
                    )),
            );
        frame.render_widget(tabs, area);
    }

    /// Action triggers for the step, plus the next-step hint
    pub(crate) fn action_bar(
        &self,
        frame: &mut Frame,
        area: Rect,
        wizard: &Wizard,
        actions: &[Action],
    ) {
        let mut spans = Vec::new();
        for action in actions {
            let (text, style) = if wizard.is_loading(*action) {
                (
                    action.loading_label(),
                    Style::default().fg(Color::Yellow),
                )
            } else if wizard.check_action(*action).is_ok() {
                (action.label(), Style::default().fg(Color::Green))
            } else {
                (action.label(), Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(format!("[{text}]"), style));
            spans.push(Span::raw("  "));
        }

        let next_style = if wizard.can_advance() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if wizard.step().next().is_some() {
            spans.push(Span::styled("[Next ^N]", next_style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_footer(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let mut spans = Vec::new();
    for (key, label) in keybindings::help_entries() {
        spans.push(Span::styled(key, Style::default().fg(Color::Green)));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    spans.push(Span::styled(
        wizard.sync_status().label(),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
