//! Keyboard shortcuts for the wizard.
//!
//! One table drives both key dispatch and the footer help line. Keys not in
//! the table go to the focused text area.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a shortcut asks the screen to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the focused pane's backend action
    Run,
    SwitchFocus,
    NextStep,
    PrevStep,
    SyncCache,
    OpenAudio,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool,
    pub command: Command,
    /// Shown in the footer; None keeps the shortcut out of the help line
    pub label: Option<&'static str>,
}

impl Shortcut {
    const fn ctrl(c: char, command: Command, label: Option<&'static str>) -> Self {
        Self {
            key: KeyCode::Char(c),
            ctrl: true,
            command,
            label,
        }
    }

    const fn plain(key: KeyCode, command: Command, label: Option<&'static str>) -> Self {
        Self {
            key,
            ctrl: false,
            command,
            label,
        }
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        ctrl == self.ctrl && key.code == self.key
    }

    pub fn key_display(&self) -> String {
        let key = match self.key {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            other => format!("{other:?}"),
        };
        if self.ctrl {
            format!("^{key}")
        } else {
            key
        }
    }
}

pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut::ctrl('g', Command::Run, Some("run")),
    Shortcut::plain(KeyCode::Tab, Command::SwitchFocus, Some("focus")),
    Shortcut::ctrl('n', Command::NextStep, Some("next")),
    Shortcut::ctrl('p', Command::PrevStep, Some("back")),
    Shortcut::ctrl('s', Command::SyncCache, Some("sync")),
    Shortcut::ctrl('o', Command::OpenAudio, Some("play")),
    Shortcut::plain(KeyCode::Esc, Command::Quit, Some("quit")),
    Shortcut::ctrl('q', Command::Quit, None),
];

pub fn resolve(key: &KeyEvent) -> Option<Command> {
    SHORTCUTS
        .iter()
        .find(|s| s.matches(key))
        .map(|s| s.command)
}

/// `(key, label)` pairs for the footer
pub fn help_entries() -> Vec<(String, &'static str)> {
    SHORTCUTS
        .iter()
        .filter_map(|s| s.label.map(|label| (s.key_display(), label)))
        .collect()
}
