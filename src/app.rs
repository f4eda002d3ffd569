use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use podcast_wizard::api::{HttpBackend, PodcastBackend};
use podcast_wizard::config::Config;
use podcast_wizard::session::SessionState;
use podcast_wizard::ui::terminal_guard::WizardTerminal;
use podcast_wizard::ui::{install_panic_hook, ScreenEvent, TerminalGuard, WizardScreen};
use podcast_wizard::wizard::{Notification, Wizard, WizardOptions};

pub struct App {
    config: Config,
    wizard: Wizard,
    screen: WizardScreen,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let backend: Arc<dyn PodcastBackend> = Arc::new(HttpBackend::new(&config.api)?);
        tracing::info!(base_url = backend.base_url(), "backend configured");

        let mut wizard = Wizard::new(backend, WizardOptions::from(&config));
        let screen = WizardScreen::new(&mut wizard);

        Ok(Self {
            config,
            wizard,
            screen,
            should_quit: false,
        })
    }

    /// Run until the user quits. Returns what was entered, after pending
    /// cache edits have had their final write. The final write also happens
    /// when the terminal fails mid-session.
    pub async fn run(mut self) -> Result<SessionState> {
        install_panic_hook();
        let guard = TerminalGuard::enter()?;
        let mut terminal = guard.terminal()?;

        let outcome = self.event_loop(&mut terminal);

        if let Err(err) = terminal.show_cursor() {
            tracing::warn!(error = %err, "failed to show cursor");
        }
        drop(guard);

        close(self.wizard, outcome).await
    }

    fn event_loop(&mut self, terminal: &mut WizardTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            self.wizard.drain();
            self.wizard.tick(Instant::now());
            self.screen.sync_from_session();

            terminal.draw(|f| self.screen.render(f, &self.wizard))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let event = self.screen.handle_key(&mut self.wizard, key);
                        self.handle_event(event);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Continue => {}
            ScreenEvent::Quit => self.should_quit = true,
            ScreenEvent::OpenAudio(url) => {
                if let Err(err) = open::that(&url) {
                    tracing::warn!(%url, error = %err, "failed to open audio");
                    self.wizard
                        .push_notification(Notification::failure("Cannot play", err.to_string()));
                }
            }
        }
    }
}

/// Shut the wizard down, then report how the event loop ended
async fn close(wizard: Wizard, outcome: Result<()>) -> Result<SessionState> {
    let state = wizard.shutdown().await;
    match outcome {
        Ok(()) => {
            tracing::info!("wizard closed");
            Ok(state)
        }
        Err(err) => {
            tracing::error!(error = %err, "wizard stopped on a terminal error");
            Err(err)
        }
    }
}
