//! Wizard controller: the non-visual half of the four step views.
//!
//! The controller owns the `Session`, tracks which step is shown, runs
//! backend requests on the tokio runtime and applies their results. Each
//! request carries a `CancellationToken` derived from the current step;
//! leaving the step cancels it, and any completion that arrives afterwards is
//! dropped instead of written into the session.

pub mod cache_sync;
pub mod notify;
pub mod step;


pub use cache_sync::{CacheSync, SyncStatus};
pub use notify::{Level, Notification, Notifications};
pub use step::{Action, StepId};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::{resolve_audio_url, ApiError, CacheAck, CacheUpdate, PodcastBackend};
use crate::config::Config;
use crate::script::format_dialogue;
use crate::session::{Field, Session, SessionState};

/// Upper bound on the final cache write when the wizard shuts down
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// Behavior switches taken from configuration
#[derive(Debug, Clone)]
pub struct WizardOptions {
    pub cache_enabled: bool,
    pub cache_debounce: Duration,
    pub format_dialogue: bool,
    pub speakers: Vec<String>,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for WizardOptions {
    fn from(config: &Config) -> Self {
        Self {
            cache_enabled: config.cache.enabled,
            cache_debounce: config.cache.debounce(),
            format_dialogue: config.script.format_dialogue,
            speakers: config.script.speakers.clone(),
        }
    }
}

/// Inputs captured from the session when an action starts
enum Request {
    FetchNews,
    Outline(String),
    Questions(String),
    Script { outline: String, questions: String },
    Audio(String),
}

impl Request {
    async fn run(&self, backend: &dyn PodcastBackend) -> Result<String, ApiError> {
        match self {
            Request::FetchNews => backend.fetch_daily_news().await,
            Request::Outline(content) => backend.generate_outline(content).await,
            Request::Questions(content) => backend.generate_questions(content).await,
            Request::Script { outline, questions } => {
                backend.generate_script(outline, questions).await
            }
            Request::Audio(script) => backend.generate_audio(script).await,
        }
    }
}

/// Result of a backend request, tagged with the request that produced it
#[derive(Debug)]
struct Completion {
    id: u64,
    action: Action,
    result: Result<String, ApiError>,
}

struct InFlight {
    id: u64,
    token: CancellationToken,
}

pub struct Wizard {
    backend: Arc<dyn PodcastBackend>,
    options: WizardOptions,
    session: Session,
    step: StepId,
    in_flight: HashMap<Action, InFlight>,
    /// Parent of every generation request started on the current step
    step_token: CancellationToken,
    /// Parent of everything, cancelled on shutdown
    session_token: CancellationToken,
    next_request_id: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    cache_sync: CacheSync,
    sync_tx: mpsc::UnboundedSender<Result<CacheAck, ApiError>>,
    sync_rx: mpsc::UnboundedReceiver<Result<CacheAck, ApiError>>,
    notifications: Notifications,
    /// Last fetch failure, shown on the acquisition step
    fetch_error: Option<String>,
    /// Playable address of the last generated audio; audio step view state
    audio_url: Option<String>,
    script_seeded: bool,
}

impl Wizard {
    pub fn new(backend: Arc<dyn PodcastBackend>, options: WizardOptions) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (sync_tx, sync_rx) = mpsc::unbounded_channel();
        let session_token = CancellationToken::new();

        Self {
            backend,
            cache_sync: CacheSync::new(options.cache_debounce),
            options,
            session: Session::new(),
            step: StepId::ContentAcquisition,
            in_flight: HashMap::new(),
            step_token: session_token.child_token(),
            session_token,
            next_request_id: 0,
            completions_tx,
            completions_rx,
            sync_tx,
            sync_rx,
            notifications: Notifications::default(),
            fetch_error: None,
            audio_url: None,
            script_seeded: false,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for subscriptions. Field writes should go through
    /// `edit` so cache sync sees them.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Raise a toast from outside the controller (e.g. the player failed)
    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn sync_status(&self) -> &SyncStatus {
        self.cache_sync.status()
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    pub fn is_loading(&self, action: Action) -> bool {
        self.in_flight.contains_key(&action)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    // ─── Step rules ─────────────────────────────────────────────────────────

    /// Whether `step`'s "next" control is enabled given the current session
    pub fn can_leave_forward(&self, step: StepId) -> bool {
        let s = &self.session;
        match step {
            StepId::ContentAcquisition => !s.content().trim().is_empty(),
            StepId::ContentOutline => {
                !s.outline().trim().is_empty() && !s.questions().trim().is_empty()
            }
            StepId::ScriptGeneration => !s.generated_script().trim().is_empty(),
            StepId::AudioGeneration => false,
        }
    }

    pub fn can_advance(&self) -> bool {
        self.can_leave_forward(self.step)
    }

    /// Whether `action`'s trigger is enabled. Returns the refusal message
    /// otherwise.
    pub fn check_action(&self, action: Action) -> Result<(), &'static str> {
        let s = &self.session;
        match action {
            Action::FetchNews => Ok(()),
            Action::GenerateOutline | Action::GenerateQuestions => {
                if s.content().is_empty() {
                    Err("Go back and enter or fetch the news content first")
                } else {
                    Ok(())
                }
            }
            Action::GenerateScript => {
                if s.outline().is_empty() || s.questions().is_empty() {
                    Err("Make sure the outline and questions have been generated")
                } else {
                    Ok(())
                }
            }
            Action::GenerateAudio => {
                if s.script().trim().is_empty() {
                    Err("Make sure there is script content")
                } else {
                    Ok(())
                }
            }
        }
    }

    // ─── Actions ────────────────────────────────────────────────────────────

    /// Trigger a backend action. Returns true if a request was started.
    pub fn start(&mut self, action: Action) -> bool {
        if action.step() != self.step {
            debug!(?action, step = ?self.step, "action not available on this step");
            return false;
        }
        if self.is_loading(action) {
            debug!(?action, "action already in flight");
            return false;
        }
        if let Err(message) = self.check_action(action) {
            self.notifications
                .push(Notification::rejected("Cannot generate", message));
            return false;
        }

        let request = match action {
            Action::FetchNews => Request::FetchNews,
            Action::GenerateOutline => Request::Outline(self.session.content().to_string()),
            Action::GenerateQuestions => Request::Questions(self.session.content().to_string()),
            Action::GenerateScript => Request::Script {
                outline: self.session.outline().to_string(),
                questions: self.session.questions().to_string(),
            },
            Action::GenerateAudio => Request::Audio(self.session.script().to_string()),
        };

        let id = self.next_request_id;
        self.next_request_id += 1;
        let token = self.step_token.child_token();

        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        let task_token = token.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = task_token.cancelled() => Err(ApiError::cancelled(action.operation())),
                result = request.run(backend.as_ref()) => result,
            };
            // Receiver only goes away with the wizard
            let _ = tx.send(Completion { id, action, result });
        });

        info!(?action, id, "request started");
        self.in_flight.insert(action, InFlight { id, token });
        if action == Action::FetchNews {
            self.fetch_error = None;
        }
        true
    }

    /// Apply every completion and sync result that has already arrived
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        while let Ok(result) = self.sync_rx.try_recv() {
            self.apply_sync(result);
        }
        applied
    }

    /// Wait for the next request to finish and apply it. Returns the action
    /// and whether its result was applied (false if it went stale).
    pub async fn next_completion(&mut self) -> Option<(Action, bool)> {
        let completion = self.completions_rx.recv().await?;
        let action = completion.action;
        Some((action, self.apply(completion)))
    }

    /// Wait for the in-flight cache write (if any) to report back
    pub async fn next_sync_result(&mut self) -> Option<SyncStatus> {
        let result = self.sync_rx.recv().await?;
        self.apply_sync(result);
        Some(self.cache_sync.status().clone())
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let current = self
            .in_flight
            .get(&completion.action)
            .is_some_and(|f| f.id == completion.id && !f.token.is_cancelled());
        if !current {
            debug!(
                action = ?completion.action,
                id = completion.id,
                "dropping stale response"
            );
            return false;
        }
        self.in_flight.remove(&completion.action);

        match completion.result {
            Ok(value) => self.apply_success(completion.action, value),
            Err(err) => self.apply_failure(completion.action, &err),
        }
        true
    }

    fn apply_success(&mut self, action: Action, value: String) {
        info!(?action, len = value.len(), "request succeeded");
        match action {
            Action::FetchNews => {
                self.session.set(Field::Content, value);
                self.notifications.push(Notification::success(
                    "Fetched",
                    "Today's news has been fetched",
                ));
            }
            Action::GenerateOutline => {
                self.session.set(Field::Outline, value.clone());
                self.queue_cache_write(CacheUpdate::outline(value), true);
                self.notifications
                    .push(Notification::success("Generated", "Outline generated"));
            }
            Action::GenerateQuestions => {
                self.session.set(Field::Questions, value.clone());
                self.queue_cache_write(CacheUpdate::questions(value), true);
                self.notifications
                    .push(Notification::success("Generated", "Questions generated"));
            }
            Action::GenerateScript => {
                let script = if self.options.format_dialogue {
                    format_dialogue(&value, &self.options.speakers)
                } else {
                    value
                };
                self.session.set(Field::GeneratedScript, script);
                self.notifications.push(Notification::success(
                    "Generated",
                    "Podcast script generated",
                ));
            }
            Action::GenerateAudio => {
                let url = resolve_audio_url(self.backend.base_url(), &value);
                info!(%url, "audio ready");
                self.audio_url = Some(url);
                self.notifications
                    .push(Notification::success("Generated", "Audio file generated"));
            }
        }
    }

    fn apply_failure(&mut self, action: Action, err: &ApiError) {
        error!(?action, error = %err, "request failed");
        let message = match action {
            Action::FetchNews => {
                let message = err.user_message();
                self.fetch_error = Some(message.clone());
                message
            }
            Action::GenerateOutline => {
                "Failed to generate the outline, please try again later".to_string()
            }
            Action::GenerateQuestions => {
                "Failed to generate questions, please try again later".to_string()
            }
            Action::GenerateScript => {
                "Failed to generate the podcast script, please try again later".to_string()
            }
            Action::GenerateAudio => {
                // Never leave a player bound to a failed attempt
                self.audio_url = None;
                err.user_message()
            }
        };
        let title = if action == Action::FetchNews {
            "Fetch failed"
        } else {
            "Generation failed"
        };
        self.notifications.push(Notification::failure(title, message));
    }

    // ─── Editing ────────────────────────────────────────────────────────────

    /// Write a user edit into the session. Outline and question edits are
    /// queued for the backend cache.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if !self.session.set(field, value.clone()) {
            return;
        }
        match field {
            Field::Outline => self.queue_cache_write(CacheUpdate::outline(value), false),
            Field::Questions => self.queue_cache_write(CacheUpdate::questions(value), false),
            _ => {}
        }
    }

    fn queue_cache_write(&mut self, update: CacheUpdate, immediate: bool) {
        if !self.options.cache_enabled {
            return;
        }
        self.cache_sync.record(update, Instant::now());
        if immediate {
            self.cache_sync.request_flush();
        }
        self.pump_cache_sync(Instant::now());
    }

    /// Send pending cache edits now (explicit sync)
    pub fn flush_cache(&mut self) {
        self.cache_sync.request_flush();
        self.pump_cache_sync(Instant::now());
    }

    fn pump_cache_sync(&mut self, now: Instant) {
        let Some(update) = self.cache_sync.take_ready(now) else {
            return;
        };

        let backend = Arc::clone(&self.backend);
        let tx = self.sync_tx.clone();
        // Cache writes outlive step navigation; only shutdown cancels them
        let token = self.session_token.child_token();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => Err(ApiError::cancelled(crate::api::OP_UPDATE_CACHE)),
                result = backend.persist_cache_fields(&update) => result,
            };
            let _ = tx.send(result);
        });
    }

    fn apply_sync(&mut self, result: Result<CacheAck, ApiError>) {
        match result {
            Ok(ack) => {
                debug!(message = ?ack.message, "cache updated");
                self.cache_sync.finish(Ok(()));
            }
            Err(err) if err.is_cancelled() => self.cache_sync.finish(Ok(())),
            Err(err) => {
                warn!(error = %err, "cache update failed");
                self.cache_sync.finish(Err(err.user_message()));
            }
        }
    }

    /// Periodic housekeeping: expire toasts and send due cache writes
    pub fn tick(&mut self, now: Instant) {
        self.notifications.prune(now);
        self.pump_cache_sync(now);
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Move to `target`. Forward moves require every step in between to be
    /// complete. Leaving a step cancels its outstanding requests.
    pub fn go_to(&mut self, target: StepId) -> bool {
        if target == self.step {
            return true;
        }
        if target > self.step {
            let blocked = StepId::all()
                .iter()
                .filter(|s| **s >= self.step && **s < target)
                .find(|s| !self.can_leave_forward(**s));
            if let Some(step) = blocked {
                self.notifications.push(Notification::warning(
                    "Cannot continue",
                    format!("Finish step {} ({}) first", step.number(), step.title()),
                ));
                return false;
            }
        }

        self.leave_step();
        info!(from = ?self.step, to = ?target, "navigate");
        self.step = target;
        self.enter_step();
        true
    }

    pub fn next(&mut self) -> bool {
        match self.step.next() {
            Some(next) => self.go_to(next),
            None => false,
        }
    }

    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => self.go_to(prev),
            None => false,
        }
    }

    fn leave_step(&mut self) {
        if !self.in_flight.is_empty() {
            info!(
                step = ?self.step,
                count = self.in_flight.len(),
                "cancelling outstanding requests"
            );
        }
        self.step_token.cancel();
        self.step_token = self.session_token.child_token();
        self.in_flight.clear();
        self.fetch_error = None;
        if self.step == StepId::AudioGeneration {
            self.audio_url = None;
        }
    }

    fn enter_step(&mut self) {
        match self.step {
            StepId::ContentAcquisition => {}
            StepId::ContentOutline => {
                if self.session.content().is_empty() {
                    self.notifications.push(Notification::warning(
                        "No content found",
                        "Go back and enter or fetch the news content first",
                    ));
                }
            }
            StepId::ScriptGeneration => {
                if self.session.outline().is_empty() || self.session.questions().is_empty() {
                    self.notifications.push(Notification::warning(
                        "Missing outline or questions",
                        "Generate the outline and questions on the previous step first",
                    ));
                }
            }
            StepId::AudioGeneration => self.seed_script(),
        }
    }

    /// Carry the script draft into the audio step, once
    fn seed_script(&mut self) {
        if self.script_seeded {
            return;
        }
        if !self.session.generated_script().is_empty() && self.session.script().is_empty() {
            let draft = self.session.generated_script().to_string();
            self.session.set(Field::Script, draft);
            self.script_seeded = true;
            debug!("script seeded from generated draft");
        }
    }

    // ─── Teardown ───────────────────────────────────────────────────────────

    /// End the wizard: cancel generation requests, give pending cache edits
    /// one last bounded attempt, and close the session.
    pub async fn shutdown(mut self) -> SessionState {
        self.step_token.cancel();
        self.in_flight.clear();

        let backend = Arc::clone(&self.backend);
        let flushed = tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, async {
            while self.cache_sync.is_in_flight() {
                match self.sync_rx.recv().await {
                    Some(result) => self.apply_sync(result),
                    None => break,
                }
            }
            if let Some(update) = self.cache_sync.take_all() {
                if let Err(err) = backend.persist_cache_fields(&update).await {
                    warn!(error = %err, "final cache update failed");
                }
            }
        })
        .await;
        if flushed.is_err() {
            warn!("timed out flushing cache on shutdown");
        }

        self.session_token.cancel();
        self.session.end()
    }
}
