//! In-memory wizard progress shared by every step.
//!
//! A `Session` has exactly one owner (the wizard controller). Views that need
//! to react to changes subscribe to the fields they display and receive a
//! `FieldChange` whenever a stored value actually changes.

use tokio::sync::mpsc;

/// One text field of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Content,
    Outline,
    Questions,
    Script,
    GeneratedScript,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::Content,
            Field::Outline,
            Field::Questions,
            Field::Script,
            Field::GeneratedScript,
        ]
    }
}

/// Snapshot of all session fields. Everything starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub content: String,
    pub outline: String,
    pub questions: String,
    pub script: String,
    pub generated_script: String,
}

impl SessionState {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Content => &self.content,
            Field::Outline => &self.outline,
            Field::Questions => &self.questions,
            Field::Script => &self.script,
            Field::GeneratedScript => &self.generated_script,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Content => &mut self.content,
            Field::Outline => &mut self.outline,
            Field::Questions => &mut self.questions,
            Field::Script => &mut self.script,
            Field::GeneratedScript => &mut self.generated_script,
        }
    }
}

/// Notification sent to subscribers after a field changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Field,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle returned by `Session::subscribe`
pub struct Subscription {
    pub id: SubscriptionId,
    pub changes: mpsc::UnboundedReceiver<FieldChange>,
}

struct Subscriber {
    id: SubscriptionId,
    fields: Vec<Field>,
    tx: mpsc::UnboundedSender<FieldChange>,
}

/// The live wizard session
pub struct Session {
    state: SessionState,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a new session with every field empty
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        self.state.get(field)
    }

    pub fn content(&self) -> &str {
        &self.state.content
    }

    pub fn outline(&self) -> &str {
        &self.state.outline
    }

    pub fn questions(&self) -> &str {
        &self.state.questions
    }

    pub fn script(&self) -> &str {
        &self.state.script
    }

    pub fn generated_script(&self) -> &str {
        &self.state.generated_script
    }

    /// Replace a field's value. No validation happens here; callers decide
    /// what is acceptable. Returns true if the value changed.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.state.slot_mut(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.notify(field);
        true
    }

    /// Register interest in a set of fields
    pub fn subscribe(&mut self, fields: &[Field]) -> Subscription {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(Subscriber {
            id,
            fields: fields.to_vec(),
            tx,
        });

        Subscription { id, changes: rx }
    }

    /// Stop delivering changes to a subscription. Returns false if unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Tear the session down. All subscriptions are closed and the final
    /// field values are handed back.
    pub fn end(self) -> SessionState {
        tracing::debug!(subscribers = self.subscribers.len(), "session ended");
        self.state
    }

    fn notify(&mut self, field: Field) {
        let value = self.state.get(field).to_string();
        // Receivers that were dropped without unsubscribing are pruned here
        self.subscribers.retain(|subscriber| {
            if !subscriber.fields.contains(&field) {
                return !subscriber.tx.is_closed();
            }
            subscriber
                .tx
                .send(FieldChange {
                    field,
                    value: value.clone(),
                })
                .is_ok()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        for field in Field::all() {
            assert_eq!(session.get(*field), "");
        }
    }

    #[test]
    fn test_write_then_read_returns_value() {
        let mut session = Session::new();
        session.set(Field::Outline, "O1");
        assert_eq!(session.outline(), "O1");

        session.set(Field::Outline, "O1 edited");
        assert_eq!(session.get(Field::Outline), "O1 edited");
        // Other fields untouched
        assert_eq!(session.questions(), "");
    }

    #[test]
    fn test_set_reports_change() {
        let mut session = Session::new();
        assert!(session.set(Field::Content, "news"));
        assert!(!session.set(Field::Content, "news"));
        assert!(session.set(Field::Content, ""));
    }

    #[test]
    fn test_subscriber_receives_only_its_fields() {
        let mut session = Session::new();
        let mut sub = session.subscribe(&[Field::Outline]);

        session.set(Field::Content, "ignored");
        session.set(Field::Outline, "O1");

        let change = sub.changes.try_recv().unwrap();
        assert_eq!(
            change,
            FieldChange {
                field: Field::Outline,
                value: "O1".to_string()
            }
        );
        assert!(sub.changes.try_recv().is_err());
    }

    #[test]
    fn test_unchanged_write_does_not_notify() {
        let mut session = Session::new();
        let mut sub = session.subscribe(Field::all());

        session.set(Field::Script, "hello");
        session.set(Field::Script, "hello");

        assert!(sub.changes.try_recv().is_ok());
        assert!(sub.changes.try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut session = Session::new();
        let mut sub = session.subscribe(&[Field::Content]);

        assert!(session.unsubscribe(sub.id));
        assert!(!session.unsubscribe(sub.id));
        session.set(Field::Content, "after");

        // Sender was dropped with the subscriber
        assert!(matches!(
            sub.changes.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let mut session = Session::new();
        let sub = session.subscribe(&[Field::Content]);
        let _other = session.subscribe(&[Field::Outline]);
        drop(sub);

        session.set(Field::Content, "x");
        assert_eq!(session.subscriber_count(), 1);
    }

    #[test]
    fn test_end_closes_subscriptions() {
        let mut session = Session::new();
        let mut sub = session.subscribe(Field::all());
        session.set(Field::Questions, "Q1");

        let final_state = session.end();
        assert_eq!(final_state.questions, "Q1");

        assert!(sub.changes.try_recv().is_ok());
        assert!(matches!(
            sub.changes.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
