//! EventManager - identifier-scoped dispatch of worker events
//!
//! A worker publishes under an ordered set of identifiers. Subscribers register
//! under a scope; an event reaches every subscriber whose scope is `*` or one
//! of the publisher's identifiers.

use std::sync::Arc;

use crate::domain::WorkerEvent;
use crate::error::WorkerError;
use crate::ports::EventListener;

/// Identifier every worker publishes under.
pub const BASE_IDENTIFIER: &str = "drain_core::Worker";

/// Scope that matches every publisher.
pub const WILDCARD_SCOPE: &str = "*";

/// Ordered, de-duplicated set of identifier strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIdentifiers(Vec<String>);

impl EventIdentifiers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an identifier. Returns `false` if it was already present.
    ///
    /// Identifiers must be non-empty and contain no whitespace.
    pub fn insert(&mut self, identifier: impl Into<String>) -> Result<bool, WorkerError> {
        let identifier = identifier.into();
        if identifier.is_empty() || identifier.chars().any(char::is_whitespace) {
            return Err(WorkerError::InvalidIdentifier(identifier));
        }
        if self.contains(&identifier) {
            return Ok(false);
        }
        self.0.push(identifier);
        Ok(true)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.iter().any(|id| id == identifier)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

struct Subscription {
    scope: String,
    listener: Arc<dyn EventListener>,
}

/// Dispatches events to subscribers. Zero subscribers by default.
#[derive(Default)]
pub struct EventManager {
    identifiers: EventIdentifiers,
    subscriptions: Vec<Subscription>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, scope: impl Into<String>, listener: Arc<dyn EventListener>) {
        self.subscriptions.push(Subscription {
            scope: scope.into(),
            listener,
        });
    }

    pub fn with_listener(
        mut self,
        scope: impl Into<String>,
        listener: Arc<dyn EventListener>,
    ) -> Self {
        self.subscribe(scope, listener);
        self
    }

    pub fn set_identifiers(&mut self, identifiers: EventIdentifiers) {
        self.identifiers = identifiers;
    }

    pub fn identifiers(&self) -> &EventIdentifiers {
        &self.identifiers
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver `event` in subscription order. Returns how many listeners saw it.
    pub fn trigger(&self, event: &WorkerEvent) -> usize {
        let mut delivered = 0;
        for sub in &self.subscriptions {
            if sub.scope == WILDCARD_SCOPE || self.identifiers.contains(&sub.scope) {
                sub.listener.on_event(event);
                delivered += 1;
            }
        }
        delivered
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("identifiers", &self.identifiers)
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn signal_event() -> WorkerEvent {
        WorkerEvent::SignalReceived {
            signal: Signal::Terminate,
        }
    }

    #[test]
    fn identifiers_are_deduplicated_in_order() {
        let mut ids = EventIdentifiers::new();
        assert!(ids.insert("a").unwrap());
        assert!(ids.insert("b").unwrap());
        assert!(!ids.insert("a").unwrap());

        assert_eq!(ids.as_slice(), &["a".to_string(), "b".to_string()]);
    }

    #[rstest]
    #[case::empty("")]
    #[case::space("my worker")]
    #[case::tab("a\tb")]
    fn invalid_identifiers_are_rejected(#[case] id: &str) {
        let mut ids = EventIdentifiers::new();
        let err = ids.insert(id).unwrap_err();
        assert!(matches!(err, WorkerError::InvalidIdentifier(_)));
        assert!(ids.as_slice().is_empty());
    }

    #[rstest]
    #[case::matching_scope("app.mailer", 1)]
    #[case::wildcard(WILDCARD_SCOPE, 1)]
    #[case::other_scope("app.billing", 0)]
    fn trigger_respects_scope(#[case] scope: &str, #[case] expected: usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let mut ids = EventIdentifiers::new();
        ids.insert(BASE_IDENTIFIER).unwrap();
        ids.insert("app.mailer").unwrap();

        let mut manager = EventManager::new().with_listener(
            scope,
            Arc::new(move |_: &WorkerEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        manager.set_identifiers(ids);

        assert_eq!(manager.trigger(&signal_event()), expected);
        assert_eq!(hits.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn default_manager_has_no_subscribers() {
        let manager = EventManager::default();
        assert_eq!(manager.listener_count(), 0);
        assert_eq!(manager.trigger(&signal_event()), 0);
    }
}
