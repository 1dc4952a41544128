//! Review session controller.
//!
//! Owns the `Idle -> Loading -> {Success, Failed}` state machine and is the
//! only caller of the [`Dispatcher`]. Every transition into `Loading` takes
//! a new generation number; a response is applied only if its generation
//! is still current, so a reset (or any newer transition) makes an
//! in-flight response stale and it is dropped.
//!
//! While a review is `Loading`, further submissions are rejected with
//! [`ReviewError::ReviewInProgress`] and leave the state untouched.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ProviderConfig;
use crate::models::{ProviderId, ReviewInput};
use crate::providers::{Dispatcher, ReviewError};

/// Shown when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// What the session is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    /// The review text.
    Success(String),
    /// A display-ready error message.
    Failed(String),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// Notified after every state transition, in the order transitions happen.
///
/// Observers must not call back into the session.
pub trait SessionObserver: Send + Sync {
    fn on_transition(&self, state: &SessionState);
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    generation: u64,
}

pub struct ReviewSession {
    dispatcher: Arc<Dispatcher>,
    inner: Mutex<Inner>,
    publish: Mutex<()>,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl ReviewSession {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            inner: Mutex::new(Inner::default()),
            publish: Mutex::new(()),
            observers: Vec::new(),
        }
    }

    /// Register an observer for state transitions.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Submit a review and wait for its outcome.
    ///
    /// Empty input and configuration gaps fail immediately: the session
    /// goes straight to `Failed` without entering `Loading` and no request
    /// is made. Otherwise the session is `Loading` until the dispatcher
    /// returns. The caller always receives its own outcome, even when the
    /// session discarded it as stale. Dropping the returned future while it
    /// is `Loading` puts the session back to `Idle`.
    pub async fn submit_review(
        &self,
        input: ReviewInput,
        provider: ProviderId,
        config: &ProviderConfig,
    ) -> Result<String, ReviewError> {
        let generation = {
            let _publish = self.publish_lock();
            let mut inner = self.lock();
            if inner.state.is_loading() {
                tracing::debug!("rejecting review: another review is loading");
                return Err(ReviewError::ReviewInProgress);
            }

            let preflight = input
                .validate()
                .map_err(|message| ReviewError::Validation(message.to_string()))
                .and_then(|()| self.dispatcher.check(provider, config));
            if let Err(err) = preflight {
                let state = SessionState::Failed(display_message(&err));
                inner.generation += 1;
                inner.state = state.clone();
                drop(inner);
                tracing::debug!(error = %err, "review rejected before dispatch");
                self.notify(&state);
                return Err(err);
            }

            inner.generation += 1;
            inner.state = SessionState::Loading;
            let generation = inner.generation;
            drop(inner);
            tracing::debug!(generation, %provider, "session loading");
            self.notify(&SessionState::Loading);
            generation
        };

        let mut in_flight = InFlight {
            session: self,
            generation,
            finished: false,
        };
        let result = self.dispatcher.dispatch(&input, provider, config).await;
        in_flight.finished = true;

        let _publish = self.publish_lock();
        let applied = {
            let mut inner = self.lock();
            if inner.generation == generation {
                inner.state = match &result {
                    Ok(review) => SessionState::Success(review.clone()),
                    Err(err) => SessionState::Failed(display_message(err)),
                };
                Some(inner.state.clone())
            } else {
                None
            }
        };
        match applied {
            Some(state) => {
                tracing::debug!(generation, ok = result.is_ok(), "review finished");
                self.notify(&state);
            }
            None => tracing::debug!(generation, "discarding stale review response"),
        }
        result
    }

    /// Return to `Idle`, discarding any in-flight response.
    ///
    /// The underlying request is not cancelled; its result is ignored when
    /// it arrives.
    pub fn reset(&self) {
        let _publish = self.publish_lock();
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = SessionState::Idle;
        }
        tracing::debug!("session reset");
        self.notify(&SessionState::Idle);
    }

    /// The review of `generation` was dropped before it finished.
    fn abandon(&self, generation: u64) {
        let _publish = self.publish_lock();
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                return;
            }
            inner.generation += 1;
            inner.state = SessionState::Idle;
        }
        tracing::debug!(generation, "review abandoned before completion");
        self.notify(&SessionState::Idle);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Held across a transition and its notification so observers see
    /// transitions in the order they were applied.
    fn publish_lock(&self) -> MutexGuard<'_, ()> {
        self.publish.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, state: &SessionState) {
        for observer in &self.observers {
            observer.on_transition(state);
        }
    }
}

/// Returns the session to `Idle` if a `Loading` review is dropped.
struct InFlight<'a> {
    session: &'a ReviewSession,
    generation: u64,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.session.abandon(self.generation);
        }
    }
}

/// The message the user sees for `err`.
pub fn display_message(err: &ReviewError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
