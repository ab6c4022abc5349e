// SPDX-License-Identifier: MPL-2.0
//! Adapter turning an async operation into loading/error UI state.
//!
//! An [`ActionWrapper`] publishes `loading` before the operation starts and
//! the outcome after it ends, optionally awaiting a refresh (usually a full
//! dossier re-fetch) between a successful operation and clearing `loading`.
//! Overlapping runs are not queued; whichever publishes last wins.

use crate::error::Result;
use crate::transport::Response;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Loading/error state of the most recent action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub loading: bool,
    pub error: Option<String>,
    /// Human-readable name of the action, shown with its error.
    pub description: Option<String>,
}

/// Anything an action can end with that may carry an error.
pub trait ActionOutcome {
    fn error_message(&self) -> Option<String>;
}

impl ActionOutcome for Response {
    fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

impl<T> ActionOutcome for Result<T> {
    fn error_message(&self) -> Option<String> {
        self.as_ref().err().map(ToString::to_string)
    }
}

/// Receiver of action state updates.
pub trait ActionSink {
    fn publish(&self, state: ActionState);
}

impl<F> ActionSink for F
where
    F: Fn(ActionState),
{
    fn publish(&self, state: ActionState) {
        self(state);
    }
}

type Refresh = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Clone)]
pub struct ActionWrapper {
    description: String,
    refresh: Option<Refresh>,
}

impl std::fmt::Debug for ActionWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionWrapper")
            .field("description", &self.description)
            .field("refresh", &self.refresh.is_some())
            .finish()
    }
}

impl ActionWrapper {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            refresh: None,
        }
    }

    /// Awaits `refresh` after every successful run, before `loading` clears.
    #[must_use]
    pub fn with_refresh<F, Fut>(mut self, refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let refresh: Refresh = Arc::new(move || -> BoxFuture<'static, ()> { Box::pin(refresh()) });
        self.refresh = Some(refresh);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn state(&self, loading: bool, error: Option<String>) -> ActionState {
        ActionState {
            loading,
            error,
            description: Some(self.description.clone()),
        }
    }

    /// Runs `action`, publishing its state to `sink`, and returns its outcome.
    pub async fn run<S, T, F>(&self, sink: &S, action: F) -> T
    where
        S: ActionSink + ?Sized,
        T: ActionOutcome,
        F: Future<Output = T>,
    {
        sink.publish(self.state(true, None));

        let outcome = action.await;

        if let Some(error) = outcome.error_message() {
            log::warn!("{} failed: {error}", self.description);
            sink.publish(self.state(false, Some(error)));
            return outcome;
        }

        if let Some(refresh) = &self.refresh {
            refresh().await;
        }

        sink.publish(self.state(false, None));
        outcome
    }
}
