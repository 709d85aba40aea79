//! Drives a [`WeatherWidget`]: runs its effects on tokio and feeds the
//! outcomes back in as actions.

use std::sync::Arc;

use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle},
};
use tracing::{debug, warn};

use crate::{
    model::RequestId,
    provider::WeatherProvider,
    widget::{Action, Effect, WeatherWidget},
};

pub struct WidgetRuntime {
    widget: WeatherWidget,
    provider: Arc<dyn WeatherProvider>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
    in_flight: Option<(RequestId, JoinHandle<()>)>,
}

enum Wake {
    Completed(Option<Action>),
    TaskEnded(Result<(), JoinError>),
}

impl WidgetRuntime {
    pub fn new(widget: WeatherWidget, provider: Arc<dyn WeatherProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { widget, provider, tx, rx, in_flight: None }
    }

    pub fn widget(&self) -> &WeatherWidget {
        &self.widget
    }

    /// Apply a user action. Returns the id of the lookup it started, if any.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: Action) -> Option<RequestId> {
        let effect = self.widget.update(action)?;
        Some(self.run(effect))
    }

    fn run(&mut self, effect: Effect) -> RequestId {
        match effect {
            Effect::FetchCurrent { id, city } => {
                if let Some((_, previous)) = self.in_flight.take() {
                    previous.abort();
                }

                let provider = Arc::clone(&self.provider);
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    let action = match provider.current_temperature(&city).await {
                        Ok(temperature) => Action::FetchDidLoad { id, temperature },
                        Err(err) => {
                            warn!(%id, city = %city, error = %err, "lookup failed");
                            Action::FetchDidError { id, reason: err.to_string() }
                        }
                    };
                    // The receiver lives as long as the runtime.
                    let _ = tx.send(action);
                });

                self.in_flight = Some((id, handle));
                id
            }
        }
    }

    /// Wait for one lookup to finish and apply its outcome.
    ///
    /// Returns the completion that was applied (it may have been discarded as
    /// stale), or `None` straight away when no lookup is pending.
    pub async fn next_completion(&mut self) -> Option<Action> {
        if !self.widget.is_fetching() {
            return None;
        }

        let wake = match self.in_flight.as_mut() {
            Some((_, handle)) => tokio::select! {
                biased;
                action = self.rx.recv() => Wake::Completed(action),
                joined = handle => Wake::TaskEnded(joined),
            },
            None => Wake::Completed(self.rx.recv().await),
        };

        let action = match wake {
            Wake::Completed(action) => action?,
            Wake::TaskEnded(joined) => {
                let (id, _) = self.in_flight.take()?;
                match joined {
                    // A task that returned normally has already sent its result.
                    Ok(()) => self.rx.recv().await?,
                    Err(err) => {
                        let reason =
                            if err.is_panic() { "lookup task panicked" } else { "lookup task was cancelled" };
                        warn!(%id, reason, "lookup ended without a result");
                        Action::FetchDidError { id, reason: reason.to_string() }
                    }
                }
            }
        };

        debug!(?action, "lookup completed");
        self.widget.update(action.clone());
        Some(action)
    }

    /// Apply completions until no lookup is pending.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }
}

impl Drop for WidgetRuntime {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
