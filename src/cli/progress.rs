//! Loading spinner for CLI operations
//!
//! Wraps a running operation in an indicatif spinner that follows the
//! store's loading flag: it spins while any operation is in flight and is
//! cleared once the wrapped future completes.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::session::{OperationState, SessionStore};

/// Spinner display settings
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Show the spinner at all (disabled in quiet mode)
    pub enabled: bool,
    /// How often the spinner re-reads the loading flag
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: Duration::from_millis(80),
        }
    }
}

/// Spinner bound to one command's operations
pub struct OperationSpinner {
    bar: ProgressBar,
    message: String,
}

impl OperationSpinner {
    pub fn new(config: &ProgressConfig, message: impl Into<String>) -> Self {
        let bar = if config.enabled {
            let bar = ProgressBar::new_spinner();
            match ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                Ok(style) => bar.set_style(style),
                Err(e) => debug!("Spinner template error: {}", e),
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            message: message.into(),
        }
    }

    /// Reflect the current operation state
    pub fn refresh(&self, state: &OperationState) {
        if state.loading {
            self.bar.set_message(self.message.clone());
            self.bar.tick();
        } else {
            self.bar.set_message(String::new());
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Drive `future` to completion while following `store`'s loading flag
    pub async fn track<F>(&self, store: &SessionStore, interval: Duration, future: F) -> F::Output
    where
        F: Future,
    {
        tokio::pin!(future);
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                output = &mut future => {
                    self.finish();
                    return output;
                }
                _ = ticker.tick() => self.refresh(&store.operation_state()),
            }
        }
    }
}

/// Run `future` under a spinner labelled `message`
pub async fn with_spinner<F>(
    config: &ProgressConfig,
    store: &SessionStore,
    message: impl Into<String>,
    future: F,
) -> F::Output
where
    F: Future,
{
    let spinner = OperationSpinner::new(config, message);
    spinner.track(store, config.tick_interval, future).await
}
