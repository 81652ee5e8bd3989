//! Service start/stop around a single session.

use crate::config::{Config, SessionConfig};
use crate::error::TalkbackError;
use crate::network;
use crate::responses::ResponseSet;
use crate::session::{LifecycleEvent, Session};
use tokio::sync::{mpsc, watch};
use tracing::error;

/// Builds a session from configuration and runs it once.
///
/// There is no reconnect: a failed or lost connection ends [`run`](Self::run)
/// with the error, and the caller decides whether to exit or start again.
pub struct TalkbackService {
    config: SessionConfig,
    responses: Vec<String>,
    events: Option<mpsc::UnboundedSender<LifecycleEvent>>,
}

impl TalkbackService {
    pub fn new(config: SessionConfig, responses: Vec<String>) -> Self {
        Self {
            config,
            responses,
            events: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(SessionConfig::from(config), config.talkback.responses.clone())
    }

    /// Forward the session's lifecycle events.
    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<LifecycleEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Connect and run until the connection ends or `shutdown` flips to true.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), TalkbackError> {
        let responses = ResponseSet::new(self.responses)?;
        let mut session = Session::new(self.config, responses);
        if let Some(events) = self.events {
            session = session.with_events(events);
        }

        session.start()?;

        let connection = match network::connect(session.config()).await {
            Ok(connection) => connection,
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Could not connect to specified server.");
                session.abort();
                return Err(e);
            }
        };

        connection.run(&mut session, shutdown).await?;
        Ok(())
    }
}
