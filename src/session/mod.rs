//! Connection lifecycle for a single chat session.
//!
//! A [`Session`] holds no transport. The runner in [`crate::network`]
//! owns the socket and calls into the session through [`SessionHandler`];
//! the session answers by queueing protocol operations on an [`Outbound`].
//!
//! ```text
//! Disconnected --start--> Connecting --signed on--> Connected --joined--> Joined
//!       ^                      |                        |                   |
//!       +------------------ connection lost ------------+-------------------+
//! ```

mod events;
mod outbound;
mod state;

pub use events::LifecycleEvent;
pub use outbound::Outbound;
pub use state::SessionState;

use crate::config::SessionConfig;
use crate::dispatch::{Dispatcher, IncomingMessage, SentReply};
use crate::error::TalkbackError;
use crate::responses::{ResponseSet, ResponseSource};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Callbacks the transport adapter drives, in protocol order.
pub trait SessionHandler {
    /// The socket is open.
    fn on_connect(&mut self, out: &mut dyn Outbound) -> Result<(), TalkbackError>;

    /// Registration succeeded under `nickname`, as confirmed by the server.
    fn on_signed_on(&mut self, nickname: &str, out: &mut dyn Outbound)
        -> Result<(), TalkbackError>;

    /// The server confirmed that we joined `channel`.
    fn on_joined(&mut self, channel: &str) -> Result<(), TalkbackError>;

    /// Our own nickname changed after registration.
    fn on_nick_changed(&mut self, nickname: &str);

    /// A chat line arrived.
    fn on_message(
        &mut self,
        msg: IncomingMessage,
        out: &mut dyn Outbound,
    ) -> Result<Option<SentReply>, TalkbackError>;

    /// The supervisor wants the connection closed.
    fn on_shutdown(&mut self, reason: &str, out: &mut dyn Outbound) -> Result<(), TalkbackError>;

    /// The transport is gone, locally or remotely.
    fn on_disconnect(&mut self, reason: &str);
}

/// One connect → register → join → receive → disconnect lifecycle.
pub struct Session<R = ResponseSet> {
    config: SessionConfig,
    state: SessionState,
    nickname: String,
    dispatcher: Dispatcher<R>,
    events: Option<mpsc::UnboundedSender<LifecycleEvent>>,
}

impl<R: ResponseSource> Session<R> {
    pub fn new(config: SessionConfig, responses: R) -> Self {
        let nickname = config.nickname.clone();
        Self {
            config,
            state: SessionState::Disconnected,
            nickname,
            dispatcher: Dispatcher::new(responses),
            events: None,
        }
    }

    /// Forward every lifecycle event to a supervisor.
    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<LifecycleEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Our nickname as last confirmed by the server.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Begin a connection attempt.
    pub fn start(&mut self) -> Result<(), TalkbackError> {
        self.transition(SessionState::Connecting)?;
        info!(endpoint = %self.config.endpoint, "Connecting");
        Ok(())
    }

    /// The connection attempt failed before the socket opened.
    pub fn abort(&mut self) {
        if self.state != SessionState::Disconnected {
            debug!(state = %self.state, "Connection attempt aborted");
            self.state = SessionState::Disconnected;
        }
    }

    fn transition(&mut self, next: SessionState) -> Result<(), TalkbackError> {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "Rejected out-of-order lifecycle event");
            return Err(TalkbackError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = %self.state, to = %next, "Session state change");
        self.state = next;
        Ok(())
    }

    fn emit(&self, event: LifecycleEvent) {
        info!("{}", event);
        if let Some(events) = &self.events {
            // Supervisor may have gone away; the log line above still stands.
            let _ = events.send(event);
        }
    }
}

impl<R: ResponseSource> SessionHandler for Session<R> {
    fn on_connect(&mut self, out: &mut dyn Outbound) -> Result<(), TalkbackError> {
        if self.state != SessionState::Connecting {
            warn!(state = %self.state, "Transport opened outside of a connection attempt");
            return Err(TalkbackError::InvalidTransition {
                from: self.state,
                to: SessionState::Connecting,
            });
        }
        self.nickname = self.config.nickname.clone();
        out.register(&self.config.nickname, &self.config.realname)?;
        self.emit(LifecycleEvent::ConnectionMade);
        Ok(())
    }

    fn on_signed_on(
        &mut self,
        nickname: &str,
        out: &mut dyn Outbound,
    ) -> Result<(), TalkbackError> {
        self.transition(SessionState::Connected)?;
        self.nickname = nickname.to_owned();
        self.emit(LifecycleEvent::SignedOn {
            nickname: self.nickname.clone(),
        });

        if self.nickname != self.config.nickname {
            self.emit(LifecycleEvent::NicknameOccupied {
                requested: self.config.nickname.clone(),
                actual: self.nickname.clone(),
            });
        }

        out.join(&self.config.channel)
    }

    fn on_joined(&mut self, channel: &str) -> Result<(), TalkbackError> {
        if !channel.eq_ignore_ascii_case(&self.config.channel) {
            debug!(channel = %channel, "Joined a channel we did not ask for");
            return Ok(());
        }
        self.transition(SessionState::Joined)?;
        self.emit(LifecycleEvent::Joined {
            nickname: self.nickname.clone(),
            channel: self.config.channel.clone(),
        });
        Ok(())
    }

    fn on_nick_changed(&mut self, nickname: &str) {
        if !self.state.is_registered() {
            debug!(nickname = %nickname, "Ignoring nick change before sign-on");
            return;
        }
        info!(old = %self.nickname, new = %nickname, "Nickname changed");
        self.nickname = nickname.to_owned();
    }

    fn on_message(
        &mut self,
        msg: IncomingMessage,
        out: &mut dyn Outbound,
    ) -> Result<Option<SentReply>, TalkbackError> {
        if self.state != SessionState::Joined {
            debug!(state = %self.state, target = %msg.channel_or_target, "Message before join, not dispatched");
            return Ok(None);
        }

        let sent = self
            .dispatcher
            .dispatch(&msg, &self.config, &self.nickname, out)?;

        if let Some(reply) = &sent {
            self.emit(LifecycleEvent::MessageSent {
                receiver: reply.receiver.clone(),
                sender: reply.sender.clone(),
                response: reply.response.clone(),
            });
        }
        Ok(sent)
    }

    fn on_shutdown(&mut self, reason: &str, out: &mut dyn Outbound) -> Result<(), TalkbackError> {
        if self.state == SessionState::Disconnected {
            return Ok(());
        }
        info!(reason = %reason, "Disconnecting");
        out.disconnect(Some(reason))
    }

    fn on_disconnect(&mut self, reason: &str) {
        if self.state == SessionState::Disconnected {
            debug!(reason = %reason, "Already disconnected");
            return;
        }
        self.state = SessionState::Disconnected;
        self.emit(LifecycleEvent::ConnectionLost {
            reason: reason.to_owned(),
        });
    }
}
