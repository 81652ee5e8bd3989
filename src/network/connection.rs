//! Connection establishment and the per-connection event loop.

use super::tls;
use crate::config::SessionConfig;
use crate::dispatch::IncomingMessage;
use crate::endpoint::Endpoint;
use crate::error::{ConnectionFailure, TalkbackError};
use crate::session::SessionHandler;
use talkback_proto::transport::{Transport, TransportReadError};
use talkback_proto::{Command, Message, Response};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

/// QUIT text sent when the supervisor stops the service.
const SHUTDOWN_REASON: &str = "Shutting down";

/// An open transport to the configured server, not yet registered.
pub struct Connection {
    transport: Transport,
    nickname: String,
}

/// Open the transport described by `config.endpoint`.
///
/// Exactly one outcome: a live [`Connection`] or the error that prevented it.
pub async fn connect(config: &SessionConfig) -> Result<Connection, TalkbackError> {
    let endpoint: Endpoint = config.endpoint.parse()?;

    let stream = TcpStream::connect(endpoint.address())
        .await
        .map_err(|source| ConnectionFailure::Connect {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let transport = if endpoint.tls {
        tls::handshake(&endpoint.host, stream).await?
    } else {
        Transport::tcp(stream)
    };

    info!(endpoint = %endpoint, tls = transport.is_tls(), "Transport established");

    Ok(Connection {
        transport,
        nickname: config.nickname.clone(),
    })
}

/// Registration progress as seen by the adapter.
struct Registration {
    /// Nickname we are currently using or attempting.
    nickname: String,
    registered: bool,
}

impl Registration {
    fn is_self(&self, msg: &Message) -> bool {
        msg.source_nickname()
            .is_some_and(|nick| nick.eq_ignore_ascii_case(&self.nickname))
    }
}

/// What the loop should do after routing one inbound message.
enum Flow {
    Continue,
    Closed(String),
}

enum Event {
    /// `true` when the watch sender is still alive.
    ShutdownSignal(bool),
    Inbound(Result<Option<Message>, TransportReadError>),
}

impl Connection {
    /// Drive `handler` over this connection until it ends.
    ///
    /// Inbound messages are handled one at a time; any replies they produce
    /// are written before the next message is read. Returns `Ok(())` when
    /// `shutdown` asked for the stop, and the failure otherwise.
    pub async fn run<H: SessionHandler>(
        mut self,
        handler: &mut H,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), ConnectionFailure> {
        let mut registration = Registration {
            nickname: self.nickname.clone(),
            registered: false,
        };
        let mut out: Vec<Message> = Vec::new();

        // No registration was queued; the server would never answer.
        if let Err(e) = handler.on_connect(&mut out) {
            warn!(error = %e, code = e.error_code(), "Connect handling failed");
            let reason = e.to_string();
            handler.on_disconnect(&reason);
            return Err(ConnectionFailure::Closed(reason));
        }
        self.flush(handler, &mut out).await?;

        loop {
            let event = tokio::select! {
                biased;
                changed = shutdown.changed() => Event::ShutdownSignal(changed.is_ok()),
                read = self.transport.read_message() => Event::Inbound(read),
            };

            let msg = match event {
                Event::ShutdownSignal(true) if !*shutdown.borrow() => continue,
                Event::ShutdownSignal(_) => return self.shutdown(handler, &mut out).await,
                Event::Inbound(Ok(Some(msg))) => msg,
                Event::Inbound(Ok(None)) => {
                    let reason = "Connection closed by server".to_string();
                    handler.on_disconnect(&reason);
                    return Err(ConnectionFailure::Closed(reason));
                }
                Event::Inbound(Err(e)) => {
                    handler.on_disconnect(&e.to_string());
                    return Err(e.into());
                }
            };

            match route(msg, handler, &mut registration, &mut out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Closed(reason)) => {
                    self.flush(handler, &mut out).await?;
                    handler.on_disconnect(&reason);
                    return Err(ConnectionFailure::Closed(reason));
                }
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "Event handling failed");
                }
            }

            self.flush(handler, &mut out).await?;
        }
    }

    async fn shutdown<H: SessionHandler>(
        &mut self,
        handler: &mut H,
        out: &mut Vec<Message>,
    ) -> Result<(), ConnectionFailure> {
        if let Err(e) = handler.on_shutdown(SHUTDOWN_REASON, out) {
            warn!(error = %e, code = e.error_code(), "Shutdown handling failed");
        }
        self.flush(handler, out).await?;
        handler.on_disconnect(SHUTDOWN_REASON);
        Ok(())
    }

    /// Write every queued message in order.
    async fn flush<H: SessionHandler>(
        &mut self,
        handler: &mut H,
        out: &mut Vec<Message>,
    ) -> Result<(), ConnectionFailure> {
        for msg in out.drain(..) {
            trace!(line = %msg.to_string().trim_end(), "Sending");
            if let Err(e) = self.transport.write_message(&msg).await {
                handler.on_disconnect(&e.to_string());
                return Err(ConnectionFailure::Write(e));
            }
        }
        Ok(())
    }
}

/// Translate one protocol message into session callbacks.
fn route<H: SessionHandler>(
    msg: Message,
    handler: &mut H,
    registration: &mut Registration,
    out: &mut Vec<Message>,
) -> Result<Flow, TalkbackError> {
    let is_self = registration.is_self(&msg);
    let sender = msg.prefix.as_ref().map(ToString::to_string).unwrap_or_default();

    match msg.command {
        Command::PING(server, token) => {
            out.push(Message::pong(server, token));
        }
        Command::Response(Response::RPL_WELCOME, args) if !registration.registered => {
            if let Some(confirmed) = args.into_iter().next().filter(|n| !n.is_empty()) {
                registration.nickname = confirmed;
            }
            registration.registered = true;
            handler.on_signed_on(&registration.nickname, out)?;
        }
        Command::Response(Response::ERR_NICKNAMEINUSE | Response::ERR_NICKCOLLISION, _)
            if !registration.registered =>
        {
            let taken = registration.nickname.clone();
            registration.nickname.push('_');
            info!(taken = %taken, retry = %registration.nickname, "Nickname in use, retrying");
            out.push(Message::nick(registration.nickname.clone()));
        }
        Command::Response(Response::ERR_ERRONEUSNICKNAME, _) if !registration.registered => {
            return Ok(Flow::Closed(format!(
                "Erroneous nickname: {}",
                registration.nickname
            )));
        }
        Command::JOIN(channel) if is_self => {
            handler.on_joined(&channel)?;
        }
        Command::NICK(nickname) if is_self => {
            registration.nickname = nickname.clone();
            handler.on_nick_changed(&nickname);
        }
        Command::PRIVMSG(target, text) => {
            handler.on_message(IncomingMessage::new(sender, target, text), out)?;
        }
        Command::ERROR(reason) => return Ok(Flow::Closed(reason)),
        other => {
            debug!(command = %other.name(), "Unhandled message");
        }
    }

    Ok(Flow::Continue)
}
