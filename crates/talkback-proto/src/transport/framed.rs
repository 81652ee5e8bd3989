//! Framed IRC transport over plain TCP and client-side TLS.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_util::codec::Framed;
use tracing::warn;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

use super::error::TransportReadError;

/// IRC transport over a connected stream.
#[allow(clippy::large_enum_variant)]
#[non_exhaustive]
pub enum Transport {
    /// Plain TCP transport.
    Tcp {
        /// The framed codec for TCP.
        framed: Framed<TcpStream, IrcCodec>,
    },
    /// Client-side TLS transport (e.g. port 6697).
    ClientTls {
        /// The framed codec for TLS.
        framed: Framed<TlsStream<TcpStream>, IrcCodec>,
    },
}

impl Transport {
    /// Wrap a connected TCP stream. Enables keepalive on a best-effort basis.
    pub fn tcp(stream: TcpStream) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self::Tcp {
            framed: Framed::new(stream, IrcCodec::new()),
        }
    }

    /// Wrap an established client TLS stream.
    pub fn client_tls(stream: TlsStream<TcpStream>) -> Self {
        if let Err(e) = Self::enable_keepalive(stream.get_ref().0) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self::ClientTls {
            framed: Framed::new(stream, IrcCodec::new()),
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    /// Check if this transport is encrypted.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::ClientTls { .. })
    }

    /// Read the next IRC message.
    ///
    /// Returns `Ok(None)` when the peer closes the connection.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        macro_rules! read_framed {
            ($framed:expr) => {
                match $framed.next().await {
                    Some(Ok(msg)) => Ok(Some(msg)),
                    Some(Err(e)) => Err(TransportReadError::from(e)),
                    None => Ok(None),
                }
            };
        }

        match self {
            Transport::Tcp { framed } => read_framed!(framed),
            Transport::ClientTls { framed } => read_framed!(framed),
        }
    }

    /// Write one IRC message and flush it.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), ProtocolError> {
        match self {
            Transport::Tcp { framed } => framed.send(message.clone()).await,
            Transport::ClientTls { framed } => framed.send(message.clone()).await,
        }
    }
}
