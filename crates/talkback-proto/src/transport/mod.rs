//! Framed client transport over TCP or TLS.
//!
//! ```ignore
//! use talkback_proto::transport::Transport;
//!
//! let stream = tokio::net::TcpStream::connect("irc.libera.chat:6667").await?;
//! let mut transport = Transport::tcp(stream);
//! transport.write_message(&Message::nick("talkback")).await?;
//! while let Some(msg) = transport.read_message().await? {
//!     // ...
//! }
//! ```

mod error;
mod framed;

pub use error::TransportReadError;
pub use framed::Transport;
