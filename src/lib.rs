//! talkback - a small IRC bot that answers mentions, private messages and
//! configured keywords with a random canned reply.
//!
//! ```text
//! inbound PRIVMSG -> Dispatcher::classify -> ResponseSource::pick -> Outbound::send_message
//! ```

pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod network;
pub mod responses;
pub mod service;
pub mod session;

pub use config::{Config, SessionConfig};
pub use dispatch::{classify, Classification, DispatchDecision, Dispatcher, IncomingMessage};
pub use error::{ConnectionFailure, TalkbackError};
pub use responses::{ResponseSet, ResponseSource};
pub use service::TalkbackService;
pub use session::{LifecycleEvent, Outbound, Session, SessionHandler, SessionState};
