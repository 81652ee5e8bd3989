//! Transport adapter: sockets in, session callbacks out.
//!
//! - [`connection`]: open a connection and drive a session over it
//! - [`tls`]: client TLS setup against the platform root store

mod connection;
mod tls;

pub use connection::{connect, Connection};
