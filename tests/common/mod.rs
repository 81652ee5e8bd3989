//! Integration test common infrastructure.
//!
//! Provides a scripted IRC server that a real talkback session connects to,
//! so tests can play the server side line by line.

pub mod server;

#[allow(unused_imports)]
pub use server::{PeerConnection, TestServer};
