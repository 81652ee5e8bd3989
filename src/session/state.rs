//! Session lifecycle states.

use std::fmt;

/// Where a session is in its connect → register → join → disconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Joined,
}

impl SessionState {
    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// The forward path is strictly Disconnected → Connecting → Connected →
    /// Joined; any live state may drop straight to Disconnected.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connected, Joined)
                | (Connecting | Connected | Joined, Disconnected)
        )
    }

    /// Connected or joined: the server has accepted our registration.
    pub fn is_registered(self) -> bool {
        matches!(self, SessionState::Connected | SessionState::Joined)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
