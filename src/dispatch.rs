//! Message classification and reply targeting.
//!
//! Rules are applied in order and the first match wins:
//!
//! 1. private message: addressed to our nickname, reply to the sender
//! 2. mention: text starts with our nickname, reply in the channel
//! 3. keyword: the lower-cased text is contained *within* a trigger
//! 4. otherwise no reply
//!
//! Rule 3 tests `text in trigger`, not `trigger in text`. A message
//! "testing" matches the trigger "testing the bot"; "testing the bot
//! extended" does not.

use crate::config::SessionConfig;
use crate::error::TalkbackError;
use crate::responses::ResponseSource;
use crate::session::Outbound;

/// One inbound chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Raw source, e.g. `nick!user@host`.
    pub sender_identity: String,
    /// Channel name, or our nickname for a private message.
    pub channel_or_target: String,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(
        sender_identity: impl Into<String>,
        channel_or_target: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sender_identity: sender_identity.into(),
            channel_or_target: channel_or_target.into(),
            text: text.into(),
        }
    }

    pub fn sender_nickname(&self) -> &str {
        sender_nickname(&self.sender_identity)
    }
}

/// Nickname part of a `nick!user@host` identity, or the whole string.
pub fn sender_nickname(identity: &str) -> &str {
    identity.split_once('!').map_or(identity, |(nick, _)| nick)
}

/// Which rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    PrivateMessage,
    Mention,
    KeywordTrigger,
    Ignore,
}

/// Where to reply and what to put in front of the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchDecision {
    pub kind: Classification,
    /// `None` means no reply.
    pub target: Option<String>,
    pub prefix: String,
}

impl DispatchDecision {
    fn ignore() -> Self {
        Self {
            kind: Classification::Ignore,
            target: None,
            prefix: String::new(),
        }
    }

    fn public(kind: Classification, channel: &str, sender: &str) -> Self {
        Self {
            kind,
            target: Some(channel.to_owned()),
            prefix: format!("{}: ", sender),
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.target.is_some()
    }
}

/// Classify a message. Pure; never fails.
pub fn classify(
    msg: &IncomingMessage,
    config: &SessionConfig,
    current_nickname: &str,
) -> DispatchDecision {
    let sender = msg.sender_nickname();

    if msg.channel_or_target == current_nickname {
        return DispatchDecision {
            kind: Classification::PrivateMessage,
            target: Some(sender.to_owned()),
            prefix: String::new(),
        };
    }

    if msg.text.starts_with(current_nickname) {
        return DispatchDecision::public(Classification::Mention, &msg.channel_or_target, sender);
    }

    let lowered = msg.text.to_lowercase();
    if config
        .triggers
        .iter()
        .any(|trigger| trigger.contains(lowered.as_str()))
    {
        return DispatchDecision::public(
            Classification::KeywordTrigger,
            &msg.channel_or_target,
            sender,
        );
    }

    DispatchDecision::ignore()
}

/// A reply that went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub kind: Classification,
    pub receiver: String,
    pub sender: String,
    /// The picked response, without the prefix.
    pub response: String,
}

/// Classifies messages and sends a picked response for actionable ones.
pub struct Dispatcher<R> {
    responses: R,
}

impl<R: ResponseSource> Dispatcher<R> {
    pub fn new(responses: R) -> Self {
        Self { responses }
    }

    /// Classify `msg` and, if it calls for a reply, send one through `out`.
    ///
    /// Returns `Ok(None)` when nothing was sent.
    pub fn dispatch(
        &mut self,
        msg: &IncomingMessage,
        config: &SessionConfig,
        current_nickname: &str,
        out: &mut dyn Outbound,
    ) -> Result<Option<SentReply>, TalkbackError> {
        let decision = classify(msg, config, current_nickname);
        let Some(receiver) = decision.target else {
            return Ok(None);
        };

        let response = self.responses.pick()?;
        out.send_message(&receiver, &format!("{}{}", decision.prefix, response))?;

        Ok(Some(SentReply {
            kind: decision.kind,
            receiver,
            sender: msg.sender_nickname().to_owned(),
            response,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::ResponseSet;
    use talkback_proto::{Command, Message};

    fn config(triggers: &[&str]) -> SessionConfig {
        SessionConfig::new("tcp:localhost:6667", "#chan", "bot", "Bot", triggers)
    }

    fn msg(sender: &str, target: &str, text: &str) -> IncomingMessage {
        IncomingMessage::new(sender, target, text)
    }

    #[test]
    fn test_sender_nickname() {
        assert_eq!(sender_nickname("alice!user@host"), "alice");
        assert_eq!(sender_nickname("alice"), "alice");
        assert_eq!(sender_nickname("a!b!c"), "a");
        assert_eq!(sender_nickname(""), "");
    }

    #[test]
    fn test_private_message() {
        let decision = classify(&msg("alice!u@h", "bot", "hello"), &config(&[]), "bot");
        assert_eq!(decision.kind, Classification::PrivateMessage);
        assert_eq!(decision.target.as_deref(), Some("alice"));
        assert_eq!(decision.prefix, "");
    }

    #[test]
    fn test_private_wins_over_trigger_and_mention() {
        let cfg = config(&["bot hello"]);
        let decision = classify(&msg("alice!u@h", "bot", "bot hello"), &cfg, "bot");
        assert_eq!(decision.kind, Classification::PrivateMessage);
        assert_eq!(decision.target.as_deref(), Some("alice"));
    }

    #[test]
    fn test_mention() {
        let decision = classify(&msg("alice!user@host", "#chan", "bot: hello"), &config(&[]), "bot");
        assert_eq!(decision.kind, Classification::Mention);
        assert_eq!(decision.target.as_deref(), Some("#chan"));
        assert_eq!(decision.prefix, "alice: ");
    }

    #[test]
    fn test_mention_has_no_word_boundary() {
        let decision = classify(&msg("alice", "#chan", "botany is fun"), &config(&[]), "bot");
        assert_eq!(decision.kind, Classification::Mention);
    }

    #[test]
    fn test_mention_is_case_sensitive() {
        let decision = classify(&msg("alice", "#chan", "Bot: hi"), &config(&[]), "bot");
        assert_eq!(decision.kind, Classification::Ignore);
    }

    #[test]
    fn test_mention_wins_over_trigger() {
        let cfg = config(&["bot: hello"]);
        let decision = classify(&msg("alice", "#chan", "bot: hello"), &cfg, "bot");
        assert_eq!(decision.kind, Classification::Mention);
    }

    #[test]
    fn test_keyword_message_within_trigger() {
        let cfg = config(&["testing the bot"]);
        let decision = classify(&msg("carol!c@x", "#chan", "TESTING"), &cfg, "bot");
        assert_eq!(decision.kind, Classification::KeywordTrigger);
        assert_eq!(decision.target.as_deref(), Some("#chan"));
        assert_eq!(decision.prefix, "carol: ");
    }

    #[test]
    fn test_keyword_trigger_within_message_does_not_match() {
        let cfg = config(&["testing the bot"]);
        let decision = classify(&msg("carol", "#chan", "testing the bot extended"), &cfg, "bot");
        assert_eq!(decision.kind, Classification::Ignore);
        assert!(!decision.is_actionable());
    }

    #[test]
    fn test_keyword_exact_match() {
        let cfg = config(&["nothing", "!test"]);
        let decision = classify(&msg("carol", "#chan", "!TEST"), &cfg, "bot");
        assert_eq!(decision.kind, Classification::KeywordTrigger);
    }

    #[test]
    fn test_no_triggers_no_reply() {
        let decision = classify(&msg("bob!h@x", "#chan", "not a trigger"), &config(&[]), "bot");
        assert_eq!(decision, DispatchDecision::ignore());
    }

    #[test]
    fn test_dispatch_sends_prefixed_reply() {
        let responses = ResponseSet::new(["test1"]).unwrap();
        let mut dispatcher = Dispatcher::new(responses);
        let mut out: Vec<Message> = Vec::new();

        let sent = dispatcher
            .dispatch(&msg("alice!u@h", "#chan", "bot: hi"), &config(&[]), "bot", &mut out)
            .unwrap()
            .unwrap();

        assert_eq!(sent.receiver, "#chan");
        assert_eq!(sent.sender, "alice");
        assert_eq!(sent.response, "test1");
        assert_eq!(
            out,
            vec![Message::from(Command::PRIVMSG(
                "#chan".into(),
                "alice: test1".into()
            ))]
        );
    }

    #[test]
    fn test_dispatch_private_reply_has_no_prefix() {
        let mut dispatcher = Dispatcher::new(ResponseSet::new(["pong"]).unwrap());
        let mut out: Vec<Message> = Vec::new();

        dispatcher
            .dispatch(&msg("alice!u@h", "bot", "ping"), &config(&[]), "bot", &mut out)
            .unwrap();

        assert_eq!(out, vec![Message::privmsg("alice", "pong")]);
    }

    #[test]
    fn test_dispatch_ignore_sends_nothing() {
        let mut dispatcher = Dispatcher::new(ResponseSet::new(["x"]).unwrap());
        let mut out: Vec<Message> = Vec::new();

        let sent = dispatcher
            .dispatch(&msg("bob!h@x", "#chan", "not a trigger"), &config(&[]), "bot", &mut out)
            .unwrap();

        assert!(sent.is_none());
        assert!(out.is_empty());
    }
}
