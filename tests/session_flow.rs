//! Integration tests for the bot's connection lifecycle and replies.
//!
//! Each test plays the IRC server against a real `TalkbackService`.

mod common;

use common::TestServer;
use talkback::{ConnectionFailure, LifecycleEvent, SessionConfig, TalkbackError, TalkbackService};
use talkback_proto::{Command, Message};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

struct Bot {
    handle: JoinHandle<Result<(), TalkbackError>>,
    events: mpsc::UnboundedReceiver<LifecycleEvent>,
    shutdown: watch::Sender<bool>,
}

impl Bot {
    fn spawn(endpoint: String, triggers: &[&str]) -> Self {
        let config = SessionConfig::new(endpoint, "#chan", "bot", "Talkback Test", triggers);
        let (events_tx, events) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let service = TalkbackService::new(config, vec!["test1".to_string()]).with_events(events_tx);
        let handle = tokio::spawn(service.run(shutdown_rx));

        Self {
            handle,
            events,
            shutdown,
        }
    }

    /// Wait for the service to end and collect the logged events.
    async fn finish(mut self) -> (Result<(), TalkbackError>, Vec<String>) {
        let result = self.handle.await.expect("Service task panicked");
        let mut lines = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            lines.push(event.to_string());
        }
        (result, lines)
    }
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let server = TestServer::bind().await.expect("Failed to bind test server");
    let bot = Bot::spawn(server.endpoint(), &["testing the bot"]);

    let mut peer = server.accept().await.expect("Bot did not connect");
    let nick = peer.accept_registration("bot").await.expect("Registration failed");
    assert_eq!(nick, "bot");
    let channel = peer.accept_join("bot").await.expect("Join failed");
    assert_eq!(channel, "#chan");

    // Mention
    peer.send_raw(":alice!user@host PRIVMSG #chan :bot: hello")
        .await
        .unwrap();
    let reply = peer.recv().await.unwrap();
    assert_eq!(reply.command, Command::PRIVMSG("#chan".into(), "alice: test1".into()));

    // Private message
    peer.send_raw(":alice!user@host PRIVMSG bot :psst").await.unwrap();
    let reply = peer.recv().await.unwrap();
    assert_eq!(reply.command, Command::PRIVMSG("alice".into(), "test1".into()));

    // Keyword: message contained within the trigger
    peer.send_raw(":carol!c@h PRIVMSG #chan :Testing").await.unwrap();
    let reply = peer.recv().await.unwrap();
    assert_eq!(reply.command, Command::PRIVMSG("#chan".into(), "carol: test1".into()));

    peer.close().await.unwrap();

    let (result, lines) = bot.finish().await;
    assert!(matches!(
        result,
        Err(TalkbackError::Connection(ConnectionFailure::Closed(_)))
    ));

    assert_eq!(
        lines,
        vec![
            "connectionMade",
            "Signed on",
            "[bot has joined #chan]",
            "Sent message to #chan, triggered by alice: \n\ttest1",
            "Sent message to alice, triggered by alice: \n\ttest1",
            "Sent message to #chan, triggered by carol: \n\ttest1",
            "connectionLost \"Connection closed by server\"",
        ]
    );
}

#[tokio::test]
async fn test_unmatched_message_gets_no_reply() {
    let server = TestServer::bind().await.unwrap();
    let bot = Bot::spawn(server.endpoint(), &["testing the bot"]);

    let mut peer = server.accept().await.unwrap();
    peer.accept_registration("bot").await.unwrap();
    peer.accept_join("bot").await.unwrap();

    peer.send_raw(":bob!h@x PRIVMSG #chan :not a trigger").await.unwrap();
    peer.send_raw(":bob!h@x PRIVMSG #chan :testing the bot extended")
        .await
        .unwrap();

    let before_pong = peer.sync("sync-1").await.unwrap();
    assert!(before_pong.is_empty(), "unexpected replies: {before_pong:?}");

    bot.shutdown.send(true).unwrap();
    let quit = peer.recv().await.unwrap();
    assert!(matches!(quit.command, Command::QUIT(_)));

    let (result, lines) = bot.finish().await;
    assert!(result.is_ok());

    assert!(!lines.iter().any(|l| l.starts_with("Sent message")));
    assert_eq!(lines.last().map(String::as_str), Some("connectionLost \"Shutting down\""));
}

#[tokio::test]
async fn test_malformed_lines_do_not_end_session() {
    let server = TestServer::bind().await.unwrap();
    let bot = Bot::spawn(server.endpoint(), &[]);

    let mut peer = server.accept().await.unwrap();
    peer.accept_registration("bot").await.unwrap();
    peer.accept_join("bot").await.unwrap();

    // Latin-1 text, a bell, an over-long line and a line that does not parse.
    peer.send_bytes(b":carol!c@h PRIVMSG #chan :caf\xe9\r\n")
        .await
        .unwrap();
    peer.send_raw(":carol!c@h PRIVMSG #chan :\x07ding").await.unwrap();
    peer.send_raw(&format!(":carol!c@h PRIVMSG #chan :{}", "x".repeat(600)))
        .await
        .unwrap();
    peer.send_raw(": PRIVMSG #chan :no prefix").await.unwrap();

    peer.send_raw(":alice!a@h PRIVMSG #chan :bot: still there?")
        .await
        .unwrap();
    let reply = peer.recv().await.unwrap();
    assert_eq!(reply.command, Command::PRIVMSG("#chan".into(), "alice: test1".into()));

    bot.shutdown.send(true).unwrap();
    let (result, lines) = bot.finish().await;
    assert!(result.is_ok());
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("Sent message")).count(),
        1
    );
    assert_eq!(lines.last().map(String::as_str), Some("connectionLost \"Shutting down\""));
}

#[tokio::test]
async fn test_nickname_collision_is_adopted() {
    let server = TestServer::bind().await.unwrap();
    let bot = Bot::spawn(server.endpoint(), &[]);

    let mut peer = server.accept().await.unwrap();
    assert!(matches!(peer.recv().await.unwrap().command, Command::NICK(n) if n == "bot"));
    assert!(matches!(peer.recv().await.unwrap().command, Command::USER(..)));

    peer.send_raw(":irc.test 433 * bot :Nickname is already in use")
        .await
        .unwrap();
    let retry = peer.recv().await.unwrap();
    assert_eq!(retry, Message::nick("bot_"));

    peer.send_raw(":irc.test 001 bot_ :Welcome").await.unwrap();
    peer.accept_join("bot_").await.unwrap();

    // Mentions now use the adopted nickname.
    peer.send_raw(":dave!d@h PRIVMSG #chan :bot_ are you there")
        .await
        .unwrap();
    let reply = peer.recv().await.unwrap();
    assert_eq!(reply.command, Command::PRIVMSG("#chan".into(), "dave: test1".into()));

    bot.shutdown.send(true).unwrap();
    let (result, lines) = bot.finish().await;
    result.unwrap();

    assert!(lines.contains(
        &"Your nickname was already occupied, actual nickname is \"bot_\".".to_string()
    ));
    assert!(lines.contains(&"[bot_ has joined #chan]".to_string()));
}

#[tokio::test]
async fn test_server_error_ends_session() {
    let server = TestServer::bind().await.unwrap();
    let bot = Bot::spawn(server.endpoint(), &[]);

    let mut peer = server.accept().await.unwrap();
    peer.accept_registration("bot").await.unwrap();
    peer.accept_join("bot").await.unwrap();
    peer.send_raw("ERROR :Closing Link: 127.0.0.1 (K-Lined)").await.unwrap();

    let (result, lines) = bot.finish().await;
    match result {
        Err(TalkbackError::Connection(ConnectionFailure::Closed(reason))) => {
            assert_eq!(reason, "Closing Link: 127.0.0.1 (K-Lined)");
        }
        other => panic!("expected Closed, got {other:?}"),
    }
    assert_eq!(
        lines.last().map(String::as_str),
        Some("connectionLost \"Closing Link: 127.0.0.1 (K-Lined)\"")
    );
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a local port nobody listens on.
    let endpoint = {
        let server = TestServer::bind().await.unwrap();
        server.endpoint()
    };

    let bot = Bot::spawn(endpoint, &[]);
    let (result, lines) = bot.finish().await;

    assert!(matches!(
        result,
        Err(TalkbackError::Connection(ConnectionFailure::Connect { .. }))
    ));
    assert!(lines.is_empty());
}
