//! Scripted IRC server for integration testing.

use std::time::Duration;
use talkback_proto::{Command, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// A listening socket on an ephemeral local port.
pub struct TestServer {
    listener: TcpListener,
}

impl TestServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    /// Endpoint string the bot should be configured with.
    pub fn endpoint(&self) -> String {
        let port = self
            .listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default();
        format!("tcp:127.0.0.1:{}", port)
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<PeerConnection> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(PeerConnection {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }
}

/// The server side of one accepted connection.
pub struct PeerConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

#[allow(dead_code)]
impl PeerConnection {
    /// Send a raw line to the bot.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes, which need not be valid UTF-8.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the bot.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }

        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Expect NICK and USER, then welcome the bot under `assigned`.
    pub async fn accept_registration(&mut self, assigned: &str) -> anyhow::Result<String> {
        let nick = match self.recv().await?.command {
            Command::NICK(nick) => nick,
            other => anyhow::bail!("expected NICK, got {:?}", other),
        };
        match self.recv().await?.command {
            Command::USER(..) => {}
            other => anyhow::bail!("expected USER, got {:?}", other),
        }
        self.send_raw(&format!(":irc.test 001 {} :Welcome to the test network", assigned))
            .await?;
        Ok(nick)
    }

    /// Expect a JOIN and echo it back as the server would.
    pub async fn accept_join(&mut self, nick: &str) -> anyhow::Result<String> {
        let channel = match self.recv().await?.command {
            Command::JOIN(channel) => channel,
            other => anyhow::bail!("expected JOIN, got {:?}", other),
        };
        self.send_raw(&format!(":{}!bot@localhost JOIN :{}", nick, channel))
            .await?;
        Ok(channel)
    }

    /// Round-trip a PING so everything the bot sent before it has arrived.
    pub async fn sync(&mut self, token: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("PING :{}", token)).await?;
        let mut before = Vec::new();
        loop {
            let msg = self.recv().await?;
            if matches!(&msg.command, Command::PONG(t, None) if t == token) {
                return Ok(before);
            }
            before.push(msg);
        }
    }

    /// Drop the connection from the server side.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
