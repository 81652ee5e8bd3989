//! IRC message codec for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::{self, ProtocolError};
use crate::format::is_illegal_control_char;
use crate::line::LineCodec;
use crate::message::Message;

/// Tokio codec for encoding/decoding IRC [`Message`]s.
///
/// Wraps [`LineCodec`] and parses each line into a [`Message`]. Inbound
/// lines that carry illegal control characters or do not parse are logged
/// and skipped, so the stream keeps going. Outbound messages are sanitized
/// and length-checked, and fail the write instead.
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Sanitize outgoing data.
    ///
    /// Truncates at the first line ending so a reply can never smuggle a
    /// second command onto the wire, and rejects control characters.
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some((pos, len)) = ["\r\n", "\r", "\n"]
            .iter()
            .filter_map(|needle| data.find(needle).map(|pos| (pos, needle.len())))
            .min_by_key(|&(pos, _)| pos)
        {
            data.truncate(pos + len);
        }

        if let Some(ch) = data.chars().find(|ch| is_illegal_control_char(*ch)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }

        Ok(data)
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        loop {
            let Some(line) = self.inner.decode(src)? else {
                return Ok(None);
            };

            // Blank keepalive lines carry nothing.
            if line.trim().is_empty() {
                continue;
            }

            let content = line.trim_end_matches(&['\r', '\n'][..]);
            if let Some(ch) = content.chars().find(|ch| is_illegal_control_char(*ch)) {
                warn!(ch = ?ch, line = %content, "Dropping line with illegal control character");
                continue;
            }

            match content.parse::<Message>() {
                Ok(msg) => return Ok(Some(msg)),
                Err(e) => warn!(error = %e, "Dropping unparsable line"),
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let sanitized = Self::sanitize(msg.to_string())?;
        if sanitized.len() > self.inner.max_len() {
            return Err(ProtocolError::MessageTooLong {
                actual: sanitized.len(),
                limit: self.inner.max_len(),
            });
        }
        self.inner.encode(sanitized, dst)
    }
}
