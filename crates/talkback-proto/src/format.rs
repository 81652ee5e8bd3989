//! Character rules for IRC lines.

/// mIRC-style formatting codes (bold, color, italics and friends).
#[inline]
pub fn is_irc_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x01' | '\x02' | '\x03' | '\x04' | '\x0F' | '\x11' | '\x16' | '\x1D' | '\x1E' | '\x1F'
    )
}

/// Returns true if a control character may not appear inside a line.
///
/// BEL is always rejected. CR and LF are line terminators, NUL is left to
/// the parser, and formatting codes are ordinary message content.
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    if ch == '\x07' {
        return true;
    }
    ch.is_control() && ch != '\r' && ch != '\n' && ch != '\0' && !is_irc_format_code(ch)
}
