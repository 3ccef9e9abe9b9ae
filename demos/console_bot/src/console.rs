//! Standard input/output transport.
//!
//! Each stdin line of the form `<actor>: <text>` becomes one
//! [`IncomingMessage`]; replies are printed as `→ <actor>: <text>`.

use std::io::Write;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use herald::prelude::{IncomingMessage, Messenger, SendError, SendResult};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{trace, warn};

/// Prints every outgoing message to stdout.
#[derive(Debug, Default)]
pub struct ConsoleMessenger;

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(&self, actor_id: &str, text: &str) -> SendResult {
        write_reply(&mut std::io::stdout().lock(), actor_id, text)
    }
}

/// Writes one reply, indenting continuation lines under the first.
fn write_reply(out: &mut impl Write, actor_id: &str, text: &str) -> SendResult {
    let undeliverable = |e: std::io::Error| SendError::Undeliverable {
        actor_id: actor_id.to_owned(),
        reason: e.to_string(),
    };

    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            writeln!(out, "→ {actor_id}: {line}").map_err(undeliverable)?;
        } else {
            writeln!(out, "  {line}").map_err(undeliverable)?;
        }
    }
    out.flush().map_err(undeliverable)
}

/// Splits `"<actor>: <text>"` into a message.
///
/// Lines without a colon or with an empty actor are ignored.
pub fn parse_line(line: &str) -> Option<IncomingMessage> {
    let (actor, text) = line.split_once(':')?;
    let actor = actor.trim();
    if actor.is_empty() {
        return None;
    }
    let text = text.strip_prefix(' ').unwrap_or(text);
    Some(IncomingMessage::new(actor, text))
}

/// Reads messages from stdin until EOF.
pub fn stdin_messages() -> Pin<Box<dyn Stream<Item = IncomingMessage> + Send>> {
    let lines = BufReader::new(tokio::io::stdin()).lines();

    Box::pin(futures::stream::unfold(lines, |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_line(&line) {
                    Some(message) => return Some((message, lines)),
                    None => trace!(line = %line, "Skipping malformed input line"),
                },
                Ok(None) => return None,
                Err(e) => {
                    warn!("Failed to read stdin: {e}");
                    return None;
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let msg = parse_line("alice: !ban 123456 7").unwrap();
        assert_eq!(msg.actor_id, "alice");
        assert_eq!(msg.text, "!ban 123456 7");
    }

    #[test]
    fn test_parse_line_keeps_inner_colons() {
        let msg = parse_line("bob:note: hi").unwrap();
        assert_eq!(msg.actor_id, "bob");
        assert_eq!(msg.text, "note: hi");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_reply_indents_continuation_lines() {
        let mut out = Vec::new();
        write_reply(&mut out, "alice", "Usage:\n!ban <uid>").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "→ alice: Usage:\n  !ban <uid>\n"
        );
    }

    #[test]
    fn test_write_failure_is_undeliverable() {
        let err = write_reply(&mut ClosedPipe, "alice", "hi").unwrap_err();
        let SendError::Undeliverable { actor_id, reason } = err;
        assert_eq!(actor_id, "alice");
        assert!(!reason.is_empty());
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(parse_line("no separator").is_none());
        assert!(parse_line("  : hello").is_none());
    }
}
