//! Message splitting.
//!
//! An incoming line is broken into tokens on runs of whitespace and commas,
//! then classified as a command invocation or plain text.

/// Returns `true` for characters that separate tokens.
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

/// Splits `input` on runs of whitespace and commas.
///
/// Leading, trailing and repeated separators never produce empty tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// One parsed request from one actor.
///
/// Built per incoming message, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Opaque identity of the sender.
    pub actor_id: String,
    /// Lower-cased command name (delimiter stripped in command form).
    pub identifier: String,
    /// Every token after the first.
    pub tokens: Vec<String>,
    /// `true` if the message started with the command delimiter.
    pub is_command: bool,
}

impl Invocation {
    /// Splits `text` into an invocation.
    ///
    /// In command form (`text` starts with `delimiter`) the delimiter is
    /// stripped from the first token. Plain text keeps its first token whole
    /// so it can be matched against command names as a possible typo.
    pub fn parse(actor_id: impl Into<String>, text: &str, delimiter: &str) -> Self {
        let is_command = !delimiter.is_empty() && text.starts_with(delimiter);
        let mut tokens = tokenize(text).into_iter();

        let identifier = match tokens.next() {
            Some(first) if is_command => first
                .strip_prefix(delimiter)
                .unwrap_or(&first)
                .to_lowercase(),
            Some(first) => first.to_lowercase(),
            None => String::new(),
        };

        Self {
            actor_id: actor_id.into(),
            identifier,
            tokens: tokens.collect(),
            is_command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spaces_and_commas() {
        assert_eq!(tokenize("!ban 123456 7"), vec!["!ban", "123456", "7"]);
        assert_eq!(tokenize("a, b,,c  d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_tokenize_other_whitespace() {
        assert_eq!(tokenize("a\tb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ,  , ").is_empty());
    }

    #[test]
    fn test_tokenize_edges_produce_no_empty_tokens() {
        assert_eq!(tokenize("  hello  "), vec!["hello"]);
        assert_eq!(tokenize(",x,"), vec!["x"]);
    }

    #[test]
    fn test_invocation_command_form() {
        let inv = Invocation::parse("1", "!BAN 123456, 7", "!");
        assert!(inv.is_command);
        assert_eq!(inv.actor_id, "1");
        assert_eq!(inv.identifier, "ban");
        assert_eq!(inv.tokens, vec!["123456", "7"]);
    }

    #[test]
    fn test_invocation_plain_text() {
        let inv = Invocation::parse("1", "Hello there", "!");
        assert!(!inv.is_command);
        assert_eq!(inv.identifier, "hello");
        assert_eq!(inv.tokens, vec!["there"]);
    }

    #[test]
    fn test_invocation_multi_char_delimiter() {
        let inv = Invocation::parse("1", "::stock now", "::");
        assert!(inv.is_command);
        assert_eq!(inv.identifier, "stock");
        assert_eq!(inv.tokens, vec!["now"]);
    }

    #[test]
    fn test_invocation_bare_delimiter() {
        let inv = Invocation::parse("1", "!", "!");
        assert!(inv.is_command);
        assert_eq!(inv.identifier, "");
        assert!(inv.tokens.is_empty());
    }

    #[test]
    fn test_invocation_leading_space_is_not_a_command() {
        let inv = Invocation::parse("1", " !ban x", "!");
        assert!(!inv.is_command);
        assert_eq!(inv.identifier, "!ban");
    }

    #[test]
    fn test_invocation_empty_message() {
        let inv = Invocation::parse("1", "", "!");
        assert!(!inv.is_command);
        assert!(inv.identifier.is_empty());
        assert!(inv.tokens.is_empty());
    }
}
