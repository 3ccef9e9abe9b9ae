//! The command registry.
//!
//! Built once at startup from a list of descriptors and immutable afterwards.
//! Both help documents are rendered during construction and cached, so the
//! router can share the registry across tasks without locking.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::split::is_separator;

use super::CommandDescriptor;
use super::help::render_document;

/// Identifier the router answers itself.
pub const HELP_IDENTIFIER: &str = "help";

/// The immutable set of registered commands.
#[derive(Debug)]
pub struct Registry {
    delimiter: String,
    commands: Vec<CommandDescriptor>,
    index: HashMap<String, usize>,
    help: String,
    admin_help: String,
}

impl Registry {
    /// Builds the registry.
    ///
    /// Fails on an invalid delimiter, a malformed or reserved identifier, or an
    /// identifier registered twice. Registration order defines help order.
    pub fn build(
        delimiter: impl Into<String>,
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> RegistryResult<Self> {
        let delimiter = delimiter.into();
        check_delimiter(&delimiter)?;

        let mut commands = Vec::new();
        let mut index = HashMap::new();

        for descriptor in descriptors {
            let identifier = descriptor.identifier().to_string();
            check_identifier(&identifier)?;

            if index.contains_key(&identifier) {
                return Err(RegistryError::DuplicateIdentifier(identifier));
            }

            debug!(
                command = %identifier,
                privileged = descriptor.is_privileged(),
                "Registered command"
            );
            index.insert(identifier, commands.len());
            commands.push(descriptor);
        }

        let help = render_document(&delimiter, &commands, false);
        let admin_help = render_document(&delimiter, &commands, true);

        Ok(Self {
            delimiter,
            commands,
            index,
            help,
            admin_help,
        })
    }

    /// Looks up a command by its lower-case identifier.
    pub fn get(&self, identifier: &str) -> Option<&CommandDescriptor> {
        self.index.get(identifier).map(|&i| &self.commands[i])
    }

    /// Iterates over the descriptors in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// Iterates over the identifiers in registration order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(CommandDescriptor::identifier)
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The standard help document (non-privileged commands).
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The admin help document (privileged commands).
    pub fn admin_help(&self) -> &str {
        &self.admin_help
    }

    /// Returns the document for the given tier.
    pub fn help_for(&self, is_admin: bool) -> &str {
        if is_admin {
            &self.admin_help
        } else {
            &self.help
        }
    }
}

fn check_delimiter(delimiter: &str) -> RegistryResult<()> {
    if delimiter.is_empty() || delimiter.chars().any(is_separator) {
        return Err(RegistryError::InvalidDelimiter(delimiter.to_string()));
    }
    Ok(())
}

fn check_identifier(identifier: &str) -> RegistryResult<()> {
    let reason = if identifier.is_empty() {
        "must not be empty"
    } else if identifier.chars().any(is_separator) {
        "must not contain whitespace or commas"
    } else if identifier.to_lowercase() != identifier {
        "must be lower-case"
    } else if identifier == HELP_IDENTIFIER {
        return Err(RegistryError::ReservedIdentifier(identifier.to_string()));
    } else {
        return Ok(());
    };

    Err(RegistryError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command;
    use crate::context::CommandContext;
    use crate::schema::ArgType;

    async fn noop(_ctx: CommandContext) {}

    fn sample() -> Vec<CommandDescriptor> {
        vec![
            command("ban")
                .privileged()
                .required(ArgType::Text)
                .optional(ArgType::Integer)
                .description("Ban a user")
                .handler(noop)
                .unwrap(),
            command("stock")
                .description("Show stock")
                .handler(noop)
                .unwrap(),
        ]
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = Registry::build("!", sample()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), ["ban", "stock"]);
        assert!(registry.get("ban").unwrap().is_privileged());
        assert!(registry.get("BAN").is_none());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_help_documents_are_cached_per_tier() {
        let registry = Registry::build("!", sample()).unwrap();

        assert_eq!(registry.help(), "!stock -> Show stock");
        assert_eq!(
            registry.admin_help(),
            "!ban <text> <integer?> -> Ban a user"
        );
        assert_eq!(registry.help_for(false), registry.help());
        assert_eq!(registry.help_for(true), registry.admin_help());
    }

    #[test]
    fn test_duplicate_identifier_fails() {
        let mut descs = sample();
        descs.push(command("stock").handler(noop).unwrap());

        assert_eq!(
            Registry::build("!", descs).unwrap_err(),
            RegistryError::DuplicateIdentifier("stock".into())
        );
    }

    #[test]
    fn test_help_is_reserved() {
        let descs = vec![command("help").handler(noop).unwrap()];
        assert_eq!(
            Registry::build("!", descs).unwrap_err(),
            RegistryError::ReservedIdentifier("help".into())
        );
    }

    #[test]
    fn test_invalid_identifiers() {
        for id in ["", "Ban", "add tag", "a,b"] {
            let descs = vec![command(id).handler(noop).unwrap()];
            assert!(
                matches!(
                    Registry::build("!", descs),
                    Err(RegistryError::InvalidIdentifier { .. })
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_delimiter() {
        for delim in ["", " ", "!,"] {
            assert_eq!(
                Registry::build(delim, sample()).unwrap_err(),
                RegistryError::InvalidDelimiter(delim.into())
            );
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::build("!", Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.help(), "");
        assert_eq!(registry.admin_help(), "");
    }
}
