//! Command descriptors and the builder that produces them.

use std::fmt;

use herald_core::TextResolver;

use crate::error::{RegistryError, RegistryResult};
use crate::handler::{BoxedHandler, Handler, into_handler};
use crate::schema::{ArgSlot, ArgType, Schema};

/// A static record describing one invokable command.
///
/// Descriptors are produced by [`command`] and handed to the
/// [`Registry`](super::Registry), which owns them for the life of the process.
#[derive(Clone)]
pub struct CommandDescriptor {
    identifier: String,
    privileged: bool,
    schema: Schema,
    description: String,
    handler: BoxedHandler,
}

impl CommandDescriptor {
    /// Returns the lower-case identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns `true` if only admins may run this command.
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Returns the argument schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the human description shown in help.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the handler.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("identifier", &self.identifier)
            .field("privileged", &self.privileged)
            .field("schema", &self.schema)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Starts building a descriptor for `identifier`.
///
/// ```rust,ignore
/// let ban = command("ban")
///     .privileged()
///     .required(ArgType::Text)
///     .optional(ArgType::Integer)
///     .description("Ban a user")
///     .handler(ban_handler)?;
/// ```
pub fn command(identifier: impl Into<String>) -> CommandBuilder {
    CommandBuilder {
        identifier: identifier.into(),
        privileged: false,
        slots: Vec::new(),
        description: String::new(),
    }
}

/// Builder returned by [`command`].
#[derive(Debug, Clone)]
#[must_use = "a command builder does nothing until `.handler()` is called"]
pub struct CommandBuilder {
    identifier: String,
    privileged: bool,
    slots: Vec<ArgSlot>,
    description: String,
}

impl CommandBuilder {
    /// Restricts the command to the admin list.
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Appends a slot.
    pub fn arg(mut self, slot: ArgSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Appends a required slot.
    pub fn required(self, ty: ArgType) -> Self {
        self.arg(ArgSlot::Required(ty))
    }

    /// Appends an optional slot.
    pub fn optional(self, ty: ArgType) -> Self {
        self.arg(ArgSlot::Optional(ty))
    }

    /// Appends a variadic tail. It must be the last slot.
    pub fn variadic(self, ty: ArgType) -> Self {
        self.arg(ArgSlot::Variadic(ty))
    }

    /// Sets a literal description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the description from a localized string table.
    pub fn describe(mut self, resolver: &dyn TextResolver, key: &str, args: &[&str]) -> Self {
        self.description = resolver.resolve(key, args);
        self
    }

    /// Attaches the handler and finishes the descriptor.
    ///
    /// Fails if the collected slots do not form a valid schema.
    pub fn handler<H: Handler>(self, handler: H) -> RegistryResult<CommandDescriptor> {
        let schema = Schema::new(self.slots).map_err(|source| RegistryError::Schema {
            identifier: self.identifier.clone(),
            source,
        })?;

        Ok(CommandDescriptor {
            identifier: self.identifier,
            privileged: self.privileged,
            schema,
            description: self.description,
            handler: into_handler(handler),
        })
    }
}
