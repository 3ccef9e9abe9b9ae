//! Help text derived from descriptor schemas.

use crate::schema::{ArgSlot, Schema};

use super::CommandDescriptor;

/// Rendered in place of a variadic tail.
pub const VARIADIC_MARKER: &str = "[arg1, arg2, ...]";

/// Renders the argument shape of a schema, e.g. `<text> <integer?>`.
pub fn render_shape(schema: &Schema) -> String {
    schema
        .slots()
        .iter()
        .map(|slot| match slot {
            ArgSlot::Required(ty) => format!("<{ty}>"),
            ArgSlot::Optional(ty) => format!("<{ty}?>"),
            ArgSlot::Variadic(_) => VARIADIC_MARKER.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders one help line: `<delimiter><identifier> <shape> -> <description>`.
pub fn render_line(delimiter: &str, descriptor: &CommandDescriptor) -> String {
    let shape = render_shape(descriptor.schema());
    if shape.is_empty() {
        format!(
            "{delimiter}{} -> {}",
            descriptor.identifier(),
            descriptor.description()
        )
    } else {
        format!(
            "{delimiter}{} {shape} -> {}",
            descriptor.identifier(),
            descriptor.description()
        )
    }
}

/// Renders the help document for one tier, preserving registration order.
pub fn render_document<'a>(
    delimiter: &str,
    descriptors: impl IntoIterator<Item = &'a CommandDescriptor>,
    privileged: bool,
) -> String {
    descriptors
        .into_iter()
        .filter(|desc| desc.is_privileged() == privileged)
        .map(|desc| render_line(delimiter, desc))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command;
    use crate::context::CommandContext;
    use crate::schema::ArgType;

    async fn noop(_ctx: CommandContext) {}

    #[test]
    fn test_line_with_required_and_optional() {
        let ban = command("ban")
            .privileged()
            .required(ArgType::Text)
            .optional(ArgType::Integer)
            .description("Ban a user")
            .handler(noop)
            .unwrap();

        assert_eq!(render_line("!", &ban), "!ban <text> <integer?> -> Ban a user");
    }

    #[test]
    fn test_line_with_variadic() {
        let addtag = command("addtag")
            .required(ArgType::Text)
            .variadic(ArgType::Text)
            .description("Tag a user")
            .handler(noop)
            .unwrap();

        assert_eq!(
            render_line("!", &addtag),
            "!addtag <text> [arg1, arg2, ...] -> Tag a user"
        );
    }

    #[test]
    fn test_line_without_arguments() {
        let compare = command("compare")
            .description("Compare prices")
            .handler(noop)
            .unwrap();

        assert_eq!(render_line("!", &compare), "!compare -> Compare prices");
    }

    #[test]
    fn test_document_splits_tiers_in_order() {
        let descs = vec![
            command("stock").description("s").handler(noop).unwrap(),
            command("ban").privileged().description("b").handler(noop).unwrap(),
            command("contact").description("c").handler(noop).unwrap(),
            command("unban").privileged().description("u").handler(noop).unwrap(),
        ];

        assert_eq!(
            render_document("!", &descs, false),
            "!stock -> s\n!contact -> c"
        );
        assert_eq!(render_document("!", &descs, true), "!ban -> b\n!unban -> u");
    }
}
