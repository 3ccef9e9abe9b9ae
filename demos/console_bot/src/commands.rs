//! The demo command set.

use std::collections::BTreeMap;
use std::sync::Arc;

use herald::framework::RegistryResult;
use herald::prelude::*;

/// Handle to the profile store shared with the dispatcher.
#[derive(Debug, Clone)]
pub struct Profiles(pub Arc<MemoryProfileStore>);

/// Item counts reported by `stock`.
#[derive(Debug, Clone, Default)]
pub struct Inventory(pub BTreeMap<String, u32>);

type Factory = fn(&dyn TextResolver) -> RegistryResult<CommandDescriptor>;

/// Every command the demo registers, in help order.
pub fn all() -> Vec<Factory> {
    vec![ban, unban, stock, add_tag, remove_tag, tags, contact, compare]
}

fn text(ctx: &CommandContext, key: &str, args: &[&str]) -> String {
    match ctx.state::<LanguageTable>() {
        Some(lang) => lang.resolve(key, args),
        None => key.to_string(),
    }
}

fn profiles(ctx: &CommandContext) -> Result<Arc<Profiles>, &'static str> {
    ctx.state::<Profiles>().ok_or("profile store not attached")
}

pub fn ban(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("ban")
        .privileged()
        .required(ArgType::Text)
        .optional(ArgType::Integer)
        .describe(lang, "BanDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let target = ctx.args().text(0).unwrap_or_default().to_string();
            profiles(&ctx)?
                .0
                .set_blocked(&target, true)
                .await
                .map_err(|e| e.to_string())?;

            Ok::<_, String>(match ctx.args().integer(1) {
                Some(days) => text(&ctx, "BannedFor", &[&target, &days.to_string()]),
                None => text(&ctx, "Banned", &[&target]),
            })
        })
}

pub fn unban(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("unban")
        .privileged()
        .required(ArgType::Text)
        .describe(lang, "UnbanDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let target = ctx.args().text(0).unwrap_or_default().to_string();
            profiles(&ctx)?
                .0
                .set_blocked(&target, false)
                .await
                .map_err(|e| e.to_string())?;
            Ok::<_, String>(text(&ctx, "Unbanned", &[&target]))
        })
}

pub fn stock(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("stock")
        .describe(lang, "StockDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let inventory = ctx.state::<Inventory>()?;
            let lines: Vec<String> = inventory
                .0
                .iter()
                .map(|(item, count)| format!("{item}: {count}"))
                .collect();
            Some(lines.join("\n"))
        })
}

pub fn add_tag(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("addtag")
        .privileged()
        .required(ArgType::Text)
        .variadic(ArgType::Text)
        .describe(lang, "AddTagDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let target = ctx.args().text(0).unwrap_or_default().to_string();
            let new_tags: Vec<String> = ctx.args().rest_texts().map(str::to_string).collect();
            let store = profiles(&ctx)?;
            let added = store.0.update(&target, |profile| {
                let before = profile.tags.len();
                for tag in new_tags {
                    if !profile.tags.contains(&tag) {
                        profile.tags.push(tag);
                    }
                }
                profile.tags.len() - before
            });
            Ok::<_, &'static str>(text(&ctx, "TagsAdded", &[&added.to_string(), &target]))
        })
}

pub fn remove_tag(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("removetag")
        .privileged()
        .required(ArgType::Text)
        .variadic(ArgType::Text)
        .describe(lang, "RemoveTagDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let target = ctx.args().text(0).unwrap_or_default().to_string();
            let stale: Vec<&str> = ctx.args().rest_texts().collect();
            let store = profiles(&ctx)?;
            let removed = store.0.update(&target, |profile| {
                let before = profile.tags.len();
                profile.tags.retain(|tag| !stale.contains(&tag.as_str()));
                before - profile.tags.len()
            });
            Ok::<_, &'static str>(text(&ctx, "TagsRemoved", &[&removed.to_string(), &target]))
        })
}

pub fn tags(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("tags")
        .optional(ArgType::Text)
        .describe(lang, "TagsDescription", &[])
        .handler(|ctx: CommandContext| async move {
            let target = ctx.args().text(0).unwrap_or(ctx.actor_id()).to_string();
            let store = profiles(&ctx)?;
            let tags = store.0.get(&target).map(|p| p.tags).unwrap_or_default();
            Ok::<_, &'static str>(if tags.is_empty() {
                format!("{target}: -")
            } else {
                format!("{target}: {}", tags.join(", "))
            })
        })
}

pub fn contact(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("contact")
        .describe(lang, "ContactDescription", &[])
        .handler(|ctx: CommandContext| async move { text(&ctx, "NotImplemented", &[]) })
}

pub fn compare(lang: &dyn TextResolver) -> RegistryResult<CommandDescriptor> {
    command("compare")
        .describe(lang, "CompareDescription", &[])
        .handler(|ctx: CommandContext| async move { text(&ctx, "NotImplemented", &[]) })
}
