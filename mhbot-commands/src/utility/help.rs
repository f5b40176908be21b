use twilight_model::gateway::payload::incoming::MessageCreate;

use tracing::error;

use crate::search::find;
use crate::{COMMANDS, CommandMeta, CommandResult, resolve_command};
use mhbot_core::Context;
use mhbot_lookup::{CURRENT_FILTER_TOKEN, Filter};
use mhbot_utils::respond::send_chunks;
use mhbot_utils::split::{SplitOptions, split_message};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    aliases: &[],
    desc: "Lists out all available commands, or explains one.",
    category: "utility",
    usage: "help [command]",
};

/// Overview of every command, grouped by category.
pub fn overview(prefix: &str) -> String {
    let mut commands: Vec<&CommandMeta> = COMMANDS.iter().collect();
    commands.sort_by_key(|command| (command.category, command.name));

    let mut out = String::from("Commands:");
    let mut category = "";
    for command in commands {
        if command.category != category {
            category = command.category;
            out.push_str(&format!("\n\n{category}"));
        }
        out.push_str(&format!("\n  {prefix} {}: {}", command.name, command.desc));
        if !command.aliases.is_empty() {
            out.push_str(&format!(" (also: {})", command.aliases.join(", ")));
        }
    }
    out.push_str(&format!("\n\nUse `{prefix} help <command>` for details."));
    out
}

/// Usage text for `find`, listing the filter codes it accepts.
pub fn find_help(prefix: &str, filters: &[Filter]) -> String {
    let mut known = vec![format!("`{CURRENT_FILTER_TOKEN}`")];
    known.extend(filters.iter().map(|filter| format!("`{}`", filter.code_name)));

    format!(
        "**{prefix} {}:**\n\
         Find the attraction rates for a mouse (or the drop rates for an item). \
         Nicknames are allowed. A filter narrows the results to one event or \
         time period; `current` uses the newest one.\n\
         Known filters: {}",
        find::META.usage,
        known.join(", ")
    )
}

pub fn command_help(prefix: &str, command: &CommandMeta, filters: &[Filter]) -> String {
    if command.name == find::META.name {
        return find_help(prefix, filters);
    }
    format!("**{prefix} {}**: {}", command.usage, command.desc)
}

pub async fn run(ctx: Context, msg: &MessageCreate, arg1: Option<&str>) -> CommandResult {
    let prefix = ctx.config.command_prefix.as_str();
    let text = match arg1.and_then(resolve_command) {
        Some(command) => command_help(prefix, command, &ctx.lookup.filters()),
        None => overview(prefix),
    };

    let chunks = split_message(&text, &SplitOptions::fenced("", ""));
    match send_chunks(&ctx.http, msg.channel_id, &chunks).await {
        Ok(()) => CommandResult {
            replied: true,
            success: true,
            sent_dm: msg.guild_id.is_none(),
            bot_error: false,
        },
        Err(source) => {
            error!(?source, channel_id = msg.channel_id.get(), "HELP: failed to send reply");
            CommandResult {
                bot_error: true,
                ..CommandResult::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(code: &str) -> Filter {
        Filter {
            code_name: code.to_owned(),
            display_name: String::new(),
        }
    }

    #[test]
    fn find_help_lists_current_first() {
        let text = find_help("-mh", &[filter("1_month"), filter("halloween_2025")]);
        assert!(text.starts_with("**-mh find [filter] mouse:**"));
        assert!(text.ends_with("Known filters: `current`, `1_month`, `halloween_2025`"));
    }

    #[test]
    fn overview_covers_every_command() {
        let text = overview("!");
        for command in COMMANDS {
            assert!(text.contains(&format!("! {}:", command.name)));
        }
        assert!(text.contains("(also: find, mfind)"));
    }

    #[test]
    fn help_for_alias_resolves_to_find() {
        let command = resolve_command("mfind").unwrap();
        let text = command_help("-mh", command, &[]);
        assert!(text.ends_with("Known filters: `current`"));
    }

    #[test]
    fn other_commands_show_their_usage() {
        let text = command_help("!", &META, &[]);
        assert_eq!(
            text,
            "**! help [command]**: Lists out all available commands, or explains one."
        );
    }
}
