pub mod search;
pub mod utility;

use tracing::{error, info};
use twilight_model::{
    application::{
        command::Command,
        interaction::{InteractionData, InteractionType},
    },
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use mhbot_core::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum InteractionRoute {
    FindCommand,
    FindAutocomplete,
    PagerButtons,
    PickButtons,
}

fn route_component(custom_id: &str) -> Option<InteractionRoute> {
    const ROUTES: [(&str, InteractionRoute); 3] = [
        ("fm:more:", InteractionRoute::PagerButtons),
        ("fm:share:", InteractionRoute::PagerButtons),
        ("fm:pick:", InteractionRoute::PickButtons),
    ];

    ROUTES
        .into_iter()
        .find_map(|(prefix, route)| custom_id.starts_with(prefix).then_some(route))
}

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

impl CommandMeta {
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub const COMMANDS: &[CommandMeta] = &[
    search::find::META,
    utility::help::META,
    // Add new commands here
];

/// Resolve a command by name or alias (case-insensitive).
pub fn resolve_command(name: &str) -> Option<&'static CommandMeta> {
    let name = name.to_ascii_lowercase();
    COMMANDS.iter().find(|command| command.answers_to(&name))
}

/// Outcome of one command execution.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommandResult {
    /// A reply reached the user.
    pub replied: bool,
    /// The command did what was asked.
    pub success: bool,
    /// The reply went to a direct-message channel.
    pub sent_dm: bool,
    /// The bot itself failed (delivery or lookup), as opposed to a user miss.
    pub bot_error: bool,
}

/// Split `<prefix> <command> <args...>` into a lower-cased command and its tokens.
pub fn parse_command(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let rest = content.trim().strip_prefix(prefix)?;
    if rest.chars().next().is_some_and(|next| !next.is_whitespace()) {
        return None;
    }
    let mut tokens = rest.split_whitespace();
    let cmd = tokens.next()?.to_ascii_lowercase();
    let args = tokens.map(ToOwned::to_owned).collect();

    Some((cmd, args))
}

/// Slash commands to register with the platform.
pub fn slash_commands() -> anyhow::Result<Vec<Command>> {
    Ok(vec![search::find::slash::command()?])
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some((cmd, args)) = parse_command(&msg.content, &ctx.config.command_prefix) else {
        return Ok(());
    };

    let Some(command) = resolve_command(&cmd) else {
        return Ok(());
    };

    let result = match command.name {
        "find-mouse" => search::find::run(ctx.clone(), &msg, &args).await,
        "help" => utility::help::run(ctx.clone(), &msg, args.first().map(String::as_str)).await,
        // Add new commands here
        _ => return Ok(()),
    };

    if result.bot_error {
        error!(
            command = command.name,
            channel_id = msg.channel_id.get(),
            "command failed"
        );
    } else {
        info!(
            command = command.name,
            replied = result.replied,
            success = result.success,
            sent_dm = result.sent_dm,
            "command finished"
        );
    }

    Ok(())
}

fn route_interaction(interaction: &InteractionCreate) -> Option<InteractionRoute> {
    match (interaction.kind, interaction.data.as_ref()?) {
        (InteractionType::ApplicationCommand, InteractionData::ApplicationCommand(data))
            if data.name == search::find::slash::COMMAND_NAME =>
        {
            Some(InteractionRoute::FindCommand)
        }
        (
            InteractionType::ApplicationCommandAutocomplete,
            InteractionData::ApplicationCommand(data),
        ) if data.name == search::find::slash::COMMAND_NAME => {
            Some(InteractionRoute::FindAutocomplete)
        }
        (InteractionType::MessageComponent, InteractionData::MessageComponent(data)) => {
            route_component(&data.custom_id)
        }
        _ => None,
    }
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    match route_interaction(&interaction) {
        Some(InteractionRoute::FindCommand) => {
            search::find::slash::run(ctx, interaction).await?;
        }
        Some(InteractionRoute::FindAutocomplete) => {
            search::find::autocomplete::run(ctx, interaction).await?;
        }
        Some(InteractionRoute::PagerButtons) => {
            let _handled = search::find::slash::handle_pager_interaction(ctx, interaction).await?;
        }
        Some(InteractionRoute::PickButtons) => {
            let _handled = search::find::present::handle_pick_interaction(ctx, interaction).await?;
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefix_command_and_tokens() {
        let (cmd, args) = parse_command("  -mh FIND current  black widow ", "-mh").unwrap();
        assert_eq!(cmd, "find");
        assert_eq!(args, vec!["current", "black", "widow"]);
    }

    #[test]
    fn ignores_messages_without_prefix() {
        assert!(parse_command("find white", "-mh").is_none());
        assert!(parse_command("-mh", "-mh").is_none());
    }

    #[test]
    fn prefix_must_stand_alone() {
        assert!(parse_command("-mhfind white", "-mh").is_none());
        assert!(parse_command("-mhx", "-mh").is_none());
        let (cmd, args) = parse_command("-mh\tfind white", "-mh").unwrap();
        assert_eq!(cmd, "find");
        assert_eq!(args, vec!["white"]);
    }

    #[test]
    fn aliases_resolve_to_find() {
        for name in ["find-mouse", "find", "MFIND"] {
            assert_eq!(resolve_command(name).map(|c| c.name), Some("find-mouse"));
        }
        assert!(resolve_command("ping").is_none());
    }

    #[test]
    fn component_routes() {
        assert_eq!(
            route_component("fm:more:1:2"),
            Some(InteractionRoute::PagerButtons)
        );
        assert_eq!(
            route_component("fm:share:1:2"),
            Some(InteractionRoute::PagerButtons)
        );
        assert_eq!(
            route_component("fm:pick:m:1:2:-"),
            Some(InteractionRoute::PickButtons)
        );
        assert_eq!(route_component("pg:help:next:1:2:3:4"), None);
    }
}
