pub mod autocomplete;
pub mod present;
pub mod slash;

use tracing::error;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{CommandMeta, CommandResult};
use mhbot_core::Context;
use mhbot_lookup::{Domain, Filter, Lookup, LookupError, SearchMatch, extract_filter};
use mhbot_utils::channel::{ChannelKind, DmScope, is_dm_channel};
use mhbot_utils::respond::send_chunks;
use mhbot_utils::split::{SplitOptions, split_message};

pub const META: CommandMeta = CommandMeta {
    name: "find-mouse",
    aliases: &["find", "mfind"],
    desc: "Find the attraction rates for a mouse, or drop rates for an item.",
    category: "search",
    usage: "find [filter] mouse",
};

pub const NO_QUERY_REPLY: &str =
    "I just cannot find what you're looking for (since you didn't tell me what it was).";

/// Fence wrapping for plain-text replies and formatted results.
pub const FENCE_OPEN: &str = "```\n";
pub const FENCE_CLOSE: &str = "\n```";

pub fn not_found_reply(query: &str) -> String {
    format!("I don't know anything about \"{query}\"")
}

/// What a message-path `find` should do, decided before anything is sent.
#[derive(Clone, Debug, PartialEq)]
pub enum FindPlan {
    Reply(String),
    Present {
        query: String,
        matches: Vec<SearchMatch>,
        filter: Option<Filter>,
    },
}

/// Resolve raw argument tokens into a reply or a set of matches.
///
/// Creatures are searched first; items only when no creature matches.
pub async fn plan(lookup: &dyn Lookup, args: &[String]) -> Result<FindPlan, LookupError> {
    if args.is_empty() {
        return Ok(FindPlan::Reply(NO_QUERY_REPLY.to_owned()));
    }

    let (mut tokens, filter) = extract_filter(args, &lookup.filters());
    if tokens
        .last()
        .is_some_and(|token| token.eq_ignore_ascii_case("mouse"))
    {
        tokens.pop();
    }

    if tokens.is_empty() {
        return Ok(FindPlan::Reply(NO_QUERY_REPLY.to_owned()));
    }

    let query = tokens.join(" ").to_lowercase();

    for domain in [Domain::Mouse, Domain::Item] {
        let matches = lookup.search(domain, &query).await?;
        if !matches.is_empty() {
            return Ok(FindPlan::Present {
                query,
                matches,
                filter,
            });
        }
    }

    Ok(FindPlan::Reply(not_found_reply(&query)))
}

/// Message guilds carry a guild id; everything else is a direct message.
pub fn message_channel_kind(msg: &MessageCreate) -> ChannelKind {
    if msg.guild_id.is_some() {
        ChannelKind::GuildText
    } else {
        ChannelKind::Dm
    }
}

pub async fn run(ctx: Context, msg: &MessageCreate, args: &[String]) -> CommandResult {
    let is_dm = is_dm_channel(message_channel_kind(msg), DmScope::Inclusive);
    let mut result = CommandResult::default();

    let plan = match plan(ctx.lookup.as_ref(), args).await {
        Ok(plan) => plan,
        Err(source) => {
            error!(?source, "FIND: lookup failed");
            result.bot_error = true;
            return result;
        }
    };

    let delivered = match plan {
        FindPlan::Reply(reply) => {
            let chunks = split_message(&reply, &SplitOptions::fenced(FENCE_OPEN, FENCE_CLOSE));
            send_chunks(&ctx.http, msg.channel_id, &chunks).await
        }
        FindPlan::Present {
            query,
            matches,
            filter,
        } => {
            let request = present::PresentRequest {
                channel_id: msg.channel_id,
                owner_id: msg.author.id,
                is_dm,
                query: &query,
                filter: filter.as_ref(),
            };
            present::present_matches(&ctx, &request, &matches).await
        }
    };

    match delivered {
        Ok(()) => {
            result.replied = true;
            result.success = true;
            result.sent_dm = is_dm;
        }
        Err(source) => {
            error!(?source, channel_id = msg.channel_id.get(), "FIND: failed to send reply");
            result.bot_error = true;
        }
    }

    result
}
