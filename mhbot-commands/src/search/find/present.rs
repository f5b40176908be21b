//! Message-path result presentation and the "pick one" buttons.

use tracing::error;
use twilight_model::{
    application::interaction::InteractionData,
    channel::message::component::{ActionRow, Button, ButtonStyle, Component},
    gateway::payload::incoming::InteractionCreate,
    id::{
        Id,
        marker::{ChannelMarker, UserMarker},
    },
};

use super::{FENCE_CLOSE, FENCE_OPEN};
use mhbot_core::Context;
use mhbot_lookup::{Domain, Filter, FormatOptions, LinkInfo, Lookup, LookupError, SearchMatch};
use mhbot_utils::channel::{ChannelKind, DmScope, is_dm_channel};
use mhbot_utils::respond::{
    respond_ephemeral_message, respond_update_without_components, respond_wrong_user,
    send_chunks, send_ephemeral_followup,
};
use mhbot_utils::split::{SplitOptions, split_message};

pub const PICK_PREFIX: &str = "fm:pick:";
pub const MAX_PICK_BUTTONS: usize = 25;
const BUTTONS_PER_ROW: usize = 5;
const MAX_LABEL_CHARS: usize = 80;
const NO_FILTER: &str = "-";
const PICK_FAILED_MESSAGE: &str = "I couldn't look that one up just now. Try again in a moment.";

/// Where and for whom a set of matches is presented.
pub struct PresentRequest<'a> {
    pub channel_id: Id<ChannelMarker>,
    pub owner_id: Id<UserMarker>,
    pub is_dm: bool,
    pub query: &'a str,
    pub filter: Option<&'a Filter>,
}

/// Decoded `fm:pick:{domain}:{id}:{owner}:{filter}` custom id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PickToken {
    pub domain: Domain,
    pub id: u64,
    pub owner_id: u64,
    pub filter: Option<String>,
}

pub fn build_pick_custom_id(found: &SearchMatch, owner_id: u64, filter: Option<&str>) -> String {
    format!(
        "{PICK_PREFIX}{}:{}:{owner_id}:{}",
        found.domain.tag(),
        found.id,
        filter.unwrap_or(NO_FILTER)
    )
}

pub fn parse_pick_custom_id(custom_id: &str) -> Option<PickToken> {
    let rest = custom_id.strip_prefix(PICK_PREFIX)?;
    let mut parts = rest.splitn(4, ':');

    let domain = Domain::from_tag(parts.next()?)?;
    let id = parts.next()?.parse().ok()?;
    let owner_id = parts.next()?.parse().ok()?;
    let filter = match parts.next()? {
        "" => return None,
        NO_FILTER => None,
        code => Some(code.to_owned()),
    };

    Some(PickToken {
        domain,
        id,
        owner_id,
        filter,
    })
}

pub fn pick_prompt(query: &str, total: usize) -> String {
    if total > MAX_PICK_BUTTONS {
        format!("I found {total} matches for \"{query}\". Here are the first {MAX_PICK_BUTTONS}:")
    } else {
        format!("I found {total} matches for \"{query}\"")
    }
}

/// One button per match, five to a row, capped at [`MAX_PICK_BUTTONS`].
pub fn build_pick_components(
    matches: &[SearchMatch],
    owner_id: u64,
    filter: Option<&str>,
) -> Vec<Component> {
    let buttons: Vec<Component> = matches
        .iter()
        .take(MAX_PICK_BUTTONS)
        .map(|found| {
            Component::Button(Button {
                id: None,
                custom_id: Some(build_pick_custom_id(found, owner_id, filter)),
                disabled: false,
                emoji: None,
                label: Some(button_label(&found.name)),
                style: ButtonStyle::Secondary,
                url: None,
                sku_id: None,
            })
        })
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            Component::ActionRow(ActionRow {
                id: None,
                components: row.to_vec(),
            })
        })
        .collect()
}

fn button_label(name: &str) -> String {
    if name.chars().count() <= MAX_LABEL_CHARS {
        return name.to_owned();
    }
    let mut label: String = name.chars().take(MAX_LABEL_CHARS - 2).collect();
    label.push_str("..");
    label
}

/// Fenced result chunks followed by the link line. Outside direct messages
/// only the first chunk is kept.
pub fn result_messages(text: &str, link: Option<String>, is_dm: bool) -> Vec<String> {
    let mut messages = split_message(text, &SplitOptions::fenced(FENCE_OPEN, FENCE_CLOSE));
    if !is_dm {
        messages.truncate(1);
    }
    messages.extend(link);
    messages
}

/// Send one match or a pick list, depending on how many matched.
pub async fn present_matches(
    ctx: &Context,
    request: &PresentRequest<'_>,
    matches: &[SearchMatch],
) -> anyhow::Result<()> {
    let filter = request.filter.map(|filter| filter.code_name.as_str());

    match matches {
        [] => Ok(()),
        [found] => send_formatted(ctx, request.channel_id, found, filter, request.is_dm).await,
        _ => {
            let prompt = pick_prompt(request.query, matches.len());
            let components = build_pick_components(matches, request.owner_id.get(), filter);
            ctx.http
                .create_message(request.channel_id)
                .content(&prompt)
                .components(&components)
                .await?;
            Ok(())
        }
    }
}

async fn send_formatted(
    ctx: &Context,
    channel_id: Id<ChannelMarker>,
    found: &SearchMatch,
    timefilter: Option<&str>,
    is_dm: bool,
) -> anyhow::Result<()> {
    let messages = formatted_messages(ctx.lookup.as_ref(), found, timefilter, is_dm).await?;
    send_chunks(&ctx.http, channel_id, &messages).await
}

/// Format one match into the messages [`send_formatted`] posts.
pub async fn formatted_messages(
    lookup: &dyn Lookup,
    found: &SearchMatch,
    timefilter: Option<&str>,
    is_dm: bool,
) -> Result<Vec<String>, LookupError> {
    let options = FormatOptions {
        timefilter: timefilter.map(ToOwned::to_owned),
        full: is_dm,
    };
    let text = lookup.format(found, &options).await?;
    let link = LinkInfo::for_domain(found.domain, Some(options.timefilter_or_default()))
        .render(found);

    Ok(result_messages(&text, link, is_dm))
}

/// Handle a press on one of the pick buttons.
pub async fn handle_pick_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<bool> {
    let http = &ctx.http;
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(false);
    };
    let Some(token) = parse_pick_custom_id(&data.custom_id) else {
        return Ok(false);
    };

    let Some(actor_id) = interaction.author_id() else {
        respond_ephemeral_message(http, &interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(true);
    };

    if actor_id.get() != token.owner_id {
        respond_wrong_user(http, &interaction).await?;
        return Ok(true);
    }

    let Some(channel) = interaction.channel.as_ref() else {
        respond_ephemeral_message(http, &interaction, "This button only works in a channel.")
            .await?;
        return Ok(true);
    };
    let channel_id = channel.id;
    let is_dm = is_dm_channel(ChannelKind::from(channel.kind), DmScope::Inclusive);

    let name = pressed_label(&interaction, &data.custom_id).unwrap_or_default();
    let found = SearchMatch {
        id: token.id,
        name,
        domain: token.domain,
    };

    respond_update_without_components(
        http,
        &interaction,
        &format!("Showing results for \"{}\"", found.name),
    )
    .await?;

    if let Err(source) =
        send_formatted(&ctx, channel_id, &found, token.filter.as_deref(), is_dm).await
    {
        error!(
            ?source,
            id = found.id,
            channel_id = channel_id.get(),
            "FIND: failed to present picked match"
        );
        send_ephemeral_followup(http, &interaction, PICK_FAILED_MESSAGE).await?;
    }

    Ok(true)
}

fn pressed_label(interaction: &InteractionCreate, custom_id: &str) -> Option<String> {
    let message = interaction.message.as_ref()?;

    message
        .components
        .iter()
        .flat_map(|component| match component {
            Component::ActionRow(row) => row.components.as_slice(),
            other => std::slice::from_ref(other),
        })
        .find_map(|component| match component {
            Component::Button(button) if button.custom_id.as_deref() == Some(custom_id) => {
                button.label.clone()
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::find::tests::FakeLookup;

    fn mouse(id: u64, name: &str) -> SearchMatch {
        SearchMatch {
            id,
            name: name.to_owned(),
            domain: Domain::Mouse,
        }
    }

    #[test]
    fn pick_token_carries_filter() {
        let custom_id = build_pick_custom_id(&mouse(42, "White"), 7, Some("halloween_2025"));
        assert_eq!(custom_id, "fm:pick:m:42:7:halloween_2025");
        assert_eq!(
            parse_pick_custom_id(&custom_id),
            Some(PickToken {
                domain: Domain::Mouse,
                id: 42,
                owner_id: 7,
                filter: Some("halloween_2025".to_owned()),
            })
        );
    }

    #[test]
    fn pick_token_without_filter() {
        let token = parse_pick_custom_id("fm:pick:i:3:9:-").unwrap();
        assert_eq!(token.domain, Domain::Item);
        assert_eq!(token.filter, None);
    }

    #[test]
    fn malformed_pick_tokens_are_rejected() {
        assert!(parse_pick_custom_id("fm:more:1:2").is_none());
        assert!(parse_pick_custom_id("fm:pick:x:1:2:-").is_none());
        assert!(parse_pick_custom_id("fm:pick:m:abc:2:-").is_none());
        assert!(parse_pick_custom_id("fm:pick:m:1:2").is_none());
        assert!(parse_pick_custom_id("fm:pick:m:1:2:").is_none());
    }

    #[test]
    fn pick_buttons_are_capped_and_rowed() {
        let matches: Vec<SearchMatch> = (1..=30).map(|id| mouse(id, &format!("Mouse {id}"))).collect();
        let rows = build_pick_components(&matches, 1, None);

        assert_eq!(rows.len(), 5);
        for row in &rows {
            let Component::ActionRow(row) = row else {
                panic!("expected action row");
            };
            assert_eq!(row.components.len(), 5);
        }
    }

    #[test]
    fn partial_last_row() {
        let matches: Vec<SearchMatch> = (1..=7).map(|id| mouse(id, "M")).collect();
        let rows = build_pick_components(&matches, 1, None);
        let Some(Component::ActionRow(last)) = rows.last() else {
            panic!("expected action row");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(last.components.len(), 2);
    }

    #[test]
    fn long_names_are_shortened_for_labels() {
        let label = button_label(&"x".repeat(120));
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.ends_with(".."));
    }

    #[test]
    fn prompt_mentions_cap_only_when_exceeded() {
        assert_eq!(pick_prompt("white", 3), "I found 3 matches for \"white\"");
        assert!(pick_prompt("m", 40).ends_with("Here are the first 25:"));
    }

    #[test]
    fn guild_results_keep_first_chunk_and_link() {
        let text = "row\n".repeat(1500);
        let link = Some("<https://www.mhct.win/attractions.php?mouse=1>".to_owned());

        let guild = result_messages(&text, link.clone(), false);
        assert_eq!(guild.len(), 2);
        assert!(guild[0].starts_with("```\n"));
        assert!(guild[0].ends_with("\n```"));
        assert_eq!(guild[1], link.clone().unwrap());

        let dm = result_messages(&text, link, true);
        assert!(dm.len() > 2);
        assert!(dm.iter().all(|message| message.chars().count() <= 2000));
    }

    #[tokio::test]
    async fn guild_pick_formats_top_rows_with_link() {
        let lookup = FakeLookup::new(&["White"], &[], &[]);
        let messages = formatted_messages(&lookup, &mouse(1, "White"), Some("1_month"), false)
            .await
            .unwrap();

        let requests = lookup.format_requests.lock().unwrap().clone();
        assert!(!requests[0].full);
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1],
            "<https://www.mhct.win/attractions.php?mouse=1&timefilter=1_month>"
        );
    }

    #[tokio::test]
    async fn dm_pick_formats_everything() {
        let lookup = FakeLookup::new(&["White"], &[], &[]);
        let messages = formatted_messages(&lookup, &mouse(1, "White"), None, true)
            .await
            .unwrap();

        let requests = lookup.format_requests.lock().unwrap().clone();
        assert!(requests[0].full);
        assert!(messages.len() > 2);
    }

    #[tokio::test]
    async fn pick_format_failure_surfaces_as_error() {
        let lookup = FakeLookup::new(&["White"], &[], &[]).failing_format();
        let result = formatted_messages(&lookup, &mouse(1, "White"), None, false).await;
        assert!(matches!(result, Err(LookupError::UnknownEntity { id: 1, .. })));
    }
}
