//! `/find-mouse`: ephemeral, paged results with share/more buttons.

use std::sync::Arc;

use tracing::{error, info, warn};
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::{
            InteractionContextType, InteractionData,
            application_command::{CommandData, CommandOptionValue},
        },
    },
    channel::message::component::Component,
    gateway::payload::incoming::InteractionCreate,
};
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use super::not_found_reply;
use mhbot_core::Context;
use mhbot_lookup::{Domain, FormatOptions, Lookup, LookupError, SearchMatch};
use mhbot_utils::pager::{
    PagerOutcome, PagerRejection, PagerSession, SessionKey, build_pager_components,
    parse_custom_id,
};
use mhbot_utils::respond::{
    PAGER_EXPIRED_MESSAGE, PAGER_WRONG_USER_MESSAGE, defer_ephemeral_reply,
    edit_original_response, edit_original_response_without_components,
    respond_ephemeral_message, respond_ephemeral_with_components,
    respond_update_without_components, send_chunks,
};
use mhbot_utils::split::{MAX_MESSAGE_LENGTH, SplitOptions, split_message};

pub const COMMAND_NAME: &str = "find-mouse";
pub const MOUSE_OPTION: &str = "mouse";
pub const FILTER_OPTION: &str = "filter";

/// Room left for the pager fence inside one message.
pub const PAGE_LENGTH: usize = MAX_MESSAGE_LENGTH - 8;
const PAGE_FENCE_OPEN: &str = "```\n";
const PAGE_FENCE_CLOSE: &str = "\n```";

const SHARED_MESSAGE: &str = "Shared";
const SHARE_FAILED_MESSAGE: &str = "I couldn't post that to the channel.";
const LAST_PAGE_MESSAGE: &str = "There are no more results.";
const NOT_STARTED_MESSAGE: &str = "These results are still loading. Try again in a moment.";
const LOOKUP_FAILED_MESSAGE: &str = "I couldn't reach MHCT just now. Try again in a moment.";

pub fn command() -> anyhow::Result<Command> {
    let command = CommandBuilder::new(
        COMMAND_NAME,
        "Get the attraction rates for a mouse",
        CommandType::ChatInput,
    )
    .contexts([
        InteractionContextType::Guild,
        InteractionContextType::BotDm,
        InteractionContextType::PrivateChannel,
    ])
    .option(
        StringBuilder::new(MOUSE_OPTION, "The mouse to look up")
            .required(true)
            .autocomplete(true),
    )
    .option(
        StringBuilder::new(FILTER_OPTION, "The specific power type to look up (Default: all)")
            .autocomplete(true),
    )
    .validate()?
    .build();

    Ok(command)
}

pub(crate) fn string_option(data: &CommandData, name: &str) -> Option<String> {
    data.options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            CommandOptionValue::String(value) => Some(value.clone()),
            _ => None,
        })
}

/// Format a match in full and split it into pager pages. The reply is
/// ephemeral, so it gets every row rather than the top ones.
pub async fn render_pages(
    lookup: &dyn Lookup,
    found: &SearchMatch,
    filter: Option<String>,
) -> Result<Vec<String>, LookupError> {
    let options = FormatOptions {
        timefilter: filter,
        full: true,
    };
    let text = lookup.format(found, &options).await?;
    Ok(paginate(&text))
}

/// What a pager button press answers with.
#[derive(Clone, Debug, PartialEq)]
pub enum PagerReply {
    /// Ephemeral notice; the session is unchanged.
    Notice(&'static str),
    /// A new ephemeral page. Its token becomes a surface of the session.
    FollowUp {
        content: String,
        components: Vec<Component>,
    },
    /// Post to the channel, then mark the pressed message as shared.
    Share { messages: Vec<String> },
}

pub fn pager_reply(key: SessionKey, result: Result<PagerOutcome, PagerRejection>) -> PagerReply {
    match result {
        Ok(PagerOutcome::Page {
            content, controls, ..
        }) => PagerReply::FollowUp {
            content,
            components: build_pager_components(key, controls),
        },
        Ok(PagerOutcome::Share { messages }) => PagerReply::Share { messages },
        Err(PagerRejection::WrongUser) => PagerReply::Notice(PAGER_WRONG_USER_MESSAGE),
        Err(PagerRejection::Expired) => PagerReply::Notice(PAGER_EXPIRED_MESSAGE),
        Err(PagerRejection::NotStarted) => PagerReply::Notice(NOT_STARTED_MESSAGE),
        Err(PagerRejection::LastPage) => PagerReply::Notice(LAST_PAGE_MESSAGE),
    }
}

/// Split formatted text into fenced pager pages.
pub fn paginate(text: &str) -> Vec<String> {
    split_message(
        text,
        &SplitOptions {
            max_length: PAGE_LENGTH,
            prepend: PAGE_FENCE_OPEN,
            append: PAGE_FENCE_CLOSE,
        },
    )
}

pub async fn run(ctx: Context, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(InteractionData::ApplicationCommand(data)) = interaction.data.as_ref() else {
        return Ok(());
    };

    let Some(mouse) = string_option(data, MOUSE_OPTION) else {
        error!("FIND-MOUSE: called without a mouse option");
        respond_ephemeral_message(http, &interaction, "Tell me which mouse to look up.").await?;
        return Ok(());
    };
    let filter = string_option(data, FILTER_OPTION);

    let Some(actor_id) = interaction.author_id() else {
        respond_ephemeral_message(http, &interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(());
    };

    let matches = match ctx.lookup.search(Domain::Mouse, &mouse).await {
        Ok(matches) => matches,
        Err(source) => {
            error!(?source, %mouse, "FIND-MOUSE: search failed");
            respond_ephemeral_message(http, &interaction, LOOKUP_FAILED_MESSAGE).await?;
            return Ok(());
        }
    };

    let Some(found) = matches.into_iter().next() else {
        respond_ephemeral_message(http, &interaction, &not_found_reply(&mouse)).await?;
        return Ok(());
    };

    // Fetching rows can outlast the initial response window.
    defer_ephemeral_reply(http, &interaction).await?;

    let pages = match render_pages(ctx.lookup.as_ref(), &found, filter).await {
        Ok(pages) => pages,
        Err(source) => {
            error!(?source, mouse = %found.name, "FIND-MOUSE: format failed");
            edit_original_response(http, &interaction, LOOKUP_FAILED_MESSAGE, &[]).await?;
            return Ok(());
        }
    };

    let key = SessionKey {
        interaction_id: interaction.id.get(),
        user_id: actor_id.get(),
    };
    let total = pages.len();

    let expiry_http = Arc::clone(&ctx.http);
    let application_id = interaction.application_id;
    let original_token = interaction.token.clone();
    let on_expire = move |mut session: PagerSession| async move {
        let first_page = session.expire();
        if let Err(source) = edit_original_response_without_components(
            &expiry_http,
            application_id,
            &original_token,
            Some(&first_page),
        )
        .await
        {
            warn!(?source, "FIND-MOUSE: failed to finalize expired reply");
        }

        for surface in session.surfaces() {
            if let Err(source) =
                edit_original_response_without_components(&expiry_http, application_id, surface, None)
                    .await
            {
                warn!(?source, "FIND-MOUSE: failed to clear follow-up controls");
            }
        }
    };

    let outcome = ctx
        .pagers
        .open(key, COMMAND_NAME, &mouse, pages, on_expire)
        .await?;

    if let PagerOutcome::Page {
        content, controls, ..
    } = outcome
    {
        let components = build_pager_components(key, controls);
        edit_original_response(http, &interaction, &content, &components).await?;
        info!(mouse = %found.name, pages = total, "FIND-MOUSE: pager opened");
    }

    Ok(())
}

/// Handle `fm:more:` and `fm:share:` presses.
pub async fn handle_pager_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<bool> {
    let http = &ctx.http;
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(false);
    };
    let Some(token) = parse_custom_id(&data.custom_id) else {
        return Ok(false);
    };

    let Some(actor_id) = interaction.author_id() else {
        respond_ephemeral_message(http, &interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(true);
    };

    let result = ctx
        .pagers
        .apply(token.key, actor_id.get(), token.action)
        .await;

    match pager_reply(token.key, result) {
        PagerReply::Notice(notice) => {
            respond_ephemeral_message(http, &interaction, notice).await?;
        }
        PagerReply::FollowUp {
            content,
            components,
        } => {
            respond_ephemeral_with_components(http, &interaction, &content, components).await?;
            ctx.pagers.add_surface(token.key, &interaction.token).await;
        }
        PagerReply::Share { messages } => {
            let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
                respond_ephemeral_message(http, &interaction, SHARE_FAILED_MESSAGE).await?;
                return Ok(true);
            };

            if let Err(source) = send_chunks(http, channel_id, &messages).await {
                error!(
                    ?source,
                    channel_id = channel_id.get(),
                    "FIND-MOUSE: failed to share results"
                );
                respond_ephemeral_message(http, &interaction, SHARE_FAILED_MESSAGE).await?;
                return Ok(true);
            }

            respond_update_without_components(http, &interaction, SHARED_MESSAGE).await?;
        }
    }

    Ok(true)
}
