//! Shared interaction response helpers.

use twilight_http::Client;
use twilight_model::{
    application::command::{CommandOptionChoice, CommandOptionChoiceValue},
    channel::message::{MessageFlags, component::Component},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Most choices an autocomplete response may carry.
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

/// Shown when a pager button belongs to another user.
pub const PAGER_WRONG_USER_MESSAGE: &str = "These results belong to another user.";
/// Shown when a pager button outlived its session.
pub const PAGER_EXPIRED_MESSAGE: &str = "These results expired. Run the command again.";

async fn create_response(
    http: &Client,
    interaction: &InteractionCreate,
    response: &InteractionResponse,
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, response)
        .await?;

    Ok(())
}

/// Respond with an ephemeral text message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    respond_ephemeral_with_components(http, interaction, content, Vec::new()).await
}

/// Respond with an ephemeral message carrying interactive components.
pub async fn respond_ephemeral_with_components(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
    components: Vec<Component>,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .components(components)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Respond with the standard wrong-owner message.
pub async fn respond_wrong_user(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGER_WRONG_USER_MESSAGE).await
}

/// Replace the pressed message's content and drop its components.
pub async fn respond_update_without_components(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .components(Vec::new())
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Acknowledge a command with a private "thinking" placeholder.
pub async fn defer_ephemeral_reply(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Answer an autocomplete request with string choices (`name == value`).
pub async fn respond_autocomplete(
    http: &Client,
    interaction: &InteractionCreate,
    values: impl IntoIterator<Item = String>,
) -> anyhow::Result<()> {
    let choices = values
        .into_iter()
        .take(MAX_AUTOCOMPLETE_CHOICES)
        .map(|value| CommandOptionChoice {
            name: value.clone(),
            name_localizations: None,
            value: CommandOptionChoiceValue::String(value),
        })
        .collect::<Vec<_>>();

    let response = InteractionResponse {
        kind: InteractionResponseType::ApplicationCommandAutocompleteResult,
        data: Some(InteractionResponseDataBuilder::new().choices(choices).build()),
    };

    create_response(http, interaction, &response).await
}

/// Send an ephemeral follow-up after the interaction was already answered.
pub async fn send_ephemeral_followup(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .create_followup(&interaction.token)
        .content(content)
        .flags(MessageFlags::EPHEMERAL)
        .await?;

    Ok(())
}

/// Fill in a deferred response with content and components.
pub async fn edit_original_response(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
    components: &[Component],
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .update_response(&interaction.token)
        .content(Some(content))
        .components(Some(components))
        .await?;

    Ok(())
}

/// Edit an interaction's original response, clearing its components.
///
/// Takes the raw application ID and token so it can run after the
/// triggering event is gone (e.g. from an expiry task).
pub async fn edit_original_response_without_components(
    http: &Client,
    application_id: Id<ApplicationMarker>,
    interaction_token: &str,
    content: Option<&str>,
) -> anyhow::Result<()> {
    let empty_components: [Component; 0] = [];
    let update = http.interaction(application_id);
    let request = update
        .update_response(interaction_token)
        .components(Some(&empty_components));

    match content {
        Some(content) => request.content(Some(content)).await?,
        None => request.await?,
    };

    Ok(())
}

/// Post each chunk as its own channel message, in order.
pub async fn send_chunks(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    chunks: &[String],
) -> anyhow::Result<()> {
    for chunk in chunks {
        http.create_message(channel_id).content(chunk).await?;
    }

    Ok(())
}
