use tracing::debug;
use twilight_model::{
    application::interaction::{
        InteractionData,
        application_command::{CommandData, CommandOptionValue},
    },
    gateway::payload::incoming::InteractionCreate,
};

use super::slash::{FILTER_OPTION, MOUSE_OPTION};
use mhbot_core::Context;
use mhbot_lookup::{Domain, Lookup};
use mhbot_utils::respond::{MAX_AUTOCOMPLETE_CHOICES, respond_autocomplete};

/// Name and partial value of the option the user is typing into.
pub(crate) fn focused_option(data: &CommandData) -> Option<(&str, &str)> {
    data.options.iter().find_map(|option| match &option.value {
        CommandOptionValue::Focused(partial, _) => Some((option.name.as_str(), partial.as_str())),
        _ => None,
    })
}

/// Choice values for a focused option. Lookup failures yield no choices.
pub async fn suggestions(lookup: &dyn Lookup, option: &str, partial: &str) -> Vec<String> {
    let mut values = match option {
        MOUSE_OPTION => match lookup.search(Domain::Mouse, partial).await {
            Ok(matches) => matches.into_iter().map(|found| found.name).collect(),
            Err(source) => {
                debug!(?source, partial, "FIND-MOUSE: autocomplete search failed");
                Vec::new()
            }
        },
        FILTER_OPTION => lookup
            .filters_matching(partial)
            .into_iter()
            .map(|filter| filter.code_name)
            .collect(),
        _ => Vec::new(),
    };

    values.truncate(MAX_AUTOCOMPLETE_CHOICES);
    values
}

pub async fn run(ctx: Context, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
    let Some(InteractionData::ApplicationCommand(data)) = interaction.data.as_ref() else {
        return Ok(());
    };
    let Some((option, partial)) = focused_option(data) else {
        return Ok(());
    };

    let values = suggestions(ctx.lookup.as_ref(), option, partial).await;
    respond_autocomplete(&ctx.http, &interaction, values).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::find::tests::FakeLookup;

    #[tokio::test]
    async fn mouse_suggestions_are_ranked_names() {
        let lookup = FakeLookup::new(&["Black Widow", "Widow's Web", "White"], &[], &[]);
        let values = suggestions(&lookup, MOUSE_OPTION, "wi").await;
        assert_eq!(values, vec!["Widow's Web", "Black Widow"]);
    }

    #[tokio::test]
    async fn filter_suggestions_match_substrings() {
        let lookup = FakeLookup::new(&[], &[], &["1_month", "halloween_2024", "halloween_2025"]);
        let values = suggestions(&lookup, FILTER_OPTION, "HALLOWEEN").await;
        assert_eq!(values, vec!["halloween_2024", "halloween_2025"]);
    }

    #[tokio::test]
    async fn suggestions_are_capped() {
        let names: Vec<String> = (0..40).map(|n| format!("Mouse {n:02}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let lookup = FakeLookup::new(&names, &[], &[]);

        let values = suggestions(&lookup, MOUSE_OPTION, "mouse").await;
        assert_eq!(values.len(), MAX_AUTOCOMPLETE_CHOICES);
    }

    #[tokio::test]
    async fn unknown_option_has_no_choices() {
        let lookup = FakeLookup::new(&["White"], &[], &[]);
        assert!(suggestions(&lookup, "other", "w").await.is_empty());
    }
}
