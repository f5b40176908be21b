//! Pager button builders.

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use super::session::{PagerAction, PagerControls, SessionKey};
use super::token::build_custom_id;

pub const SHARE_LABEL: &str = "Send to Channel";
pub const MORE_LABEL: &str = "More Results";

/// Build the share/more action row for a rendered page.
pub fn build_pager_components(key: SessionKey, controls: PagerControls) -> Vec<Component> {
    let mut buttons = Vec::with_capacity(2);

    if controls.share {
        buttons.push(pager_button(key, PagerAction::Share, SHARE_LABEL));
    }
    if controls.more {
        buttons.push(pager_button(key, PagerAction::More, MORE_LABEL));
    }

    if buttons.is_empty() {
        return vec![];
    }

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}

fn pager_button(key: SessionKey, action: PagerAction, label: &str) -> Component {
    Component::Button(Button {
        id: None,
        custom_id: Some(build_custom_id(action, key)),
        disabled: false,
        emoji: None,
        label: Some(label.to_owned()),
        style: ButtonStyle::Primary,
        url: None,
        sku_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: SessionKey = SessionKey {
        interaction_id: 5,
        user_id: 6,
    };

    fn custom_ids(components: &[Component]) -> Vec<String> {
        let Some(Component::ActionRow(row)) = components.first() else {
            return vec![];
        };
        row.components
            .iter()
            .filter_map(|component| match component {
                Component::Button(button) => button.custom_id.clone(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn share_and_more() {
        let components = build_pager_components(
            KEY,
            PagerControls {
                share: true,
                more: true,
            },
        );
        assert_eq!(custom_ids(&components), vec!["fm:share:5:6", "fm:more:5:6"]);
    }

    #[test]
    fn last_page_has_share_only() {
        let components = build_pager_components(
            KEY,
            PagerControls {
                share: true,
                more: false,
            },
        );
        assert_eq!(custom_ids(&components), vec!["fm:share:5:6"]);
    }

    #[test]
    fn no_controls_no_row() {
        assert!(build_pager_components(KEY, PagerControls::default()).is_empty());
    }
}
