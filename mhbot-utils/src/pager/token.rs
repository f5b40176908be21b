//! Custom ID encoding for pager buttons.

use super::session::{PagerAction, SessionKey};

/// Prefix shared by every pager button custom ID.
pub const TOKEN_PREFIX: &str = "fm";

/// Parsed pager button custom ID.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PagerToken {
    pub action: PagerAction,
    pub key: SessionKey,
}

fn action_segment(action: PagerAction) -> &'static str {
    match action {
        PagerAction::More => "more",
        PagerAction::Share => "share",
    }
}

/// Build `fm:<action>:<interaction_id>:<owner_id>`.
pub fn build_custom_id(action: PagerAction, key: SessionKey) -> String {
    format!(
        "{TOKEN_PREFIX}:{}:{}:{}",
        action_segment(action),
        key.interaction_id,
        key.user_id
    )
}

/// Parse a pager custom ID. Returns `None` for anything else.
pub fn parse_custom_id(custom_id: &str) -> Option<PagerToken> {
    let mut parts = custom_id.split(':');

    if parts.next()? != TOKEN_PREFIX {
        return None;
    }

    let action = match parts.next()? {
        "more" => PagerAction::More,
        "share" => PagerAction::Share,
        _ => return None,
    };
    let interaction_id = parts.next()?.parse::<u64>().ok()?;
    let user_id = parts.next()?.parse::<u64>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(PagerToken {
        action,
        key: SessionKey {
            interaction_id,
            user_id,
        },
    })
}
