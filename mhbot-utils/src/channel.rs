//! Application-owned channel kinds and the direct-message predicate.

use std::str::FromStr;

use thiserror::Error;
use twilight_model::channel::ChannelType;

/// Channel kinds keyed by the platform's numeric type code.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
    Unknown(u8),
}

impl ChannelKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ChannelKind::GuildText,
            1 => ChannelKind::Dm,
            2 => ChannelKind::GuildVoice,
            3 => ChannelKind::GroupDm,
            4 => ChannelKind::GuildCategory,
            5 => ChannelKind::GuildAnnouncement,
            10 => ChannelKind::AnnouncementThread,
            11 => ChannelKind::PublicThread,
            12 => ChannelKind::PrivateThread,
            13 => ChannelKind::GuildStageVoice,
            14 => ChannelKind::GuildDirectory,
            15 => ChannelKind::GuildForum,
            16 => ChannelKind::GuildMedia,
            other => ChannelKind::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ChannelKind::GuildText => 0,
            ChannelKind::Dm => 1,
            ChannelKind::GuildVoice => 2,
            ChannelKind::GroupDm => 3,
            ChannelKind::GuildCategory => 4,
            ChannelKind::GuildAnnouncement => 5,
            ChannelKind::AnnouncementThread => 10,
            ChannelKind::PublicThread => 11,
            ChannelKind::PrivateThread => 12,
            ChannelKind::GuildStageVoice => 13,
            ChannelKind::GuildDirectory => 14,
            ChannelKind::GuildForum => 15,
            ChannelKind::GuildMedia => 16,
            ChannelKind::Unknown(code) => code,
        }
    }
}

impl From<ChannelType> for ChannelKind {
    fn from(kind: ChannelType) -> Self {
        ChannelKind::from_code(u8::from(kind))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelKindError {
    #[error("invalid channel type {0:?}: expected a numeric type code")]
    NotNumeric(String),
}

/// Decode a raw type tag. Anything other than a numeric code is a caller bug.
impl FromStr for ChannelKind {
    type Err = ChannelKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u8>()
            .map(ChannelKind::from_code)
            .map_err(|_| ChannelKindError::NotNumeric(raw.to_owned()))
    }
}

/// Which channels count as direct messages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DmScope {
    /// One-on-one DMs only.
    Strict,
    /// DMs and group DMs.
    #[default]
    Inclusive,
}

/// Whether `kind` is a direct-message channel under `scope`.
pub fn is_dm_channel(kind: ChannelKind, scope: DmScope) -> bool {
    match scope {
        DmScope::Strict => kind == ChannelKind::Dm,
        DmScope::Inclusive => matches!(kind, ChannelKind::Dm | ChannelKind::GroupDm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dm_is_direct_in_both_scopes() {
        let kind = ChannelKind::from_code(1);
        assert!(is_dm_channel(kind, DmScope::Strict));
        assert!(is_dm_channel(kind, DmScope::Inclusive));
    }

    #[test]
    fn group_dm_is_direct_only_when_inclusive() {
        let kind = ChannelKind::from_code(3);
        assert!(!is_dm_channel(kind, DmScope::Strict));
        assert!(is_dm_channel(kind, DmScope::Inclusive));
    }

    #[test]
    fn guild_channels_are_never_direct() {
        for code in [0, 2, 5, 11, 15] {
            let kind = ChannelKind::from_code(code);
            assert!(!is_dm_channel(kind, DmScope::Strict));
            assert!(!is_dm_channel(kind, DmScope::Inclusive));
        }
    }

    #[test]
    fn non_numeric_tag_fails() {
        assert_eq!(
            "DM".parse::<ChannelKind>(),
            Err(ChannelKindError::NotNumeric("DM".to_owned()))
        );
        assert_eq!("1".parse::<ChannelKind>(), Ok(ChannelKind::Dm));
    }

    #[test]
    fn codes_round_trip() {
        for code in 0..=20 {
            assert_eq!(ChannelKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn converts_from_twilight_types() {
        assert_eq!(ChannelKind::from(ChannelType::Private), ChannelKind::Dm);
        assert_eq!(ChannelKind::from(ChannelType::Group), ChannelKind::GroupDm);
        assert_eq!(
            ChannelKind::from(ChannelType::GuildText),
            ChannelKind::GuildText
        );
    }
}
