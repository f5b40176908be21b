//! Lookup seam for MHCT creature and item data.
//!
//! Command handlers only talk to the [`Lookup`] trait. [`MhctLookup`] backs it
//! with the public MHCT site; tests plug in their own implementations.

use std::fmt;

use async_trait::async_trait;

/// Ranked in-memory catalog search.
pub mod catalog;
/// Typed lookup failures.
pub mod error;
/// Event filter metadata and token extraction.
pub mod filters;
/// Fixed-width text rendering of attraction and drop rows.
pub mod format;
/// Deep links back to the MHCT site.
pub mod link;
/// HTTP-backed lookup against the MHCT site.
pub mod mhct;
/// Nickname tables mapping short names to catalog names.
pub mod nicknames;

pub use catalog::{Catalog, Entity};
pub use error::LookupError;
pub use filters::{CURRENT_FILTER_TOKEN, DEFAULT_TIMEFILTER, Filter, extract_filter};
pub use link::LinkInfo;
pub use mhct::MhctLookup;
pub use nicknames::Nicknames;

/// Category of entity being searched.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Domain {
    Mouse,
    Item,
}

impl Domain {
    /// Short tag used in component custom IDs.
    pub fn tag(self) -> &'static str {
        match self {
            Domain::Mouse => "m",
            Domain::Item => "i",
        }
    }

    /// Inverse of [`Domain::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "m" => Some(Domain::Mouse),
            "i" => Some(Domain::Item),
            _ => None,
        }
    }

    /// The `item_type` value the MHCT endpoints expect.
    pub fn item_type(self) -> &'static str {
        match self {
            Domain::Mouse => "mouse",
            Domain::Item => "loot",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Mouse => f.write_str("mouse"),
            Domain::Item => f.write_str("item"),
        }
    }
}

/// One ranked search hit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchMatch {
    pub id: u64,
    pub name: String,
    pub domain: Domain,
}

/// Options controlling how a match is rendered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormatOptions {
    /// MHCT time filter code; `None` means all time.
    pub timefilter: Option<String>,
    /// Render every row instead of the top rows only.
    pub full: bool,
}

impl FormatOptions {
    pub fn timefilter_or_default(&self) -> &str {
        self.timefilter.as_deref().unwrap_or(DEFAULT_TIMEFILTER)
    }
}

/// Search and formatting backend used by the command layer.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Ranked matches for `query` within `domain`. Empty when nothing matches.
    async fn search(&self, domain: Domain, query: &str) -> Result<Vec<SearchMatch>, LookupError>;

    /// Render a single match as display text.
    async fn format(
        &self,
        found: &SearchMatch,
        options: &FormatOptions,
    ) -> Result<String, LookupError>;

    /// Every known event filter, oldest first.
    fn filters(&self) -> Vec<Filter>;

    /// Filters whose code name contains `partial`.
    fn filters_matching(&self, partial: &str) -> Vec<Filter> {
        let needle = partial.trim().to_lowercase();
        self.filters()
            .into_iter()
            .filter(|filter| filter.code_name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_tags_round_trip() {
        for domain in [Domain::Mouse, Domain::Item] {
            assert_eq!(Domain::from_tag(domain.tag()), Some(domain));
        }
        assert_eq!(Domain::from_tag("x"), None);
    }

    #[test]
    fn default_timefilter_is_all_time() {
        let options = FormatOptions::default();
        assert_eq!(options.timefilter_or_default(), "all_time");
    }
}
