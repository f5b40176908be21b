use reqwest::Url;

use crate::{Domain, SearchMatch};

pub const ATTRACTIONS_URI: &str = "https://www.mhct.win/attractions.php";
pub const LOOT_URI: &str = "https://www.mhct.win/loot.php";

/// Where a search result can be browsed on MHCT.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkInfo {
    pub uri: &'static str,
    pub kind: &'static str,
    pub params: Vec<(String, String)>,
}

impl LinkInfo {
    pub fn for_domain(domain: Domain, timefilter: Option<&str>) -> Self {
        let (uri, kind) = match domain {
            Domain::Mouse => (ATTRACTIONS_URI, "mouse"),
            Domain::Item => (LOOT_URI, "item"),
        };

        let params = timefilter
            .map(|filter| vec![("timefilter".to_owned(), filter.to_owned())])
            .unwrap_or_default();

        Self { uri, kind, params }
    }

    /// Deep link for one match, wrapped in `<>` so the chat client skips the preview.
    pub fn render(&self, found: &SearchMatch) -> Option<String> {
        let id = found.id.to_string();
        let mut pairs: Vec<(&str, &str)> = vec![(self.kind, id.as_str())];
        pairs.extend(
            self.params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );

        let url = Url::parse_with_params(self.uri, &pairs).ok()?;
        Some(format!("<{url}>"))
    }
}
