use serde::Deserialize;

/// Time filter applied when the user does not name one.
pub const DEFAULT_TIMEFILTER: &str = "all_time";
/// Token that resolves to the newest known filter.
pub const CURRENT_FILTER_TOKEN: &str = "current";

/// An MHCT event/time filter.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Filter {
    pub code_name: String,
    #[serde(default)]
    pub display_name: String,
}

/// Pull the first filter-naming token out of `tokens`.
///
/// A token names a filter when it equals a filter code (case-insensitive) or
/// is `current`, which maps to the last entry of `filters`. Returns the
/// remaining tokens in order along with the filter, if any.
pub fn extract_filter(tokens: &[String], filters: &[Filter]) -> (Vec<String>, Option<Filter>) {
    let mut remaining = Vec::with_capacity(tokens.len());
    let mut found = None;

    for token in tokens {
        if found.is_none()
            && let Some(filter) = resolve_filter_token(token, filters)
        {
            found = Some(filter);
            continue;
        }
        remaining.push(token.clone());
    }

    (remaining, found)
}

fn resolve_filter_token(token: &str, filters: &[Filter]) -> Option<Filter> {
    if token.eq_ignore_ascii_case(CURRENT_FILTER_TOKEN) {
        return filters.last().cloned();
    }

    filters
        .iter()
        .find(|filter| filter.code_name.eq_ignore_ascii_case(token))
        .cloned()
}
