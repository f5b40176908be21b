use std::collections::HashMap;

use serde::Deserialize;

use crate::{Domain, SearchMatch};

/// A searchable catalog entry as served by MHCT's `item_id=all` listing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Entity {
    pub id: u64,
    /// Display name.
    pub value: String,
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Rank {
    Exact,
    Prefix,
    Contains,
}

/// Case-insensitive catalog with optional nicknames.
#[derive(Clone, Debug)]
pub struct Catalog {
    domain: Domain,
    entities: Vec<Entity>,
    lowered: Vec<String>,
    nicknames: HashMap<String, String>,
}

impl Catalog {
    pub fn new(domain: Domain, entities: Vec<Entity>) -> Self {
        let lowered = entities
            .iter()
            .map(|entity| entity.value.to_lowercase())
            .collect();

        Self {
            domain,
            entities,
            lowered,
            nicknames: HashMap::new(),
        }
    }

    /// Attach a nickname table (`nickname -> canonical name`).
    pub fn with_nicknames(mut self, nicknames: &HashMap<String, String>) -> Self {
        self.nicknames = nicknames
            .iter()
            .map(|(nick, name)| (nick.to_lowercase(), name.to_lowercase()))
            .collect();
        self
    }

    pub fn get(&self, id: u64) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Rank entries against `query`: exact names (or nickname targets) first,
    /// then prefix matches, then substring matches, ties ordered by name.
    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let nickname_target = self.nicknames.get(&needle);

        let mut ranked: Vec<(Rank, usize)> = self
            .lowered
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let rank = if *name == needle || nickname_target == Some(name) {
                    Rank::Exact
                } else if name.starts_with(&needle) {
                    Rank::Prefix
                } else if name.contains(&needle) {
                    Rank::Contains
                } else {
                    return None;
                };
                Some((rank, index))
            })
            .collect();

        ranked.sort_by(|(left_rank, left), (right_rank, right)| {
            left_rank
                .cmp(right_rank)
                .then_with(|| self.lowered[*left].cmp(&self.lowered[*right]))
        });

        ranked
            .into_iter()
            .map(|(_, index)| {
                let entity = &self.entities[index];
                SearchMatch {
                    id: entity.id,
                    name: entity.value.clone(),
                    domain: self.domain,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            Domain::Mouse,
            vec![
                Entity {
                    id: 1,
                    value: "Black Widow".to_owned(),
                },
                Entity {
                    id: 2,
                    value: "Widow".to_owned(),
                },
                Entity {
                    id: 3,
                    value: "Widower".to_owned(),
                },
                Entity {
                    id: 4,
                    value: "Gold".to_owned(),
                },
            ],
        )
    }

    fn names(matches: &[SearchMatch]) -> Vec<&str> {
        matches.iter().map(|found| found.name.as_str()).collect()
    }

    #[test]
    fn exact_then_prefix_then_contains() {
        let matches = catalog().search("widow");
        assert_eq!(names(&matches), vec!["Widow", "Widower", "Black Widow"]);
        assert!(matches.iter().all(|found| found.domain == Domain::Mouse));
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let matches = catalog().search("  GOLD ");
        assert_eq!(names(&matches), vec!["Gold"]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(catalog().search("   ").is_empty());
    }

    #[test]
    fn nickname_resolves_to_exact_match() {
        let nicknames = HashMap::from([("bw".to_owned(), "Black Widow".to_owned())]);
        let matches = catalog().with_nicknames(&nicknames).search("BW");
        assert_eq!(names(&matches), vec!["Black Widow"]);
    }

    #[test]
    fn unknown_query_is_empty() {
        assert!(catalog().search("dragon").is_empty());
    }
}
