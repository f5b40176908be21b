use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::format::{LootRow, MouseRow, render_loot_rows, render_mouse_rows};
use crate::{
    Catalog, Domain, Entity, Filter, FormatOptions, Lookup, LookupError, Nicknames, SearchMatch,
};

pub const DEFAULT_BASE_URL: &str = "https://www.mhct.win/";

const SEARCH_PATH: &str = "searchByItem.php";
const FILTERS_PATH: &str = "filters.php";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// [`Lookup`] backed by the MHCT site.
///
/// Creature, item and filter catalogs are fetched once by [`MhctLookup::initialize`];
/// searches run against those in memory and only [`Lookup::format`] goes back
/// over the network.
pub struct MhctLookup {
    client: Client,
    base_url: Url,
    mice: Catalog,
    loot: Catalog,
    filters: Vec<Filter>,
}

impl MhctLookup {
    pub async fn initialize(base_url: &str, nicknames: &Nicknames) -> Result<Self, LookupError> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| LookupError::Http {
                url: base_url.to_string(),
                source,
            })?;

        let mut lookup = Self {
            client,
            base_url,
            mice: Catalog::new(Domain::Mouse, Vec::new()),
            loot: Catalog::new(Domain::Item, Vec::new()),
            filters: Vec::new(),
        };

        let (mice, loot, filters) = tokio::try_join!(
            lookup.fetch_catalog(Domain::Mouse),
            lookup.fetch_catalog(Domain::Item),
            lookup.fetch_filters(),
        )?;

        info!(
            mice = mice.len(),
            loot = loot.len(),
            filters = filters.len(),
            "MHCT catalogs loaded"
        );

        lookup.mice =
            Catalog::new(Domain::Mouse, mice).with_nicknames(nicknames.for_domain(Domain::Mouse));
        lookup.loot =
            Catalog::new(Domain::Item, loot).with_nicknames(nicknames.for_domain(Domain::Item));
        lookup.filters = filters;

        Ok(lookup)
    }

    fn catalog(&self, domain: Domain) -> &Catalog {
        match domain {
            Domain::Mouse => &self.mice,
            Domain::Item => &self.loot,
        }
    }

    async fn fetch_catalog(&self, domain: Domain) -> Result<Vec<Entity>, LookupError> {
        self.get_json(
            SEARCH_PATH,
            &[("item_type", domain.item_type()), ("item_id", "all")],
        )
        .await
    }

    async fn fetch_filters(&self) -> Result<Vec<Filter>, LookupError> {
        self.get_json(FILTERS_PATH, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| LookupError::BaseUrl(self.base_url.to_string()))?;
        let url_text = url.to_string();

        debug!(url = %url_text, ?query, "MHCT request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| LookupError::Http {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url_text,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| LookupError::Http {
                url: url_text,
                source,
            })
    }
}

#[async_trait]
impl Lookup for MhctLookup {
    async fn search(&self, domain: Domain, query: &str) -> Result<Vec<SearchMatch>, LookupError> {
        Ok(self.catalog(domain).search(query))
    }

    async fn format(
        &self,
        found: &SearchMatch,
        options: &FormatOptions,
    ) -> Result<String, LookupError> {
        let entity = self
            .catalog(found.domain)
            .get(found.id)
            .ok_or(LookupError::UnknownEntity {
                domain: found.domain,
                id: found.id,
            })?;

        let timefilter = options.timefilter_or_default();
        let item_id = entity.id.to_string();
        let query = [
            ("item_type", found.domain.item_type()),
            ("item_id", item_id.as_str()),
            ("timefilter", timefilter),
        ];

        let text = match found.domain {
            Domain::Mouse => {
                let rows: Vec<MouseRow> = self.get_json(SEARCH_PATH, &query).await?;
                render_mouse_rows(&entity.value, timefilter, &rows, options.full)
            }
            Domain::Item => {
                let rows: Vec<LootRow> = self.get_json(SEARCH_PATH, &query).await?;
                render_loot_rows(&entity.value, timefilter, &rows, options.full)
            }
        };

        Ok(text)
    }

    fn filters(&self) -> Vec<Filter> {
        self.filters.clone()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, LookupError> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|_| LookupError::BaseUrl(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;

    async fn mock_catalogs(server: &mut ServerGuard) -> Vec<mockito::Mock> {
        let mice = server
            .mock("GET", "/searchByItem.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("item_type".into(), "mouse".into()),
                Matcher::UrlEncoded("item_id".into(), "all".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"value":"White"},{"id":2,"value":"Black Widow"}]"#)
            .create_async()
            .await;

        let loot = server
            .mock("GET", "/searchByItem.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("item_type".into(), "loot".into()),
                Matcher::UrlEncoded("item_id".into(), "all".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":10,"value":"Gold"}]"#)
            .create_async()
            .await;

        let filters = server
            .mock("GET", "/filters.php")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"code_name":"all_time","display_name":"All Time"},{"code_name":"1_month","display_name":"Last Month"}]"#)
            .create_async()
            .await;

        vec![mice, loot, filters]
    }

    #[tokio::test]
    async fn initialize_loads_catalogs_and_searches() {
        let mut server = Server::new_async().await;
        let _mocks = mock_catalogs(&mut server).await;

        let lookup = MhctLookup::initialize(&server.url(), &Nicknames::default())
            .await
            .unwrap();

        let mice = lookup.search(Domain::Mouse, "widow").await.unwrap();
        assert_eq!(mice.len(), 1);
        assert_eq!(mice[0].id, 2);

        let loot = lookup.search(Domain::Item, "gold").await.unwrap();
        assert_eq!(loot[0].domain, Domain::Item);

        assert_eq!(lookup.filters().len(), 2);
        assert_eq!(lookup.filters_matching("MONTH")[0].code_name, "1_month");
    }

    #[tokio::test]
    async fn format_fetches_rows_with_timefilter() {
        let mut server = Server::new_async().await;
        let _mocks = mock_catalogs(&mut server).await;
        let rows = server
            .mock("GET", "/searchByItem.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("item_type".into(), "mouse".into()),
                Matcher::UrlEncoded("item_id".into(), "1".into()),
                Matcher::UrlEncoded("timefilter".into(), "1_month".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"location":"Meadow","stage":null,"cheese":"Cheddar","rate":"2500","total_hunts":"40"}]"#)
            .expect(1)
            .create_async()
            .await;

        let lookup = MhctLookup::initialize(&server.url(), &Nicknames::default())
            .await
            .unwrap();
        let found = SearchMatch {
            id: 1,
            name: "White".to_owned(),
            domain: Domain::Mouse,
        };
        let options = FormatOptions {
            timefilter: Some("1_month".to_owned()),
            full: true,
        };

        let text = lookup.format(&found, &options).await.unwrap();
        rows.assert_async().await;
        assert!(text.starts_with("White (1_month)"));
        assert!(text.contains("25.00%"));
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = Server::new_async().await;
        let _filters = server
            .mock("GET", "/filters.php")
            .with_status(503)
            .create_async()
            .await;
        let _any = server
            .mock("GET", "/searchByItem.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = MhctLookup::initialize(&server.url(), &Nicknames::default()).await;
        assert!(matches!(
            result,
            Err(LookupError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn unknown_entity_is_rejected_without_request() {
        let mut server = Server::new_async().await;
        let _mocks = mock_catalogs(&mut server).await;
        let lookup = MhctLookup::initialize(&server.url(), &Nicknames::default())
            .await
            .unwrap();

        let ghost = SearchMatch {
            id: 999,
            name: "Ghost".to_owned(),
            domain: Domain::Mouse,
        };
        let result = lookup.format(&ghost, &FormatOptions::default()).await;
        assert!(matches!(
            result,
            Err(LookupError::UnknownEntity { id: 999, .. })
        ));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/mhct").unwrap();
        assert_eq!(
            url.join(SEARCH_PATH).unwrap().as_str(),
            "http://localhost:8080/mhct/searchByItem.php"
        );
    }
}
