use thiserror::Error;

use crate::Domain;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid base url {0:?}")]
    BaseUrl(String),

    #[error("no {domain} with id {id}")]
    UnknownEntity { domain: Domain, id: u64 },

    #[error("failed to read nicknames from {path}: {source}")]
    NicknamesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse nicknames: {0}")]
    NicknamesParse(#[from] serde_json::Error),
}
