use std::sync::Arc;

use twilight_http::Client;

use mhbot_lookup::Lookup;
use mhbot_utils::pager::PagerRegistry;

/// Environment-driven runtime settings.
pub mod config;

pub use config::Config;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub lookup: Arc<dyn Lookup>,
    pub pagers: PagerRegistry,
    pub config: Arc<Config>,
}

impl Context {
    /// Create a new application context. The pager registry uses the
    /// configured session timeout.
    pub fn new(http: Arc<Client>, lookup: Arc<dyn Lookup>, config: Config) -> Self {
        let pagers = PagerRegistry::new(config.pager_timeout);
        Self {
            http,
            lookup,
            pagers,
            config: Arc::new(config),
        }
    }
}
