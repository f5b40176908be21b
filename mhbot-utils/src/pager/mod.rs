//! Stable facade for the interactive result pager.

/// Default lifetime of a pager session.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

mod components;
pub mod registry;
pub mod session;
pub mod token;

pub use components::{MORE_LABEL, SHARE_LABEL, build_pager_components};
pub use registry::PagerRegistry;
pub use session::{
    PagerAction, PagerControls, PagerOutcome, PagerRejection, PagerSession, PagerState, SessionKey,
};
pub use token::{PagerToken, build_custom_id, parse_custom_id};
