/// Application-owned channel kinds and the direct-message predicate.
pub mod channel;
/// Interactive result pager: state machine, session registry, buttons.
pub mod pager;
/// Shared interaction response helpers.
pub mod respond;
/// Message chunking with fence wrapping.
pub mod split;
