//! Core engine – scroll dispatch, sticky phase machine, and geometry.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The host
//! feeds it scroll notifications, frame callbacks and timestamps; visual
//! nodes are reached only through the [`sticky::StickyNode`] adapter.

pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod phase;
pub mod sticky;
