//! Scroll coordination and sticky positioning.
//!
//! The [`core`] module is the engine: a frame-coalescing scroll dispatcher
//! ([`core::coordinator::ScrollCoordinator`]) and the sticky element phase
//! machine it drives ([`core::sticky::StickyManager`]).  It has no
//! rendering dependency and is driven by its host with explicit timestamps.
//!
//! [`app`], [`ui`] and [`config`] make up the terminal storefront demo that
//! ships as the `sticky-scroll` binary.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
