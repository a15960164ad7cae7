//! Demo application: a storefront page driven by the scroll engine.

pub mod event;
pub mod handler;
pub mod page;
pub mod state;
