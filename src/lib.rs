//! Terminal front end for the Hacky News backend: category listings,
//! search with autocomplete, a stats panel and a manual sync trigger.

pub mod api;
pub mod config;
pub mod internal;
pub mod tui;
pub mod utils;
