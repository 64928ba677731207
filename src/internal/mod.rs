pub mod autocomplete;
pub mod categories;
pub mod chart;
pub mod models;
pub mod notification;
pub mod preferences;
pub mod render;
pub mod request;
pub mod state;
pub mod stats;
pub mod ui;
pub mod update;
