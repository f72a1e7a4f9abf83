//! Weatherdash library
//!
//! Terminal weather dashboard: place search, current conditions, air quality,
//! forecast and a clickable world map. The binary in `main.rs` drives the
//! terminal; everything else lives here so integration tests can reach it.

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod events;
pub mod format;
pub mod logging;
pub mod map;
pub mod pipeline;
pub mod search;
pub mod ui;
pub mod view;
