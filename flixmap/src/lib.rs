//! Where can I watch this? Search titles and see which countries' Netflix
//! catalogs carry them on a terminal world map.
//!
//! The library exposes the app's modules for the binary and for tests.

pub mod action;
pub mod api;
pub mod catalog;
pub mod components;
pub mod effect;
pub mod logging;
pub mod nav;
pub mod reducer;
pub mod state;
pub mod theme;
