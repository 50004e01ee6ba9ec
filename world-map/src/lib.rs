//! Coarse political world map for the terminal: land-mask parsing, country
//! regions, pan/zoom view state and a ratatui renderer with hit-testing.

pub mod atlas;
pub mod core;
pub mod highlight;
pub mod parse;
pub mod prelude;
pub mod view;

#[cfg(feature = "ratatui")]
pub mod render;
