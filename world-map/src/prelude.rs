pub use crate::atlas::{Anchor, Atlas, AtlasError, GridProjection, WORLD_ANCHORS, WORLD_MASK};
pub use crate::core::{CoreError, MapRead, MapSize, RegionGrid, RegionId, Terrain};
pub use crate::highlight::HighlightSet;
pub use crate::parse::{
    parse_char_grid, LandMask, Legend, LegendBuilder, ParseError, ParseOptions, TrimMode,
};
pub use crate::view::{ViewTransform, MAX_ZOOM, MIN_ZOOM};

#[cfg(feature = "ratatui")]
pub use crate::render::{
    adjust_color, cell_seed, tile_seed, MapRenderResult, MapRenderer, MapRendererBuilder,
    MapTheme, MapThemeBuilder, RenderConfig,
};
