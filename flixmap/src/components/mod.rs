pub mod banner;
pub mod details_page;
pub mod headline;
pub mod results_page;
pub mod search_page;
pub mod world_map_view;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use banner::{Banner, BannerKind, BannerProps};
pub use details_page::{title_key, DetailsPage, DetailsPageProps, NOT_AVAILABLE_MESSAGE};
pub use headline::{Headline, HeadlineProps, HEADLINE_TEXT};
pub use results_page::{grid_columns, ResultsPage, ResultsPageProps};
pub use search_page::{SearchPage, SearchPageProps, SEARCH_PLACEHOLDER};
pub use world_map_view::{world_atlas, WorldMapProps, WorldMapView};
