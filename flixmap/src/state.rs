//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tui_dispatch::DataResource;

use crate::nav::{Navigator, PageKind};

/// Kind of title as reported by the backend. `tv` is what the TMDB-backed
/// server emits and must be sent back unchanged to the countries endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Tv,
}

impl MediaType {
    pub fn is_series(self) -> bool {
        !matches!(self, MediaType::Movie)
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Series | MediaType::Tv => "TV Series",
        }
    }

    /// Path token for the countries endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Tv => "tv",
        }
    }
}

/// A search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TitleSummary {
    #[serde(deserialize_with = "string_or_number")]
    #[schemars(with = "String")]
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_year")]
    #[schemars(with = "Option<u16>")]
    pub year: Option<u16>,
    #[serde(default)]
    pub poster: Option<String>,
    /// 0-10; absent and 0 both mean "no rating"
    #[serde(default)]
    pub rating: Option<f32>,
}

impl TitleSummary {
    pub fn has_poster(&self) -> bool {
        self.poster.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// Sort key: absent or non-finite ratings count as 0.
    pub fn rating_score(&self) -> f32 {
        match self.rating {
            Some(r) if r.is_finite() => r,
            _ => 0.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(text) => text,
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Int(i64),
    Text(String),
}

fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    let raw: Option<YearRepr> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(YearRepr::Int(n)) => u16::try_from(n).ok().filter(|y| *y > 0),
        Some(YearRepr::Text(text)) => text.trim().parse::<u16>().ok().filter(|y| *y > 0),
        None => None,
    })
}

/// An in-flight title search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    pub id: u64,
    pub query: String,
    /// Page the search was started from
    pub origin: PageKind,
}

/// An in-flight availability lookup, keyed to the title it was issued for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CountriesRequest {
    pub id: u64,
    pub title_id: String,
    pub media_type: MediaType,
}

/// Body of `GET /health`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub api_key_configured: bool,
}

/// Animation timing for the headline gradient and spinners.
pub const LOADING_ANIM_TICK_MS: u64 = 80;
pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Number of placeholder cards while results refresh.
pub const SKELETON_CARDS: usize = 6;

#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Navigation", label = "Page", debug_fmt)]
    pub nav: Navigator,

    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    #[debug(section = "Search", label = "Error", debug_fmt)]
    pub search_error: Option<String>,

    #[debug(section = "Search", label = "Pending", debug_fmt)]
    pub pending_search: Option<SearchRequest>,

    /// Query that produced the current results
    #[debug(section = "Results", label = "Query")]
    pub last_query: String,

    #[debug(section = "Results", label = "Cursor")]
    pub results_cursor: usize,

    #[debug(section = "Details", label = "Request", debug_fmt)]
    pub countries_request: Option<CountriesRequest>,

    #[debug(section = "Details", label = "Countries", debug_fmt)]
    pub countries: DataResource<Vec<String>>,

    #[debug(section = "Backend", label = "API base")]
    pub api_base: String,

    #[debug(section = "Backend", label = "Health", debug_fmt)]
    pub backend: DataResource<BackendHealth>,

    /// Submit `search_query` once on startup
    #[debug(skip)]
    pub submit_on_start: bool,

    #[debug(skip)]
    pub next_request_id: u64,

    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            nav: Navigator::new(),
            search_query: String::new(),
            search_error: None,
            pending_search: None,
            last_query: String::new(),
            results_cursor: 0,
            countries_request: None,
            countries: DataResource::Empty,
            api_base: api_base.into(),
            backend: DataResource::Empty,
            submit_on_start: false,
            next_request_id: 0,
            tick_count: 0,
        }
    }

    pub fn page(&self) -> PageKind {
        self.nav.kind()
    }

    /// A search started from the search page is in flight.
    pub fn search_loading(&self) -> bool {
        self.pending_search
            .as_ref()
            .is_some_and(|req| req.origin == PageKind::Search)
    }

    /// A refresh started from the results page is in flight.
    pub fn results_loading(&self) -> bool {
        self.pending_search
            .as_ref()
            .is_some_and(|req| req.origin == PageKind::Results)
    }

    pub fn loading_anim_active(&self) -> bool {
        self.pending_search.is_some() || self.countries.is_loading() || self.backend.is_loading()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.tick_count as usize % SPINNER_FRAMES.len()]
    }

    pub fn alloc_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.next_request_id
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::api::DEV_API_BASE)
    }
}
