//! Actions - intents from the UI and results from async tasks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{BackendHealth, TitleSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: probe the backend, optionally submit a preset query
    Init,

    // ===== Health category =====
    HealthDidLoad(BackendHealth),
    HealthDidError(String),

    // ===== Search category =====
    /// Input text changed
    SearchQueryChange(String),

    /// Submit the query (ignored while a search is in flight)
    SearchSubmit(String),

    /// Empty the input and drop the error banner
    SearchClear,

    /// Result: titles found for request `request_id`
    SearchDidLoad {
        request_id: u64,
        items: Vec<TitleSummary>,
    },

    /// Result: search `request_id` failed
    SearchDidError { request_id: u64, error: String },

    // ===== Results category =====
    /// Move the card cursor (index into the ranked list)
    ResultsCursor(usize),

    /// Re-run the last query from the results page
    ResultsRefresh,

    // ===== Title category =====
    /// Open the details page for a title
    TitleSelect(TitleSummary),

    // ===== Countries category =====
    CountriesDidLoad {
        request_id: u64,
        countries: Vec<String>,
    },
    CountriesDidError { request_id: u64, error: String },

    // ===== Nav category =====
    /// Go back one page
    NavBack,

    // ===== Uncategorized (global) =====
    /// Force a re-render (hover, pan, cursor movement)
    Render,

    /// Periodic tick for spinners
    Tick,

    /// Exit the application
    Quit,
}
