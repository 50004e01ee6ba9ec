//! Effects - side effects declared by the reducer, and the actions their
//! tasks complete with

use crate::action::Action;
use crate::api::ApiError;
use crate::state::{BackendHealth, CountriesRequest, TitleSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Search titles; the completion echoes `request_id`
    SearchTitles { request_id: u64, query: String },
    /// Look up availability for the selected title
    FetchCountries(CountriesRequest),
    /// Probe `GET /health`
    CheckHealth,
}

pub fn search_completion(request_id: u64, result: Result<Vec<TitleSummary>, ApiError>) -> Action {
    match result {
        Ok(items) => Action::SearchDidLoad { request_id, items },
        Err(e) => {
            tracing::info!(request_id, error = %e, "search failed");
            Action::SearchDidError {
                request_id,
                error: e.to_string(),
            }
        }
    }
}

/// An empty availability list is a normal outcome: it loads as `[]` so the
/// details page shows the not-available warning instead of an error.
pub fn countries_completion(request_id: u64, result: Result<Vec<String>, ApiError>) -> Action {
    match result {
        Ok(countries) => Action::CountriesDidLoad {
            request_id,
            countries,
        },
        Err(e) if e.is_not_found() => Action::CountriesDidLoad {
            request_id,
            countries: Vec::new(),
        },
        Err(e) => {
            tracing::info!(request_id, error = %e, "availability lookup failed");
            Action::CountriesDidError {
                request_id,
                error: e.to_string(),
            }
        }
    }
}

pub fn health_completion(result: Result<BackendHealth, ApiError>) -> Action {
    match result {
        Ok(health) => Action::HealthDidLoad(health),
        Err(e) => Action::HealthDidError(e.to_string()),
    }
}
