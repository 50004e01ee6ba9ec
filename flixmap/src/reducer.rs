//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api;
use crate::catalog;
use crate::effect::Effect;
use crate::nav::{PageKind, Transition};
use crate::state::{AppState, CountriesRequest, SearchRequest};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.backend = DataResource::Loading;
            let mut effects = vec![Effect::CheckHealth];
            if std::mem::take(&mut state.submit_on_start) {
                let query = state.search_query.clone();
                if let Some(effect) = start_search(state, &query, PageKind::Search) {
                    effects.push(effect);
                }
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::HealthDidLoad(health) => {
            tracing::info!(status = %health.status, api_key = health.api_key_configured, "backend healthy");
            state.backend = DataResource::Loaded(health);
            DispatchResult::changed()
        }

        Action::HealthDidError(error) => {
            tracing::warn!(%error, "backend health check failed");
            state.backend = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchQueryChange(query) => {
            if state.search_loading() || state.search_query == query {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            if state.search_loading() || state.page() != PageKind::Search {
                return DispatchResult::unchanged();
            }
            state.search_query = query.clone();
            match start_search(state, &query, PageKind::Search) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::SearchClear => {
            if state.search_loading() {
                return DispatchResult::unchanged();
            }
            state.search_query.clear();
            state.search_error = None;
            DispatchResult::changed()
        }

        Action::SearchDidLoad { request_id, items } => {
            let Some(request) = take_pending_search(state, request_id) else {
                return DispatchResult::unchanged();
            };
            state.search_error = None;
            state.last_query = request.query;
            state.results_cursor = 0;
            if !state.nav.dispatch(Transition::SubmitResults(items)) {
                tracing::debug!(request_id, "search results arrived off the search flow");
            }
            DispatchResult::changed()
        }

        Action::SearchDidError { request_id, error } => {
            if take_pending_search(state, request_id).is_none() {
                return DispatchResult::unchanged();
            }
            state.search_error = Some(error);
            DispatchResult::changed()
        }

        // ===== Results =====
        Action::ResultsCursor(index) => {
            if state.page() != PageKind::Results || state.results_loading() {
                return DispatchResult::unchanged();
            }
            let shown = catalog::ranked_titles(state.nav.items()).len();
            if index >= shown || index == state.results_cursor {
                return DispatchResult::unchanged();
            }
            state.results_cursor = index;
            DispatchResult::changed()
        }

        Action::ResultsRefresh => {
            if state.page() != PageKind::Results || state.pending_search.is_some() {
                return DispatchResult::unchanged();
            }
            let query = state.last_query.clone();
            state.search_error = None;
            match start_search(state, &query, PageKind::Results) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        // ===== Details =====
        Action::TitleSelect(title) => {
            if state.page() != PageKind::Results || state.results_loading() {
                return DispatchResult::unchanged();
            }
            let request = CountriesRequest {
                id: state.alloc_request_id(),
                title_id: title.id.clone(),
                media_type: title.media_type,
            };
            if !state.nav.dispatch(Transition::SelectTitle(title)) {
                return DispatchResult::unchanged();
            }
            tracing::info!(title_id = %request.title_id, request_id = request.id, "title selected");
            state.search_error = None;
            state.countries_request = Some(request.clone());
            state.countries = DataResource::Loading;
            DispatchResult::changed_with(Effect::FetchCountries(request))
        }

        Action::CountriesDidLoad {
            request_id,
            countries,
        } => {
            if !countries_request_matches(state, request_id) {
                return DispatchResult::unchanged();
            }
            state.countries = DataResource::Loaded(countries);
            DispatchResult::changed()
        }

        Action::CountriesDidError { request_id, error } => {
            if !countries_request_matches(state, request_id) {
                return DispatchResult::unchanged();
            }
            state.countries = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Navigation =====
        Action::NavBack => match state.page() {
            PageKind::Search => DispatchResult::unchanged(),
            PageKind::Results => {
                state.nav.dispatch(Transition::Back);
                // The search page comes back blank, as on first launch.
                state.search_query.clear();
                state.search_error = None;
                state.pending_search = None;
                state.last_query.clear();
                state.results_cursor = 0;
                DispatchResult::changed()
            }
            PageKind::Details => {
                state.nav.dispatch(Transition::Back);
                state.countries_request = None;
                state.countries = DataResource::Empty;
                DispatchResult::changed()
            }
        },

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.loading_anim_active() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Validates the query and registers a new pending search. A blank query sets
/// the validation message instead and yields no effect.
fn start_search(state: &mut AppState, query: &str, origin: PageKind) -> Option<Effect> {
    let query = match api::normalize_query(query) {
        Ok(query) => query.to_string(),
        Err(err) => {
            state.search_error = Some(err.to_string());
            return None;
        }
    };

    let request_id = state.alloc_request_id();
    tracing::info!(request_id, %query, "search submitted");
    state.pending_search = Some(SearchRequest {
        id: request_id,
        query: query.clone(),
        origin,
    });
    state.search_error = None;
    state.tick_count = 0;
    Some(Effect::SearchTitles { request_id, query })
}

fn take_pending_search(state: &mut AppState, request_id: u64) -> Option<SearchRequest> {
    let current = state
        .pending_search
        .as_ref()
        .is_some_and(|pending| pending.id == request_id);
    if current {
        return state.pending_search.take();
    }
    tracing::debug!(request_id, "discarding stale search completion");
    None
}

fn countries_request_matches(state: &AppState, request_id: u64) -> bool {
    let matches = state
        .countries_request
        .as_ref()
        .is_some_and(|req| req.id == request_id);
    if !matches {
        tracing::debug!(request_id, "discarding stale availability completion");
    }
    matches
}
