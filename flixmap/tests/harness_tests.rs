//! End-to-end flows through the store with EffectStoreTestHarness
//!
//! Async completions are simulated with `complete_action`, so request ids
//! and stale responses can be driven deterministically.

use flixmap::{
    action::Action,
    catalog,
    components::{Component, ResultsPage, ResultsPageProps, SearchPage, SearchPageProps},
    effect::Effect,
    nav::{Navigator, PageKind},
    reducer::reducer,
    state::{AppState, MediaType, TitleSummary},
};
use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn title(id: &str, poster: bool, rating: Option<f32>) -> TitleSummary {
    TitleSummary {
        id: id.into(),
        media_type: MediaType::Movie,
        title: format!("Title {id}"),
        year: Some(2010),
        poster: poster.then(|| format!("https://img/{id}.jpg")),
        rating,
    }
}

fn search_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::SearchTitles { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("search effect")
}

fn countries_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchCountries(req) => Some(req.id),
            _ => None,
        })
        .expect("countries effect")
}

/// State after searching "Inception" and landing on the results page.
fn state_on_results(items: Vec<TitleSummary>) -> AppState {
    let mut state = AppState::default();
    let result = reducer(&mut state, Action::SearchSubmit("Inception".into()));
    let request_id = search_request_id(&result.effects);
    reducer(&mut state, Action::SearchDidLoad { request_id, items });
    assert_eq!(state.page(), PageKind::Results);
    state
}

#[test]
fn test_typing_and_submitting_through_the_search_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut page = SearchPage::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("d", |state, event| {
        let props = SearchPageProps {
            query: &state.search_query,
            error: state.search_error.as_deref(),
            loading: state.search_loading(),
            spinner: state.spinner(),
            tick_count: state.tick_count,
            backend: &state.backend,
            api_base: &state.api_base,
            is_focused: true,
        };
        page.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::SearchQueryChange("d".into()));
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.search_query == "d");

    harness.dispatch_collect(Action::SearchSubmit("Dark".into()));
    harness.assert_state(|s| s.search_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::SearchTitles { query, .. } if query == "Dark"),
    );
}

#[test]
fn test_empty_query_sets_validation_error_without_effect() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("   ".into()));

    harness.drain_effects().effects_empty();
    harness.assert_state(|s| s.search_error.as_deref() == Some("Please enter a title"));
    harness.assert_state(|s| !s.search_loading());
}

#[test]
fn test_submit_ignored_while_searching() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("Dark".into()));
    harness.drain_effects().effects_count(1);

    harness.dispatch_collect(Action::SearchSubmit("Ozark".into()));
    harness.drain_effects().effects_empty();
    harness.assert_state(|s| s.search_query == "Dark");
}

#[test]
fn test_search_error_stays_on_search_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("zzzz".into()));
    let request_id = search_request_id(&harness.drain_effects());

    harness.complete_action(Action::SearchDidError {
        request_id,
        error: "No results found".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.page() == PageKind::Search);
    harness.assert_state(|s| s.search_error.as_deref() == Some("No results found"));
    harness.assert_state(|s| !s.search_loading());
}

#[test]
fn test_inception_shows_one_card() {
    let harness = EffectStoreTestHarness::new(state_on_results(vec![
        title("with-poster", true, Some(8.8)),
        title("no-poster", false, Some(9.9)),
    ]), reducer);

    harness.assert_state(|s| s.nav.items().len() == 2);
    harness.assert_state(|s| catalog::ranked_titles(s.nav.items()).len() == 1);
}

#[test]
fn test_enter_on_results_opens_highest_rated() {
    let mut harness = EffectStoreTestHarness::new(state_on_results(vec![
        title("a", true, None),
        title("b", true, Some(7.0)),
        title("c", true, Some(9.2)),
    ]), reducer);
    let mut page = ResultsPage::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = ResultsPageProps {
            items: state.nav.items(),
            cursor: state.results_cursor,
            loading: state.results_loading(),
            error: state.search_error.as_deref(),
            query: &state.last_query,
            spinner: state.spinner(),
            is_focused: true,
        };
        page.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(1);
    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.assert_state(|s| s.page() == PageKind::Details);
    harness.assert_state(|s| s.nav.selected().map(|t| t.id.as_str()) == Some("c"));
    harness.assert_state(|s| s.countries.is_loading());

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(e, Effect::FetchCountries(req)
            if req.title_id == "c" && req.media_type == MediaType::Movie)
    });
}

#[test]
fn test_stale_countries_response_is_discarded() {
    let mut harness = EffectStoreTestHarness::new(
        state_on_results(vec![title("tt000", true, None), title("tt001", true, None)]),
        reducer,
    );

    harness.dispatch_collect(Action::TitleSelect(title("tt000", true, None)));
    let stale_id = countries_request_id(&harness.drain_effects());

    // Back out before tt000 answers and pick tt001 instead.
    harness.dispatch_collect(Action::NavBack);
    harness.dispatch_collect(Action::TitleSelect(title("tt001", true, None)));
    let current_id = countries_request_id(&harness.drain_effects());
    assert_ne!(stale_id, current_id);

    harness.complete_action(Action::CountriesDidLoad {
        request_id: current_id,
        countries: vec!["Japan".into()],
    });
    harness.complete_action(Action::CountriesDidLoad {
        request_id: stale_id,
        countries: vec!["Brazil".into()],
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 2));

    harness.assert_state(|s| s.nav.selected().map(|t| t.id.as_str()) == Some("tt001"));
    harness.assert_state(|s| s.countries.data() == Some(&vec!["Japan".to_string()]));
}

#[test]
fn test_stale_search_response_is_discarded() {
    let mut harness = EffectStoreTestHarness::new(state_on_results(vec![title("a", true, None)]), reducer);

    harness.dispatch_collect(Action::ResultsRefresh);
    let refresh_id = search_request_id(&harness.drain_effects());
    harness.assert_state(|s| s.results_loading());

    harness.complete_action(Action::SearchDidLoad {
        request_id: refresh_id - 1,
        items: vec![title("old", true, None)],
    });
    harness.process_emitted();
    harness.assert_state(|s| s.results_loading());

    harness.complete_action(Action::SearchDidLoad {
        request_id: refresh_id,
        items: vec![title("fresh", true, None), title("fresher", true, None)],
    });
    harness.process_emitted();
    harness.assert_state(|s| !s.results_loading());
    harness.assert_state(|s| s.nav.items().len() == 2);
}

#[test]
fn test_empty_availability_is_loaded_not_failed() {
    let mut harness = EffectStoreTestHarness::new(state_on_results(vec![title("tt001", true, None)]), reducer);
    harness.dispatch_collect(Action::TitleSelect(title("tt001", true, None)));
    let request_id = countries_request_id(&harness.drain_effects());

    harness.complete_action(Action::CountriesDidLoad {
        request_id,
        countries: Vec::new(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.countries.is_loaded());
    harness.assert_state(|s| !s.countries.is_failed());
}

#[test]
fn test_back_back_restores_initial_search_state() {
    let mut harness = EffectStoreTestHarness::new(
        state_on_results(vec![title("tt001", true, Some(8.0))]),
        reducer,
    );
    harness.dispatch_collect(Action::TitleSelect(title("tt001", true, Some(8.0))));
    harness.dispatch_collect(Action::NavBack);
    harness.assert_state(|s| s.page() == PageKind::Results);
    harness.dispatch_collect(Action::NavBack);

    let initial = AppState::default();
    harness.assert_state(|s| s.nav == Navigator::new());
    harness.assert_state(|s| s.search_query == initial.search_query);
    harness.assert_state(|s| s.search_error.is_none());
    harness.assert_state(|s| s.pending_search.is_none());
    harness.assert_state(|s| s.last_query.is_empty());
    harness.assert_state(|s| s.results_cursor == 0);
    harness.assert_state(|s| s.countries_request.is_none());
    harness.assert_state(|s| s.countries.is_empty());
}

#[test]
fn test_init_checks_health_and_runs_preset_query() {
    let mut state = AppState::default();
    state.search_query = "Dark".into();
    state.submit_on_start = true;
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::Init);

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| matches!(e, Effect::CheckHealth));
    harness.assert_state(|s| s.backend.is_loading());
    harness.assert_state(|s| s.search_loading());
}
