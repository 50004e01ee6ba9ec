//! Reducer and component tests using EffectStore and TestHarness

use flixmap::{
    action::Action,
    components::{Component, DetailsPage, DetailsPageProps, ResultsPage, ResultsPageProps},
    effect::Effect,
    nav::{PageKind, Transition},
    reducer::reducer,
    state::{AppState, BackendHealth, MediaType, TitleSummary},
};
use tui_dispatch::testing::*;
use tui_dispatch::{assert_emitted, assert_not_emitted, DataResource, EffectStore, NumericComponentId};

fn title(id: &str, rating: Option<f32>) -> TitleSummary {
    TitleSummary {
        id: id.into(),
        media_type: MediaType::Movie,
        title: format!("Title {id}"),
        year: Some(1999),
        poster: Some(format!("https://img/{id}.jpg")),
        rating,
    }
}

fn results_state(items: Vec<TitleSummary>) -> AppState {
    let mut state = AppState::default();
    state.nav.dispatch(Transition::SubmitResults(items));
    state.last_query = "Matrix".into();
    state
}

#[test]
fn test_reducer_search_submit() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::SearchSubmit("  The Matrix ".into()));
    assert!(result.changed, "State should change");
    assert!(store.state().search_loading());
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::SearchTitles { query, .. } if query == "The Matrix"
    ));
}

#[test]
fn test_reducer_clear_resets_query_and_error() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::SearchSubmit("".into()));
    store.dispatch(Action::SearchQueryChange("Matrix".into()));
    assert!(store.state().search_error.is_some());

    store.dispatch(Action::SearchClear);
    assert!(store.state().search_query.is_empty());
    assert!(store.state().search_error.is_none());
}

#[test]
fn test_reducer_health() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::Init);
    assert_eq!(result.effects, vec![Effect::CheckHealth]);
    assert!(store.state().backend.is_loading());

    store.dispatch(Action::HealthDidLoad(BackendHealth {
        status: "ok".into(),
        api_key_configured: true,
    }));
    assert!(store.state().backend.is_loaded());

    store.dispatch(Action::HealthDidError("Network error: refused".into()));
    assert_eq!(store.state().backend.error(), Some("Network error: refused"));
}

#[test]
fn test_reducer_cursor_is_bounded_by_visible_cards() {
    let mut items = vec![title("a", Some(5.0)), title("b", None)];
    items[1].poster = None;
    let mut store = EffectStore::new(results_state(items), reducer);

    assert!(!store.dispatch(Action::ResultsCursor(1)).changed);
    assert_eq!(store.state().results_cursor, 0);
}

#[test]
fn test_reducer_countries_error_is_failed() {
    let mut store = EffectStore::new(results_state(vec![title("tt1", None)]), reducer);
    let result = store.dispatch(Action::TitleSelect(title("tt1", None)));
    let Effect::FetchCountries(request) = &result.effects[0] else {
        panic!("expected countries effect");
    };
    let request_id = request.id;

    store.dispatch(Action::CountriesDidError {
        request_id,
        error: "Could not fetch availability data".into(),
    });
    assert!(store.state().countries.is_failed());
    assert_eq!(
        store.state().countries.error(),
        Some("Could not fetch availability data")
    );
}

#[test]
fn test_tick_only_counts_while_animating() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    assert!(!store.dispatch(Action::Tick).changed);

    store.dispatch(Action::SearchSubmit("Matrix".into()));
    assert!(store.dispatch(Action::Tick).changed);
    assert_eq!(store.state().tick_count, 1);
}

#[test]
fn test_results_keys() {
    let state = results_state(vec![title("a", Some(1.0)), title("b", Some(2.0))]);
    let mut harness = TestHarness::<AppState, Action>::new(state);
    let mut component = ResultsPage::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("right r esc q", |state, event| {
        let props = ResultsPageProps {
            items: state.nav.items(),
            cursor: state.results_cursor,
            loading: false,
            error: None,
            query: &state.last_query,
            spinner: state.spinner(),
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(4);
    assert_emitted!(actions, Action::ResultsCursor(1));
    assert_emitted!(actions, Action::ResultsRefresh);
    assert_emitted!(actions, Action::NavBack);
    assert_emitted!(actions, Action::Quit);
}

#[test]
fn test_results_ignore_when_unfocused() {
    let state = results_state(vec![title("a", Some(1.0))]);
    let mut harness = TestHarness::<AppState, Action>::new(state);
    let mut component = ResultsPage::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter r q", |state, event| {
        let props = ResultsPageProps {
            items: state.nav.items(),
            cursor: 0,
            loading: false,
            error: None,
            query: &state.last_query,
            spinner: state.spinner(),
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_details_keys_go_back_or_quit() {
    let mut state = results_state(vec![title("a", None)]);
    state.nav.dispatch(Transition::SelectTitle(title("a", None)));
    state.countries = DataResource::Loaded(vec!["Japan".into()]);
    assert_eq!(state.page(), PageKind::Details);

    let mut harness = TestHarness::<AppState, Action>::new(state);
    let mut component = DetailsPage::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("b q", |state, event| {
        let Some(title) = state.nav.selected() else {
            return Vec::new();
        };
        let props = DetailsPageProps {
            title,
            countries: &state.countries,
            spinner: state.spinner(),
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(2);
    assert_emitted!(actions, Action::NavBack);
    assert_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::TitleSelect(_));
}

#[test]
fn test_action_categories() {
    let did_load = Action::CountriesDidLoad {
        request_id: 1,
        countries: Vec::new(),
    };
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("countries_did"));
    assert!(did_load.is_countries_did());
    assert_eq!(tick.category(), None);
}
