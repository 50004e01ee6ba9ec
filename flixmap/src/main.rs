//! flixmap - where can I watch this?

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flixmap::action::Action;
use flixmap::api::{self, CatalogClient};
use flixmap::components::{
    world_atlas, Component, DetailsPage, DetailsPageProps, ResultsPage, ResultsPageProps,
    SearchPage, SearchPageProps,
};
use flixmap::effect::{countries_completion, health_completion, search_completion, Effect};
use flixmap::logging;
use flixmap::nav::{Page, PageKind};
use flixmap::reducer::reducer;
use flixmap::state::{AppState, LOADING_ANIM_TICK_MS};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use world_map::prelude::HighlightSet;

/// Search Netflix titles and see where they stream on a world map
#[derive(Parser, Debug)]
#[command(name = "flixmap")]
#[command(about = "Where can I watch this? Netflix availability on a terminal world map")]
struct Args {
    /// Origin the app is served from; loopback hosts use the local dev backend
    #[arg(long, default_value = "http://localhost:5173")]
    origin: String,

    /// Backend base URL (overrides --origin)
    #[arg(long)]
    api_base: Option<String>,

    /// Search for this title on startup
    #[arg(long, short)]
    query: Option<String>,

    /// Append logs to this file (nothing is logged without it)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum FlixComponentId {
    Search,
    Results,
    Details,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum FlixContext {
    Main,
}

impl EventRoutingState<FlixComponentId, FlixContext> for AppState {
    fn focused(&self) -> Option<FlixComponentId> {
        Some(match self.page() {
            PageKind::Search => FlixComponentId::Search,
            PageKind::Results => FlixComponentId::Results,
            PageKind::Details => FlixComponentId::Details,
        })
    }

    fn modal(&self) -> Option<FlixComponentId> {
        None
    }

    fn binding_context(&self, _id: FlixComponentId) -> FlixContext {
        FlixContext::Main
    }

    fn default_context(&self) -> FlixContext {
        FlixContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        origin,
        api_base,
        query,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = &log_file {
        logging::init(path, &log_level)?;
    }

    let api_base = match api_base {
        Some(base) => base,
        None => api::resolve_api_base(&origin).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
        })?,
    };
    tracing::info!(%api_base, "using backend");

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial_base = api_base.clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            let mut state = AppState::new(initial_base);
            if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
                state.search_query = query;
                state.submit_on_start = true;
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let client = Arc::new(CatalogClient::http(api_base));

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, client, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("exiting");
    Ok(())
}

struct FlixUi {
    search: SearchPage,
    results: ResultsPage,
    details: DetailsPage,
    last_page: PageKind,
}

impl FlixUi {
    fn new() -> Self {
        Self {
            search: SearchPage::new(),
            results: ResultsPage::new(),
            details: DetailsPage::new(),
            last_page: PageKind::Search,
        }
    }

    /// Pages are rebuilt when they are entered again, like a remount.
    fn sync_page(&mut self, page: PageKind) {
        if page == self.last_page {
            return;
        }
        match page {
            PageKind::Search => self.search.reset(),
            PageKind::Results if self.last_page == PageKind::Search => {
                self.results = ResultsPage::new()
            }
            PageKind::Results => {}
            PageKind::Details => self.details = DetailsPage::new(),
        }
        self.last_page = page;
    }

    fn search_props<'a>(state: &'a AppState, is_focused: bool) -> SearchPageProps<'a> {
        SearchPageProps {
            query: &state.search_query,
            error: state.search_error.as_deref(),
            loading: state.search_loading(),
            spinner: state.spinner(),
            tick_count: state.tick_count,
            backend: &state.backend,
            api_base: &state.api_base,
            is_focused,
        }
    }

    fn results_props<'a>(state: &'a AppState, is_focused: bool) -> ResultsPageProps<'a> {
        ResultsPageProps {
            items: state.nav.items(),
            cursor: state.results_cursor,
            loading: state.results_loading(),
            error: state.search_error.as_deref(),
            query: &state.last_query,
            spinner: state.spinner(),
            is_focused,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<FlixComponentId>,
    ) {
        self.sync_page(state.page());
        for id in [
            FlixComponentId::Search,
            FlixComponentId::Results,
            FlixComponentId::Details,
        ] {
            event_ctx.component_areas.remove(&id);
        }

        let is_focused = render_ctx.is_focused();
        match state.nav.page() {
            Page::Search => {
                event_ctx.set_component_area(FlixComponentId::Search, area);
                self.search
                    .render(frame, area, Self::search_props(state, is_focused));
            }
            Page::Results { .. } => {
                event_ctx.set_component_area(FlixComponentId::Results, area);
                self.results
                    .render(frame, area, Self::results_props(state, is_focused));
            }
            Page::Details { title, .. } => {
                event_ctx.set_component_area(FlixComponentId::Details, area);
                let props = DetailsPageProps {
                    title,
                    countries: &state.countries,
                    spinner: state.spinner(),
                    is_focused,
                };
                self.details.render(frame, area, props);
            }
        }
    }

    fn handle_event(
        &mut self,
        id: FlixComponentId,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.sync_page(state.page());
        let actions: Vec<_> = match (id, state.nav.page()) {
            (FlixComponentId::Search, Page::Search) => self
                .search
                .handle_event(event, Self::search_props(state, true))
                .into_iter()
                .collect(),
            (FlixComponentId::Results, Page::Results { .. }) => self
                .results
                .handle_event(event, Self::results_props(state, true))
                .into_iter()
                .collect(),
            (FlixComponentId::Details, Page::Details { title, .. }) => self
                .details
                .handle_event(
                    event,
                    DetailsPageProps {
                        title,
                        countries: &state.countries,
                        spinner: state.spinner(),
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            _ => return HandlerResponse::ignored(),
        };

        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: Arc<CatalogClient>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(FlixUi::new()));
    let mut bus: EventBus<AppState, Action, FlixComponentId, FlixContext> = EventBus::new();
    let keybindings: Keybindings<FlixContext> = Keybindings::new();

    for id in [
        FlixComponentId::Search,
        FlixComponentId::Results,
        FlixComponentId::Details,
    ] {
        let ui_page = Rc::clone(&ui);
        bus.register(id, move |event, state| {
            ui_page.borrow_mut().handle_event(id, &event.kind, state)
        });
    }

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(&client, effect, ctx),
        )
        .await
}

/// Handle effects by spawning keyed tasks; a new task replaces the one
/// running under the same key.
fn handle_effect(client: &Arc<CatalogClient>, effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::SearchTitles { request_id, query } => {
            let client = Arc::clone(client);
            ctx.tasks().spawn("search", async move {
                search_completion(request_id, client.search_titles(&query).await)
            });
        }
        Effect::FetchCountries(request) => {
            let client = Arc::clone(client);
            ctx.tasks().spawn("countries", async move {
                let result = client
                    .fetch_countries(&request.title_id, request.media_type)
                    .await;
                if let Ok(countries) = &result {
                    log_unmapped(&request.title_id, countries);
                }
                countries_completion(request.id, result)
            });
        }
        Effect::CheckHealth => {
            let client = Arc::clone(client);
            ctx.tasks().spawn("health", async move {
                health_completion(client.health().await)
            });
        }
    }
}

fn log_unmapped(title_id: &str, countries: &[String]) {
    let Some(atlas) = world_atlas() else {
        return;
    };
    let unmatched = HighlightSet::from_names(countries).unmatched(atlas);
    if !unmatched.is_empty() {
        tracing::warn!(
            title_id,
            missing = ?unmatched,
            "countries not present on the world map"
        );
    }
}
