use std::sync::Arc;

use crossterm::event::KeyCode;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use crate::data::FootballApi;
use crate::model::league_id_for_match;
use crate::route::Route;
use crate::screens::{step_selection, LoadState, MatchFilter, Payload, Screen};

/// A finished fetch, tagged with the mount it was started for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub payload: Payload,
}

pub struct App {
    pub should_quit: bool,
    pub route: Route,
    pub screen: Screen,
    pub tick: usize,
    history: Vec<Route>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    api: Arc<dyn FootballApi>,
    tx: mpsc::Sender<FetchOutcome>,
}

impl App {
    /// Mounts `start` right away, so it must be called inside a tokio runtime.
    pub fn new(api: Arc<dyn FootballApi>, tx: mpsc::Sender<FetchOutcome>, start: Route) -> Self {
        let mut app = Self {
            should_quit: false,
            route: start.clone(),
            screen: Screen::for_route(&start),
            tick: 0,
            history: Vec::new(),
            generation: 0,
            pending: None,
            api,
            tx,
        };
        app.mount(start);
        app
    }

    fn mount(&mut self, route: Route) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        info!(route = %route, generation, "mounting screen");

        self.screen = Screen::for_route(&route);
        self.route = route.clone();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            let payload = Payload::load(api.as_ref(), &route).await;
            if tx.send(FetchOutcome { generation, payload }).await.is_err() {
                debug!(generation, "ui gone before fetch finished");
            }
        }));
    }

    pub fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.route, route.clone());
        self.history.push(previous);
        self.mount(route);
    }

    /// League screens go home; the match screen goes to wherever it was opened from.
    pub fn back(&mut self) {
        let target = match &self.route {
            Route::LeagueList => return,
            Route::LeagueDetail { .. } => {
                self.history.clear();
                Route::LeagueList
            }
            Route::MatchDetail { match_id } => self.history.pop().unwrap_or_else(|| {
                Route::LeagueDetail {
                    league_id: league_id_for_match(match_id).to_string(),
                }
            }),
        };
        self.mount(target);
    }

    pub fn reload(&mut self) {
        self.mount(self.route.clone());
    }

    /// Commits a fetch result, unless the screen it was meant for is gone.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding result for a replaced screen"
            );
            return;
        }
        self.pending = None;
        self.screen.apply(outcome.payload);
    }

    pub fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Down | KeyCode::Char('j') => self.step(true),
            KeyCode::Up | KeyCode::Char('k') => self.step(false),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Tab => self.cycle_filter(),
            KeyCode::Char('a') => self.set_filter(MatchFilter::All),
            KeyCode::Char('u') => self.set_filter(MatchFilter::Upcoming),
            KeyCode::Char('f') => self.set_filter(MatchFilter::Finished),
            _ => {}
        }
    }

    fn step(&mut self, forward: bool) {
        match &mut self.screen {
            Screen::LeagueList(screen) => {
                let len = match &screen.leagues {
                    LoadState::Loaded(leagues) => leagues.len(),
                    _ => 0,
                };
                step_selection(&mut screen.list, len, forward);
            }
            Screen::LeagueDetail(screen) => {
                let len = screen.visible_matches().len();
                step_selection(&mut screen.list, len, forward);
            }
            Screen::MatchDetail(_) => {}
        }
    }

    fn open_selected(&mut self) {
        let target = match &self.screen {
            Screen::LeagueList(screen) => screen.selected().map(|league| Route::LeagueDetail {
                league_id: league.id.clone(),
            }),
            Screen::LeagueDetail(screen) => screen.selected().map(|fixture| Route::MatchDetail {
                match_id: fixture.id.clone(),
            }),
            Screen::MatchDetail(_) => None,
        };
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn set_filter(&mut self, filter: MatchFilter) {
        if let Screen::LeagueDetail(screen) = &mut self.screen {
            screen.set_filter(filter);
        }
    }

    fn cycle_filter(&mut self) {
        if let Screen::LeagueDetail(screen) = &mut self.screen {
            screen.set_filter(screen.filter.next());
        }
    }
}
