use ratatui::widgets::ListState;
use tracing::{error, info};

use crate::data::{FetchError, FootballApi};
use crate::format::percent_label;
use crate::model::{league_id_for_match, League, Match, Prediction};
use crate::route::Route;

/// Page-level fetch state. A failure is kept apart from an empty success.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    fn from_result(result: Result<T, FetchError>, context: &str) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => {
                error!(error = %err, "Error fetching {}", context);
                LoadState::Failed(err.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchFilter {
    #[default]
    All,
    Upcoming,
    Finished,
}

impl MatchFilter {
    pub const ALL: [MatchFilter; 3] = [MatchFilter::All, MatchFilter::Upcoming, MatchFilter::Finished];

    pub fn label(self) -> &'static str {
        match self {
            MatchFilter::All => "Todos",
            MatchFilter::Upcoming => "Próximos",
            MatchFilter::Finished => "Finalizados",
        }
    }

    pub fn index(self) -> usize {
        match self {
            MatchFilter::All => 0,
            MatchFilter::Upcoming => 1,
            MatchFilter::Finished => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn keeps(self, fixture: &Match) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::Upcoming => fixture.status.is_scheduled(),
            MatchFilter::Finished => !fixture.status.is_scheduled(),
        }
    }
}

pub fn filter_matches(matches: &[Match], filter: MatchFilter) -> Vec<&Match> {
    matches.iter().filter(|m| filter.keeps(m)).collect()
}

/// Moves a list selection one step, wrapping at both ends.
pub fn step_selection(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

#[derive(Debug, Default)]
pub struct LeagueListScreen {
    pub leagues: LoadState<Vec<League>>,
    pub list: ListState,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl LeagueListScreen {
    pub fn selected(&self) -> Option<&League> {
        match &self.leagues {
            LoadState::Loaded(leagues) => leagues.get(self.list.selected()?),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueDetail {
    /// `None` when the id is not in the league list.
    pub league: Option<League>,
    pub matches: Vec<Match>,
}

#[derive(Debug)]
pub struct LeagueDetailScreen {
    pub league_id: String,
    pub detail: LoadState<LeagueDetail>,
    pub filter: MatchFilter,
    pub list: ListState,
}

impl LeagueDetailScreen {
    pub fn new(league_id: &str) -> Self {
        Self {
            league_id: league_id.to_string(),
            detail: LoadState::Loading,
            filter: MatchFilter::All,
            list: ListState::default(),
        }
    }

    pub fn visible_matches(&self) -> Vec<&Match> {
        match &self.detail {
            LoadState::Loaded(detail) => filter_matches(&detail.matches, self.filter),
            _ => Vec::new(),
        }
    }

    pub fn set_filter(&mut self, filter: MatchFilter) {
        self.filter = filter;
        self.list.select(Some(0));
    }

    pub fn selected(&self) -> Option<&Match> {
        self.visible_matches().get(self.list.selected()?).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetail {
    /// `None` when the match is not in its league's list.
    pub fixture: Option<Match>,
    /// `None` when the backend has no prediction for the id.
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityBar {
    pub label: String,
    pub probability: f64,
}

impl ProbabilityBar {
    pub fn percent_label(&self) -> String {
        percent_label(self.probability)
    }

    pub fn ratio(&self) -> f64 {
        self.probability.clamp(0.0, 1.0)
    }

    /// Filled cells out of `total`.
    pub fn width(&self, total: u16) -> u16 {
        (self.ratio() * f64::from(total)).round() as u16
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView<'a> {
    pub prediction: &'a Prediction,
    pub bars: [ProbabilityBar; 3],
}

impl MatchDetail {
    /// Prediction content to show; never present for a finished match.
    pub fn prediction_view(&self) -> Option<PredictionView<'_>> {
        let fixture = self.fixture.as_ref()?;
        if !fixture.status.is_scheduled() {
            return None;
        }
        let p = self.prediction.as_ref()?;
        Some(PredictionView {
            prediction: p,
            bars: [
                ProbabilityBar {
                    label: format!("{} gana", fixture.home_team),
                    probability: p.home_win_prob,
                },
                ProbabilityBar {
                    label: "Empate".to_string(),
                    probability: p.draw_prob,
                },
                ProbabilityBar {
                    label: format!("{} gana", fixture.away_team),
                    probability: p.away_win_prob,
                },
            ],
        })
    }
}

#[derive(Debug)]
pub struct MatchDetailScreen {
    pub match_id: String,
    pub detail: LoadState<MatchDetail>,
}

impl MatchDetailScreen {
    pub fn new(match_id: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            detail: LoadState::Loading,
        }
    }
}

#[derive(Debug)]
pub enum Screen {
    LeagueList(LeagueListScreen),
    LeagueDetail(LeagueDetailScreen),
    MatchDetail(MatchDetailScreen),
}

impl Screen {
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::LeagueList => Screen::LeagueList(LeagueListScreen::default()),
            Route::LeagueDetail { league_id } => {
                Screen::LeagueDetail(LeagueDetailScreen::new(league_id))
            }
            Route::MatchDetail { match_id } => Screen::MatchDetail(MatchDetailScreen::new(match_id)),
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            Screen::LeagueList(s) => s.leagues.is_loading(),
            Screen::LeagueDetail(s) => s.detail.is_loading(),
            Screen::MatchDetail(s) => s.detail.is_loading(),
        }
    }

    pub fn apply(&mut self, payload: Payload) {
        match (self, payload) {
            (Screen::LeagueList(screen), Payload::Leagues(result)) => {
                screen.leagues = LoadState::from_result(result, "leagues");
                screen.list.select(Some(0));
            }
            (Screen::LeagueDetail(screen), Payload::LeagueDetail(result)) => {
                screen.detail = LoadState::from_result(result, "league data");
                screen.list.select(Some(0));
            }
            (Screen::MatchDetail(screen), Payload::MatchDetail(result)) => {
                screen.detail = LoadState::from_result(result, "match data");
            }
            (_, payload) => error!(?payload, "payload does not belong to the mounted screen"),
        }
    }
}

/// Result of one screen's fetch task.
#[derive(Debug)]
pub enum Payload {
    Leagues(Result<Vec<League>, FetchError>),
    LeagueDetail(Result<LeagueDetail, FetchError>),
    MatchDetail(Result<MatchDetail, FetchError>),
}

impl Payload {
    pub async fn load(api: &dyn FootballApi, route: &Route) -> Self {
        match route {
            Route::LeagueList => Payload::Leagues(api.leagues().await),
            Route::LeagueDetail { league_id } => {
                Payload::LeagueDetail(load_league_detail(api, league_id).await)
            }
            Route::MatchDetail { match_id } => {
                Payload::MatchDetail(load_match_detail(api, match_id).await)
            }
        }
    }
}

/// League metadata and matches, both or neither.
pub async fn load_league_detail(
    api: &dyn FootballApi,
    league_id: &str,
) -> Result<LeagueDetail, FetchError> {
    let (leagues, matches) = tokio::try_join!(api.leagues(), api.matches(league_id))?;
    let league = leagues.into_iter().find(|l| l.id == league_id);
    info!(league_id, found = league.is_some(), matches = matches.len(), "league data loaded");
    Ok(LeagueDetail { league, matches })
}

pub async fn load_match_detail(
    api: &dyn FootballApi,
    match_id: &str,
) -> Result<MatchDetail, FetchError> {
    let league_id = league_id_for_match(match_id);
    let prediction = async { absent_if_not_found(api.prediction(match_id).await) };
    let (matches, prediction) = tokio::try_join!(api.matches(league_id), prediction)?;
    let fixture = matches.into_iter().find(|m| m.id == match_id);
    info!(
        match_id,
        league_id,
        found = fixture.is_some(),
        predicted = prediction.is_some(),
        "match data loaded"
    );
    Ok(MatchDetail {
        fixture,
        prediction,
    })
}

/// A 404 means the backend does not know the id; any other failure still counts.
fn absent_if_not_found<T>(result: Result<T, FetchError>) -> Result<Option<T>, FetchError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FetchError::Status { status: 404, .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{finished, league, prediction, scheduled, FakeApi};

    fn sample_matches() -> Vec<Match> {
        vec![
            scheduled("PL_0", "Arsenal", "Chelsea"),
            finished("PL_1", "Liverpool", "Tottenham", 2, 1),
            scheduled("PL_2", "Manchester City", "Manchester United"),
            finished("PL_3", "Chelsea", "Arsenal", 0, 0),
        ]
    }

    #[test]
    fn filters_by_status_preserving_order() {
        let matches = sample_matches();

        let all: Vec<&str> = filter_matches(&matches, MatchFilter::All)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(all, ["PL_0", "PL_1", "PL_2", "PL_3"]);

        let upcoming = filter_matches(&matches, MatchFilter::Upcoming);
        assert_eq!(upcoming.len(), 2);
        assert!(upcoming.iter().all(|m| m.status.is_scheduled()));
        assert_eq!(upcoming[0].id, "PL_0");

        let done = filter_matches(&matches, MatchFilter::Finished);
        assert_eq!(done.len(), 2);
        assert!(done.iter().all(|m| !m.status.is_scheduled()));
        assert_eq!(done[1].id, "PL_3");
    }

    #[test]
    fn filter_change_resets_selection_without_refetch() {
        let mut screen = LeagueDetailScreen::new("PL");
        screen.detail = LoadState::Loaded(LeagueDetail {
            league: None,
            matches: sample_matches(),
        });
        screen.list.select(Some(3));
        screen.set_filter(MatchFilter::Finished);
        assert_eq!(screen.selected().map(|m| m.id.as_str()), Some("PL_1"));
        assert_eq!(MatchFilter::Finished.next(), MatchFilter::All);
    }

    #[test]
    fn selection_wraps_around() {
        let mut state = ListState::default();
        step_selection(&mut state, 3, false);
        assert_eq!(state.selected(), Some(0));
        step_selection(&mut state, 3, false);
        assert_eq!(state.selected(), Some(2));
        step_selection(&mut state, 3, true);
        assert_eq!(state.selected(), Some(0));
        step_selection(&mut state, 0, true);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn finished_match_never_yields_prediction_content() {
        let detail = MatchDetail {
            fixture: Some(finished("PL_1", "Liverpool", "Tottenham", 2, 1)),
            prediction: Some(prediction(0.55, 0.25, 0.20)),
        };
        assert!(detail.prediction_view().is_none());

        let missing = MatchDetail {
            fixture: None,
            prediction: Some(prediction(0.55, 0.25, 0.20)),
        };
        assert!(missing.prediction_view().is_none());

        let unpredicted = MatchDetail {
            fixture: Some(scheduled("PL_0", "Arsenal", "Chelsea")),
            prediction: None,
        };
        assert!(unpredicted.prediction_view().is_none());
    }

    #[test]
    fn probability_bars_round_and_scale() {
        let detail = MatchDetail {
            fixture: Some(scheduled("PL_0", "Arsenal", "Chelsea")),
            prediction: Some(prediction(0.55, 0.25, 0.20)),
        };
        let view = detail.prediction_view().expect("scheduled match shows prediction");
        let labels: Vec<String> = view.bars.iter().map(|b| b.percent_label()).collect();
        assert_eq!(labels, ["55%", "25%", "20%"]);
        let widths: Vec<u16> = view.bars.iter().map(|b| b.width(100)).collect();
        assert_eq!(widths, [55, 25, 20]);
        assert_eq!(view.bars[0].label, "Arsenal gana");
        assert_eq!(view.bars[1].label, "Empate");
        assert_eq!(view.bars[2].label, "Chelsea gana");
    }

    #[tokio::test]
    async fn league_detail_picks_league_by_id() {
        let api = FakeApi {
            leagues: Some(vec![league("PD", "Spanish La Liga"), league("PL", "English Premier League")]),
            matches: Some(sample_matches()),
            ..FakeApi::default()
        };
        let detail = load_league_detail(&api, "PL").await.unwrap();
        assert_eq!(detail.league.unwrap().name, "English Premier League");
        assert_eq!(detail.matches.len(), 4);
        assert_eq!(api.calls(), ["leagues", "matches:PL"]);
    }

    #[tokio::test]
    async fn league_detail_fails_as_a_group() {
        let only_leagues = FakeApi {
            leagues: Some(vec![league("PL", "English Premier League")]),
            matches: None,
            ..FakeApi::default()
        };
        assert!(load_league_detail(&only_leagues, "PL").await.is_err());

        let only_matches = FakeApi {
            leagues: None,
            matches: Some(sample_matches()),
            ..FakeApi::default()
        };
        assert!(load_league_detail(&only_matches, "PL").await.is_err());

        let mut screen = Screen::for_route(&Route::LeagueDetail {
            league_id: "PL".into(),
        });
        screen.apply(Payload::load(&only_leagues, &"/league/PL".parse().unwrap()).await);
        let Screen::LeagueDetail(screen) = screen else {
            panic!("wrong screen");
        };
        assert!(matches!(screen.detail, LoadState::Failed(_)));
        assert!(screen.visible_matches().is_empty());
    }

    #[tokio::test]
    async fn match_detail_fetches_the_derived_league() {
        let api = FakeApi {
            matches: Some(vec![scheduled("epl_2024_m042", "Arsenal", "Chelsea")]),
            prediction: Some(prediction(0.55, 0.25, 0.20)),
            ..FakeApi::default()
        };
        let detail = load_match_detail(&api, "epl_2024_m042").await.unwrap();
        assert_eq!(detail.fixture.unwrap().id, "epl_2024_m042");
        assert_eq!(api.calls(), ["matches:epl", "prediction:epl_2024_m042"]);
    }

    #[tokio::test]
    async fn match_detail_reports_unknown_match_as_absent() {
        let api = FakeApi {
            matches: Some(sample_matches()),
            prediction: Some(prediction(0.4, 0.3, 0.3)),
            ..FakeApi::default()
        };
        let detail = load_match_detail(&api, "PL_99").await.unwrap();
        assert!(detail.fixture.is_none());

        // Unknown ids come back from the prediction endpoint as 404.
        let unknown = FakeApi {
            matches: Some(sample_matches()),
            ..FakeApi::default()
        };
        let detail = load_match_detail(&unknown, "PL_99").await.unwrap();
        assert_eq!(detail.fixture, None);
        assert_eq!(detail.prediction, None);

        let mut screen = Screen::for_route(&"/match/PL_99".parse().unwrap());
        screen.apply(Payload::load(&unknown, &"/match/PL_99".parse().unwrap()).await);
        let Screen::MatchDetail(screen) = screen else {
            panic!("wrong screen");
        };
        assert!(matches!(screen.detail, LoadState::Loaded(_)));
    }

    #[tokio::test]
    async fn match_detail_still_fails_as_a_group() {
        let no_matches = FakeApi {
            prediction: Some(prediction(0.4, 0.3, 0.3)),
            ..FakeApi::default()
        };
        assert!(load_match_detail(&no_matches, "PL_0").await.is_err());
    }

    #[test]
    fn only_not_found_counts_as_absent() {
        let status = |status| FetchError::Status {
            url: "http://localhost:8001/api/matches/PL_9/prediction".into(),
            status,
        };
        assert!(matches!(absent_if_not_found::<()>(Err(status(404))), Ok(None)));
        assert!(matches!(absent_if_not_found::<()>(Err(status(500))), Err(_)));
        assert!(matches!(absent_if_not_found(Ok(1)), Ok(Some(1))));
    }

    #[test]
    fn mismatched_payload_leaves_screen_untouched() {
        let mut screen = Screen::for_route(&Route::LeagueList);
        screen.apply(Payload::MatchDetail(Err(FetchError::Status {
            url: "u".into(),
            status: 500,
        })));
        assert!(screen.is_loading());
    }
}
