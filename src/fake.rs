//! In-memory backend for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Local, TimeZone};

use crate::data::{FetchError, FootballApi};
use crate::model::{Confidence, League, Match, MatchStatus, Prediction};

/// Serves canned data. A missing league or match list answers with HTTP 500,
/// a missing prediction with 404 like the real backend does for unknown matches.
#[derive(Default)]
pub struct FakeApi {
    pub leagues: Option<Vec<League>>,
    pub matches: Option<Vec<Match>>,
    pub prediction: Option<Prediction>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    /// Requests seen so far, sorted.
    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn http_error(path: &str, status: u16) -> FetchError {
    FetchError::Status {
        url: format!("http://fake/api/{}", path),
        status,
    }
}

#[async_trait]
impl FootballApi for FakeApi {
    async fn leagues(&self) -> Result<Vec<League>, FetchError> {
        self.record("leagues".into());
        self.leagues.clone().ok_or_else(|| http_error("leagues", 500))
    }

    async fn matches(&self, league_id: &str) -> Result<Vec<Match>, FetchError> {
        self.record(format!("matches:{}", league_id));
        self.matches.clone().ok_or_else(|| http_error("matches", 500))
    }

    async fn prediction(&self, match_id: &str) -> Result<Prediction, FetchError> {
        self.record(format!("prediction:{}", match_id));
        self.prediction.clone().ok_or_else(|| http_error("prediction", 404))
    }
}

pub fn league(id: &str, name: &str) -> League {
    League {
        id: id.into(),
        name: name.into(),
        country: "England".into(),
        season: "2024/2025".into(),
        logo: "⭐".into(),
    }
}

fn fixture(id: &str, home: &str, away: &str, status: MatchStatus) -> Match {
    Match {
        id: id.into(),
        home_team: home.into(),
        away_team: away.into(),
        home_logo: "🔴".into(),
        away_logo: "🔵".into(),
        kickoff: Local.with_ymd_and_hms(2025, 3, 15, 20, 0, 0).unwrap(),
        status,
    }
}

pub fn scheduled(id: &str, home: &str, away: &str) -> Match {
    fixture(id, home, away, MatchStatus::Scheduled)
}

pub fn finished(id: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> Match {
    fixture(
        id,
        home,
        away,
        MatchStatus::Finished {
            home: home_score,
            away: away_score,
        },
    )
}

pub fn prediction(home: f64, draw: f64, away: f64) -> Prediction {
    Prediction {
        predicted_winner: "Arsenal".into(),
        confidence: Confidence::High,
        home_win_prob: home,
        draw_prob: draw,
        away_win_prob: away,
        analysis: "Ventaja clara del equipo local.".into(),
    }
}
