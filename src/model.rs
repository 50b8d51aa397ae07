use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates the league id from the rest of a match id (`PL_3`).
pub const MATCH_ID_SEPARATOR: char = '_';

/// League that owns a match, by the `{leagueId}_{suffix}` id convention.
///
/// Ids without a separator are returned whole.
pub fn league_id_for_match(match_id: &str) -> &str {
    match_id
        .split_once(MATCH_ID_SEPARATOR)
        .map_or(match_id, |(league_id, _)| league_id)
}

// Wire records, exactly as the backend sends them.

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<LeagueRecord>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchRecord>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    pub season: String,
    pub logo: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_logo: String,
    pub away_logo: String,
    pub date: String,
    pub status: String, // "SCHEDULED", "FINISHED"
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub predicted_winner: String,
    pub confidence: String,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub analysis: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_leagues: u64,
    pub total_matches: u64,
    pub total_predictions: u64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{entity} has an empty id")]
    EmptyId { entity: &'static str },
    #[error("match {id}: unknown status {status:?}")]
    UnknownStatus { id: String, status: String },
    #[error("match {id}: unparseable date {date:?}")]
    BadDate { id: String, date: String },
    #[error("match {id}: finished without a final score")]
    MissingScore { id: String },
    #[error("prediction: {field} = {value} is not a probability")]
    BadProbability { field: &'static str, value: f64 },
}

// Validated view types.

#[derive(Debug, Clone, PartialEq)]
pub struct League {
    pub id: String,
    pub name: String,
    pub country: String,
    pub season: String,
    pub logo: String,
}

impl TryFrom<LeagueRecord> for League {
    type Error = ValidationError;

    fn try_from(record: LeagueRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(ValidationError::EmptyId { entity: "league" });
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            country: record.country,
            season: record.season,
            logo: record.logo,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    /// Final score, home first.
    Finished { home: u32, away: u32 },
}

impl MatchStatus {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, MatchStatus::Scheduled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Próximo",
            MatchStatus::Finished { .. } => "Finalizado",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_logo: String,
    pub away_logo: String,
    pub kickoff: DateTime<Local>,
    pub status: MatchStatus,
}

impl TryFrom<MatchRecord> for Match {
    type Error = ValidationError;

    fn try_from(record: MatchRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(ValidationError::EmptyId { entity: "match" });
        }
        let status = match record.status.as_str() {
            "SCHEDULED" => MatchStatus::Scheduled,
            "FINISHED" => match (record.home_score, record.away_score) {
                (Some(home), Some(away)) => MatchStatus::Finished { home, away },
                _ => return Err(ValidationError::MissingScore { id: record.id }),
            },
            _ => {
                return Err(ValidationError::UnknownStatus {
                    id: record.id,
                    status: record.status,
                })
            }
        };
        let Some(kickoff) = parse_kickoff(&record.date) else {
            return Err(ValidationError::BadDate {
                id: record.id,
                date: record.date,
            });
        };
        Ok(Self {
            id: record.id,
            home_team: record.home_team,
            away_team: record.away_team,
            home_logo: record.home_logo,
            away_logo: record.away_logo,
            kickoff,
            status,
        })
    }
}

/// RFC 3339, or a naive ISO date-time taken as local time.
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    resolve_local(&Local, &naive)
}

/// Wall-clock time in `tz`. Times skipped by a DST jump move forward by an
/// hour; repeated times take the first occurrence.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::None => tz
            .from_local_datetime(&(*naive + TimeDelta::hours(1)))
            .earliest(),
        found => found.earliest(),
    }
}

/// Only `Alta` is recognised; every other label is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confidence {
    High,
    Other(String),
}

impl Confidence {
    pub const HIGH_LABEL: &'static str = "Alta";

    pub fn is_high(&self) -> bool {
        matches!(self, Confidence::High)
    }

    pub fn label(&self) -> &str {
        match self {
            Confidence::High => Self::HIGH_LABEL,
            Confidence::Other(label) => label,
        }
    }
}

impl From<String> for Confidence {
    fn from(label: String) -> Self {
        if label == Self::HIGH_LABEL {
            Confidence::High
        } else {
            Confidence::Other(label)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub predicted_winner: String,
    pub confidence: Confidence,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub analysis: String,
}

impl TryFrom<PredictionRecord> for Prediction {
    type Error = ValidationError;

    fn try_from(record: PredictionRecord) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("home_win_prob", record.home_win_prob),
            ("draw_prob", record.draw_prob),
            ("away_win_prob", record.away_win_prob),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::BadProbability { field, value });
            }
        }
        Ok(Self {
            predicted_winner: record.predicted_winner,
            confidence: Confidence::from(record.confidence),
            home_win_prob: record.home_win_prob,
            draw_prob: record.draw_prob,
            away_win_prob: record.away_win_prob,
            analysis: record.analysis,
        })
    }
}
