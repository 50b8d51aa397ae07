use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    LeagueList,
    LeagueDetail { league_id: String },
    MatchDetail { match_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no screen for path {0:?}")]
pub struct RouteError(pub String);

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::LeagueList);
        }
        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["league", id] if !id.is_empty() => Ok(Route::LeagueDetail {
                league_id: id.to_string(),
            }),
            ["match", id] if !id.is_empty() => Ok(Route::MatchDetail {
                match_id: id.to_string(),
            }),
            _ => Err(RouteError(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::LeagueList => write!(f, "/"),
            Route::LeagueDetail { league_id } => write!(f, "/league/{}", league_id),
            Route::MatchDetail { match_id } => write!(f, "/match/{}", match_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_screens() {
        assert_eq!("/".parse::<Route>(), Ok(Route::LeagueList));
        assert_eq!("".parse::<Route>(), Ok(Route::LeagueList));
        assert_eq!(
            "/league/PL".parse::<Route>(),
            Ok(Route::LeagueDetail {
                league_id: "PL".into()
            })
        );
        assert_eq!(
            "/match/epl_2024_m042/".parse::<Route>(),
            Ok(Route::MatchDetail {
                match_id: "epl_2024_m042".into()
            })
        );
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!("/league".parse::<Route>().is_err());
        assert!("/league/".parse::<Route>().is_err());
        assert!("/team/PL".parse::<Route>().is_err());
        assert!("/match/PL_1/prediction".parse::<Route>().is_err());
    }

    #[test]
    fn display_is_the_path() {
        for path in ["/", "/league/BL1", "/match/BL1_7"] {
            let route: Route = path.parse().unwrap();
            assert_eq!(route.to_string(), path);
        }
    }
}
