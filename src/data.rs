use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{
    League, LeaguesResponse, Match, MatchesResponse, Prediction, PredictionRecord, Stats,
    ValidationError,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid data from {url}: {source}")]
    Invalid {
        url: String,
        #[source]
        source: ValidationError,
    },
}

/// The three reads the screens are built from.
#[async_trait]
pub trait FootballApi: Send + Sync {
    async fn leagues(&self) -> Result<Vec<League>, FetchError>;

    async fn matches(&self, league_id: &str) -> Result<Vec<Match>, FetchError>;

    async fn prediction(&self, match_id: &str) -> Result<Prediction, FetchError>;
}

pub struct DataClient {
    client: Client,
    base_url: Url,
}

impl DataClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid api url {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("api url {base_url} cannot carry a path");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// `{base}/api/{segments…}`, each segment percent-encoded on its own.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let url = url.as_str();
        debug!(url, "GET");
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn fetch_stats(&self) -> Result<Stats, FetchError> {
        self.get_json(&self.endpoint(&["stats"])).await
    }
}

fn validate<R, T>(url: &Url, records: Vec<R>) -> Result<Vec<T>, FetchError>
where
    T: TryFrom<R, Error = ValidationError>,
{
    records
        .into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| FetchError::Invalid {
            url: url.to_string(),
            source,
        })
}

#[async_trait]
impl FootballApi for DataClient {
    async fn leagues(&self) -> Result<Vec<League>, FetchError> {
        let url = self.endpoint(&["leagues"]);
        let data: LeaguesResponse = self.get_json(&url).await?;
        validate(&url, data.leagues)
    }

    async fn matches(&self, league_id: &str) -> Result<Vec<Match>, FetchError> {
        let url = self.endpoint(&["leagues", league_id, "matches"]);
        let data: MatchesResponse = self.get_json(&url).await?;
        validate(&url, data.matches)
    }

    async fn prediction(&self, match_id: &str) -> Result<Prediction, FetchError> {
        let url = self.endpoint(&["matches", match_id, "prediction"]);
        let data: PredictionRecord = self.get_json(&url).await?;
        Prediction::try_from(data).map_err(|source| FetchError::Invalid {
            url: url.to_string(),
            source,
        })
    }
}
