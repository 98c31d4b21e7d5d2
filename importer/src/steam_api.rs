use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::ApiError;

pub const STEAM_API_URL: &str = "https://api.steampowered.com";

const MATCH_HISTORY_PATH: &str = "/IDOTA2Match_570/GetMatchHistory/v1/";
const MATCH_DETAILS_PATH: &str = "/IDOTA2Match_570/GetMatchDetails/v1/";
const LEAGUE_LISTING_PATH: &str = "/IDOTA2Match_570/GetLeagueListing/v1/";

pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    result: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchHistory {
    pub status: Option<i64>,
    #[serde(rename = "statusDetail")]
    pub status_detail: Option<String>,
    pub matches: Option<Vec<MatchSummary>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchSummary {
    pub match_id: u64,
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LeagueListing {
    #[serde(default)]
    leagues: Vec<serde_json::Value>,
}

impl MatchHistory {
    pub fn match_ids(&self) -> Result<Vec<u64>, ApiError> {
        let matches = self.matches.as_ref().ok_or_else(|| {
            tracing::error!(status = ?self.status, detail = ?self.status_detail, "No matches in match history");
            ApiError::Missing("matches")
        })?;

        Ok(matches.iter().map(|m| m.match_id).collect())
    }
}

impl Client {
    pub fn new<IS>(api_key: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: STEAM_API_URL.to_owned(),
        }
    }

    pub fn with_base_url<IS>(mut self, base_url: IS) -> Self
    where
        IS: Into<String>,
    {
        self.base_url = base_url.into();
        self
    }

    pub async fn get<T>(&self, path: &str, args: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .query(args)
            .send()
            .await
            .map_err(ApiError::Request)?;
        if !response.status().is_success() {
            tracing::debug!(?response, "Unsuccessful Steam API response");
            return Err(ApiError::Status(response.status()));
        }

        response
            .json::<Response<T>>()
            .await
            .map(|r| r.result)
            .map_err(ApiError::Decode)
    }

    /// One page of league matches, newest first, starting at `start_at`
    /// (inclusive) when given.
    pub async fn match_history_page(
        &self,
        league_id: u64,
        matches_requested: u32,
        start_at: Option<u64>,
    ) -> Result<Vec<u64>, ApiError> {
        let mut args = vec![
            ("league_id", league_id.to_string()),
            ("matches_requested", matches_requested.to_string()),
        ];
        if let Some(start_at) = start_at {
            args.push(("start_at_match_id", start_at.to_string()));
        }

        let history: MatchHistory = self.get(MATCH_HISTORY_PATH, &args).await?;
        history.match_ids()
    }

    /// Every match id of a league. Failures end the listing early and only
    /// the ids gathered up to that point are returned.
    #[tracing::instrument(skip(self))]
    pub async fn league_matches(
        &self,
        league_id: u64,
        page_size: u32,
        pause: std::time::Duration,
    ) -> Vec<u64> {
        collect_match_ids(
            |cursor| self.match_history_page(league_id, page_size, cursor),
            pause,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn match_details(&self, match_id: u64) -> Option<serde_json::Value> {
        match self
            .get::<serde_json::Value>(MATCH_DETAILS_PATH, &[("match_id", match_id.to_string())])
            .await
        {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::error!("Fetching match details: {}", e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn league_info(&self, league_id: u64) -> Option<serde_json::Value> {
        let listing: LeagueListing = match self.get(LEAGUE_LISTING_PATH, &[]).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Fetching league listing: {}", e);
                return None;
            }
        };

        let league = listing
            .leagues
            .into_iter()
            .find(|l| l.get("leagueid").and_then(serde_json::Value::as_u64) == Some(league_id));
        if league.is_none() {
            tracing::warn!("League ID {} not found in league listing", league_id);
        }

        league
    }
}

/// Walks a paginated match listing, using the last id of a page as the
/// cursor for the next one.
///
/// The listing ends on an empty page, on a page without unseen ids (the
/// cursor itself is included in the next page) or on the first error.
pub async fn collect_match_ids<F, Fut>(mut fetch_page: F, pause: std::time::Duration) -> Vec<u64>
where
    F: FnMut(Option<u64>) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<u64>, ApiError>>,
{
    let mut match_ids = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = None;

    loop {
        tracing::info!("Fetching batch... (total so far: {})", match_ids.len());

        let page = match fetch_page(cursor).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Fetching matches: {}", e);
                break;
            }
        };

        let before = match_ids.len();
        match_ids.extend(page.iter().copied().filter(|id| seen.insert(*id)));
        if match_ids.len() == before {
            break;
        }

        cursor = page.last().copied();

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    match_ids
}
