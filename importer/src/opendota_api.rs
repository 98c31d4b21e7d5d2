use crate::ApiError;

pub const OPENDOTA_API_URL: &str = "https://api.opendota.com/api";

pub struct Client {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl Client {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: OPENDOTA_API_URL.to_owned(),
        }
    }

    pub fn with_base_url<IS>(mut self, base_url: IS) -> Self
    where
        IS: Into<String>,
    {
        self.base_url = base_url.into();
        self
    }

    pub fn match_url(&self, match_id: u64) -> String {
        format!("{}/matches/{}", self.base_url, match_id)
    }

    pub async fn fetch_match(&self, match_id: u64) -> Result<serde_json::Value, ApiError> {
        let mut request = self.http.get(self.match_url(match_id));
        if let Some(key) = self.api_key.as_deref() {
            request = request.query(&[("api_key", key)]);
        }

        let response = request.send().await.map_err(ApiError::Request)?;
        if !response.status().is_success() {
            tracing::debug!(?response, "Unsuccessful OpenDota response");
            return Err(ApiError::Status(response.status()));
        }

        response.json().await.map_err(ApiError::Decode)
    }

    /// The published match record, `None` if it could not be fetched.
    #[tracing::instrument(skip(self))]
    pub async fn match_details(&self, match_id: u64) -> Option<serde_json::Value> {
        tracing::info!("Fetching match {} from OpenDota", match_id);

        match self.fetch_match(match_id).await {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::error!("Fetching match {}: {}", match_id, e);
                None
            }
        }
    }
}
