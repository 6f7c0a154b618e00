use std::env;

use crate::{states::StatesResponse, ApiError};

pub const OPENSKY_API_URL: &str = "https://opensky-network.org/api";

#[derive(Clone, Debug)]
pub struct OpenSkyCredentials {
    pub username: String,
    pub password: String,
}

impl OpenSkyCredentials {
    /// Anonymous access is used unless both variables are set.
    pub fn from_env() -> Option<Self> {
        let username = env::var("OPENSKY_USERNAME").ok()?;
        let password = env::var("OPENSKY_PASSWORD").ok()?;
        Some(Self { username, password })
    }
}

pub struct OpenSkyClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<OpenSkyCredentials>,
}

impl OpenSkyClient {
    pub fn new(credentials: Option<OpenSkyCredentials>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENSKY_API_URL.to_owned(),
            credentials,
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_env() -> Self {
        Self::new(OpenSkyCredentials::from_env())
    }

    /// All state vectors currently known to the network.
    pub async fn get_states(&self) -> Result<StatesResponse, ApiError> {
        let url = format!("{}/states/all", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        let response = request.send().await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimitReached),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}
