use std::env;

use crate::TleError;

pub const CELESTRAK_URL: &str = "https://celestrak.org/NORAD/elements";

/// Groups fetched when `CELESTRAK_GROUPS` is not set.
pub const DEFAULT_GROUPS: [&str; 4] = ["stations", "starlink", "gps-ops", "iridium-NEXT"];

/// Groups that are only published in the supplemental, operator provided
/// element sets.
const SUPPLEMENTAL_GROUPS: [&str; 1] = ["starlink"];

pub struct CelestrakClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CelestrakClient {
    fn default() -> Self {
        Self::new(CELESTRAK_URL)
    }
}

impl CelestrakClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, group: &str) -> String {
        if SUPPLEMENTAL_GROUPS.contains(&group) {
            format!("{}/supplemental/sup-gp.php?FILE={}&FORMAT=tle", self.base_url, group)
        } else {
            format!("{}/gp.php?GROUP={}&FORMAT=tle", self.base_url, group)
        }
    }

    /// Fetches the raw three-line element sets of a group.
    pub async fn get_group(&self, group: &str) -> Result<String, TleError> {
        let url = self.url(group);
        log::debug!("Requesting '{}'.", url);
        let response = self.http.get(&url).send().await?;
        match response.status() {
            reqwest::StatusCode::OK => Ok(response.text().await?),
            status_code => Err(TleError::InvalidResponse { status_code, url }),
        }
    }
}

/// Configured groups from `CELESTRAK_GROUPS`, comma separated.
pub fn groups_from_env() -> Vec<String> {
    match env::var("CELESTRAK_GROUPS") {
        Ok(value) if !value.trim().is_empty() => value
            .split(',')
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(|group| crate::canonical_group(group).to_owned())
            .collect(),
        _ => DEFAULT_GROUPS.iter().map(|group| group.to_string()).collect(),
    }
}
