use std::{error, fmt, sync::Arc};

pub mod collector;
pub mod curated;
pub mod report;

pub use report::WeeklyReport;

pub const GVP_RSS_URL: &str = "https://volcano.si.edu/news/WeeklyVolcanoRSS.xml";

#[derive(Debug, Clone)]
pub enum FeedError {
    RequestError(Arc<reqwest::Error>),
    ParseError(Arc<serde_xml_rs::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
    },
}

impl error::Error for FeedError {}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeedError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            FeedError::ParseError(e) => write!(f, "XML parse error: {}", e),
            FeedError::InvalidResponse { status_code, url } => {
                write!(f, "Invalid Response ({}) {}", status_code, url)
            }
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::RequestError(Arc::new(e))
    }
}

impl From<serde_xml_rs::Error> for FeedError {
    fn from(e: serde_xml_rs::Error) -> Self {
        FeedError::ParseError(Arc::new(e))
    }
}

/// Downloads and parses the weekly volcanic activity report.
pub async fn get_weekly_report(
    client: &reqwest::Client,
    url: &str,
) -> Result<WeeklyReport, FeedError> {
    log::debug!("Requesting '{}'.", url);
    let response = client.get(url).send().await?;
    match response.status() {
        reqwest::StatusCode::OK => Ok(WeeklyReport::from_xml(&response.text().await?)?),
        status_code => Err(FeedError::InvalidResponse {
            status_code,
            url: url.to_owned(),
        }),
    }
}

/// The curated volcanoes, with statuses taken from the weekly report where
/// it mentions them.
pub fn volcanoes(report: Option<&WeeklyReport>) -> Vec<model::volcano::Volcano> {
    let mut volcanoes = curated::curated();
    if let Some(report) = report {
        report.enrich(&mut volcanoes);
    }
    volcanoes
}
