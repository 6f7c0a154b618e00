//! The Smithsonian GVP weekly volcanic activity report, published as RSS.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use model::volcano::{ActivityReport, Volcano, VolcanoStatus};
use serde::Deserialize;
use utility::serde::rfc2822;

#[derive(Debug, Clone, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Clone, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<ReportItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportItem {
    /// e.g. `Etna (Italy) - Report for 1 May-7 May 2024`
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "pubDate", default, deserialize_with = "rfc2822::deserialize_option")]
    pub published: Option<DateTime<Utc>>,
}

impl ReportItem {
    /// The volcano name, everything in the title before the country.
    pub fn volcano_name(&self) -> &str {
        self.title
            .split(" (")
            .next()
            .unwrap_or(&self.title)
            .split(" - ")
            .next()
            .unwrap_or(&self.title)
            .trim()
    }

    pub fn is_new_activity(&self) -> bool {
        [Some(&self.title), self.description.as_ref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains("new activity"))
    }

    fn to_report(&self) -> ActivityReport {
        ActivityReport {
            title: self.title.clone(),
            link: self.link.clone(),
            published: self.published,
        }
    }
}

/// Name key ignoring case and diacritics, so that `Popocatépetl` matches
/// `Popocatepetl`.
pub fn name_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct WeeklyReport {
    /// One item per volcano, the first one listed in the feed.
    pub items: Vec<ReportItem>,
}

impl WeeklyReport {
    pub fn from_xml(xml: &str) -> Result<Self, serde_xml_rs::Error> {
        let rss: Rss = serde_xml_rs::from_str(xml)?;
        Ok(Self {
            items: rss
                .channel
                .items
                .into_iter()
                .unique_by(|item| name_key(item.volcano_name()))
                .collect(),
        })
    }

    pub fn find(&self, name: &str) -> Option<&ReportItem> {
        let key = name_key(name);
        self.items
            .iter()
            .find(|item| name_key(item.volcano_name()) == key)
    }

    /// Replaces the status of every volcano the report mentions.
    pub fn enrich(&self, volcanoes: &mut [Volcano]) {
        for volcano in volcanoes {
            if let Some(item) = self.find(&volcano.name) {
                volcano.status = if item.is_new_activity() {
                    VolcanoStatus::NewActivity
                } else {
                    VolcanoStatus::OngoingActivity
                };
                volcano.report = Some(item.to_report());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::curated::curated;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Smithsonian / USGS Weekly Volcanic Activity Report</title>
    <link>https://volcano.si.edu/reports_weekly.cfm</link>
    <description>Weekly summaries of volcanic activity</description>
    <item>
      <title>Etna (Italy) - Report for 1 May-7 May 2024</title>
      <link>https://volcano.si.edu/showreport.cfm?wvar=GVP.WVAR20240501-211060</link>
      <description>New Activity/Unrest: INGV reported Strombolian activity at Voragine Crater.</description>
      <pubDate>Wed, 08 May 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Popocatepetl (Mexico) - Report for 1 May-7 May 2024</title>
      <link>https://volcano.si.edu/showreport.cfm?wvar=GVP.WVAR20240501-341090</link>
      <description>Ongoing Activity: Daily emissions of gas and ash.</description>
      <pubDate>Wed, 08 May 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Etna (Italy) - Report for 24 April-30 April 2024</title>
      <link>https://volcano.si.edu/showreport.cfm?wvar=GVP.WVAR20240424-211060</link>
      <description>Ongoing Activity.</description>
      <pubDate>Wed, 01 May 2024 00:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_once_per_volcano() {
        let report = WeeklyReport::from_xml(RSS).unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].volcano_name(), "Etna");
        assert_eq!(
            report.items[0].published,
            Some(Utc.with_ymd_and_hms(2024, 5, 8, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn enriches_mentioned_volcanoes() {
        let report = WeeklyReport::from_xml(RSS).unwrap();
        let mut volcanoes = curated();
        report.enrich(&mut volcanoes);

        let by_name = |name: &str| volcanoes.iter().find(|v| v.name == name).unwrap();
        assert_eq!(by_name("Etna").status, VolcanoStatus::NewActivity);
        assert_eq!(by_name("Popocatépetl").status, VolcanoStatus::OngoingActivity);
        assert!(by_name("Popocatépetl").report.is_some());
        assert_eq!(by_name("Katla").status, VolcanoStatus::Restless);
        assert!(by_name("Katla").report.is_none());
    }
}
