use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use model::satellite::{IssPosition, SatelliteGroup, SatellitePosition};
use tracking::{server::Server, store::Latest};

use crate::{
    canonical_group,
    client::{groups_from_env, CelestrakClient},
    collector::TleCollector,
    tle::{Satellite, ISS_NORAD_ID},
    TleError,
};

/// The group the ISS is looked up in.
const STATIONS: &str = "stations";

/// Latest element sets of every configured group.
#[derive(Clone)]
pub struct TleCatalog {
    client: Arc<CelestrakClient>,
    groups: IndexMap<String, Latest<Vec<Satellite>>>,
}

impl TleCatalog {
    pub fn new<I>(client: CelestrakClient, groups: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            client: Arc::new(client),
            groups: groups
                .into_iter()
                .map(|group| (group, Latest::new()))
                .collect(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(CelestrakClient::default(), groups_from_env())
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Looks up a group by CelesTrak name or alias, ignoring case.
    pub fn store(&self, group: &str) -> Option<&Latest<Vec<Satellite>>> {
        let group = canonical_group(group);
        self.groups
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(group))
            .map(|(_, store)| store)
    }

    /// Starts one collector per group.
    pub fn spawn_collectors(&self, server: &mut Server) {
        for (group, store) in &self.groups {
            let (group, client, store) = (group.clone(), self.client.clone(), store.clone());
            server.collector(move || {
                TleCollector::new(group.clone(), client.clone(), store.clone())
            });
        }
    }

    /// Positions of every satellite in a group at `t`. Satellites that fail
    /// to propagate, usually because of decayed orbits, are left out.
    pub async fn positions(
        &self,
        group: &str,
        t: &DateTime<Utc>,
    ) -> Result<SatelliteGroup, TleError> {
        let store = self
            .store(group)
            .ok_or_else(|| TleError::UnknownGroup(group.to_owned()))?;
        let satellites = store
            .value()
            .await
            .ok_or_else(|| TleError::NoData(group.to_owned()))?;
        // large constellations take a while to propagate
        let t = *t;
        tokio::task::spawn_blocking(move || propagate_all(&satellites, &t))
            .await
            .map_err(|why| TleError::PropagationError(why.to_string()))
    }

    /// The ISS from the `stations` group, or from the built-in element set if
    /// that group was not fetched.
    pub async fn iss(&self, t: &DateTime<Utc>) -> Result<IssPosition, TleError> {
        let stations = match self.store(STATIONS) {
            Some(store) => store.value().await,
            None => None,
        };
        let point = match stations
            .as_ref()
            .and_then(|satellites| satellites.iter().find(|s| s.norad_id() == ISS_NORAD_ID))
        {
            Some(iss) => iss.subpoint(t)?,
            None => Satellite::iss_fallback()?.subpoint(t)?,
        };
        Ok(IssPosition {
            timestamp: *t,
            lat: point.lat,
            lon: point.lon,
        })
    }
}

pub fn propagate_all(satellites: &[Satellite], t: &DateTime<Utc>) -> SatelliteGroup {
    let satellites = satellites
        .iter()
        .filter_map(|satellite| match satellite.subpoint(t) {
            Ok(point) => Some(SatellitePosition {
                name: satellite.name.clone(),
                latitude: point.lat,
                longitude: point.lon,
            }),
            Err(why) => {
                log::debug!("{}", why);
                None
            }
        })
        .collect();
    SatelliteGroup {
        timestamp: *t,
        satellites,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::tle::{parse_tle, ISS_FALLBACK_TLE};

    fn catalog() -> TleCatalog {
        TleCatalog::new(
            CelestrakClient::default(),
            ["stations", "gps-ops", "iridium-NEXT"].map(str::to_owned),
        )
    }

    #[tokio::test]
    async fn aliases_resolve_to_configured_groups() {
        let catalog = catalog();
        assert!(catalog.store("gps").is_some());
        assert!(catalog.store("IRIDIUM").is_some());
        assert!(catalog.store("iss").is_some());
        assert!(catalog.store("starlink").is_none());

        let t = Utc::now();
        assert!(matches!(
            catalog.positions("starlink", &t).await,
            Err(TleError::UnknownGroup(_))
        ));
        assert!(matches!(
            catalog.positions("gps", &t).await,
            Err(TleError::NoData(_))
        ));
    }

    #[tokio::test]
    async fn iss_prefers_fetched_stations() {
        let catalog = catalog();
        let t = Utc.with_ymd_and_hms(2024, 4, 9, 18, 0, 0).unwrap();
        let fallback = catalog.iss(&t).await.unwrap();

        catalog
            .store("stations")
            .unwrap()
            .publish(parse_tle(&ISS_FALLBACK_TLE.join("\n")))
            .await;
        let fetched = catalog.iss(&t).await.unwrap();
        assert_eq!(fetched.lat, fallback.lat);
        assert_eq!(fetched.lon, fallback.lon);

        let group = catalog.positions("stations", &t).await.unwrap();
        assert_eq!(group.satellites.len(), 1);
        assert_eq!(group.satellites[0].name, "ISS (ZARYA)");
    }
}
