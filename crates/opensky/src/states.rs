//! The `/states/all` response. State vectors are positional JSON arrays.

use model::flight::Aircraft;
use serde::Deserialize;
use serde_json::Value;
use utility::{id::Id, serde::unix_seconds};

const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LAST_CONTACT: usize = 4;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const ON_GROUND: usize = 8;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;
const VERTICAL_RATE: usize = 11;
const GEO_ALTITUDE: usize = 13;

#[derive(Debug, Clone, Deserialize)]
pub struct StatesResponse {
    pub time: i64,
    /// `null` when nothing is in the air that matches the query.
    pub states: Option<Vec<Vec<Value>>>,
}

impl StatesResponse {
    /// Aircraft with a known position; all other state vectors are skipped.
    pub fn aircraft(&self) -> Vec<Aircraft> {
        self.states
            .iter()
            .flatten()
            .filter_map(|state| parse_state(state))
            .collect()
    }
}

fn float(state: &[Value], index: usize) -> Option<f64> {
    state.get(index).and_then(Value::as_f64)
}

fn text(state: &[Value], index: usize) -> Option<String> {
    state
        .get(index)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

pub fn parse_state(state: &[Value]) -> Option<Aircraft> {
    Some(Aircraft {
        icao24: Id::new(text(state, ICAO24)?),
        callsign: text(state, CALLSIGN),
        origin_country: text(state, ORIGIN_COUNTRY).unwrap_or_default(),
        latitude: float(state, LATITUDE)?,
        longitude: float(state, LONGITUDE)?,
        altitude: float(state, BARO_ALTITUDE).or_else(|| float(state, GEO_ALTITUDE)),
        velocity: float(state, VELOCITY),
        heading: float(state, TRUE_TRACK),
        vertical_rate: float(state, VERTICAL_RATE),
        on_ground: state
            .get(ON_GROUND)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        last_contact: state.get(LAST_CONTACT).and_then(unix_seconds::from_value),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_state_vectors() {
        let response: StatesResponse = serde_json::from_value(json!({
            "time": 1717243200,
            "states": [
                ["3c6444", "DLH9LF  ", "Germany", 1717243199, 1717243199, 8.5622, 50.0379,
                 3048.0, false, 154.3, 249.2, -4.2, null, 3120.5, "1000", false, 0],
                ["a0b1c2", "", "United States", null, 1717243100, null, null,
                 null, true, 0.0, null, null, null, null, null, false, 0],
                ["4ca7b5", null, "Ireland", 1717243190, 1717243195, -6.27, 53.42,
                 null, false, 70.0, 10.0, 0.0, null, 152.4, null, false, 0]
            ]
        }))
        .unwrap();

        let aircraft = response.aircraft();
        assert_eq!(aircraft.len(), 2);

        let lufthansa = &aircraft[0];
        assert_eq!(lufthansa.icao24.as_raw(), "3c6444");
        assert_eq!(lufthansa.callsign.as_deref(), Some("DLH9LF"));
        assert_eq!(lufthansa.altitude, Some(3048.0));
        assert_eq!(
            lufthansa.last_contact.map(|t| t.timestamp()),
            Some(1717243199)
        );

        // geometric altitude fills in for a missing barometric one
        assert_eq!(aircraft[1].altitude, Some(152.4));
        assert_eq!(aircraft[1].callsign, None);
    }

    #[test]
    fn null_states_mean_no_aircraft() {
        let response: StatesResponse =
            serde_json::from_value(json!({ "time": 0, "states": null })).unwrap();
        assert!(response.aircraft().is_empty());
    }
}
