use model::volcano::{Volcano, VolcanoStatus};

/// Continuously active or otherwise significant volcanoes, with the status
/// they are shown with when no weekly report mentions them.
/// `(name, location, status, latitude, longitude)`
const CURATED: [(&str, &str, VolcanoStatus, f64, f64); 13] = [
    ("Mauna Loa", "Hawaii", VolcanoStatus::Active, 19.4217, -155.6027),
    ("Kilauea", "Hawaii", VolcanoStatus::Erupting, 19.407, -155.287),
    ("Etna", "Italy", VolcanoStatus::Erupting, 37.751, 14.994),
    ("Stromboli", "Italy", VolcanoStatus::Erupting, 38.789, 15.213),
    ("Katla", "Iceland", VolcanoStatus::Restless, 63.63, -19.62),
    ("Fagradalsfjall", "Iceland", VolcanoStatus::Active, 63.90, -22.17),
    ("Merapi", "Indonesia", VolcanoStatus::Erupting, -7.541, 110.446),
    ("Mayon", "Philippines", VolcanoStatus::Erupting, 13.257, 123.956),
    ("Sakurajima", "Japan", VolcanoStatus::Erupting, 31.593, 130.657),
    ("Popocatépetl", "Mexico", VolcanoStatus::Erupting, 19.02, -98.62),
    ("Cotopaxi", "Ecuador", VolcanoStatus::Restless, -0.677, -78.446),
    ("Yasur", "Vanuatu", VolcanoStatus::Erupting, -19.527, 169.444),
    ("Erebus", "Antarctica", VolcanoStatus::Erupting, -77.53, 167.17),
];

pub fn curated() -> Vec<Volcano> {
    CURATED
        .iter()
        .map(|(name, location, status, latitude, longitude)| Volcano {
            name: name.to_string(),
            location: location.to_string(),
            status: *status,
            report: None,
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect()
}
