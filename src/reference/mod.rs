// Reference data for the selectors.
// Maps display labels to geographic keys: state FIPS codes and tribal area names.

mod tribal_areas;

use tribal_areas::TRIBAL_AREAS;

/// A selectable geography: what the user sees and the key passed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoOption {
    pub label: String,
    pub key: String,
}

impl GeoOption {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// States, the District of Columbia, and Puerto Rico with their FIPS codes.
static STATE_FIPS: &[(&str, &str)] = &[
    ("Alabama", "01"),
    ("Alaska", "02"),
    ("Arizona", "04"),
    ("Arkansas", "05"),
    ("California", "06"),
    ("Colorado", "08"),
    ("Delaware", "10"),
    ("District of Columbia", "11"),
    ("Connecticut", "09"),
    ("Florida", "12"),
    ("Georgia", "13"),
    ("Idaho", "16"),
    ("Hawaii", "15"),
    ("Illinois", "17"),
    ("Indiana", "18"),
    ("Iowa", "19"),
    ("Kansas", "20"),
    ("Kentucky", "21"),
    ("Louisiana", "22"),
    ("Maine", "23"),
    ("Maryland", "24"),
    ("Massachusetts", "25"),
    ("Michigan", "26"),
    ("Minnesota", "27"),
    ("Mississippi", "28"),
    ("Missouri", "29"),
    ("Montana", "30"),
    ("Nebraska", "31"),
    ("Nevada", "32"),
    ("New Hampshire", "33"),
    ("New Jersey", "34"),
    ("New Mexico", "35"),
    ("New York", "36"),
    ("North Carolina", "37"),
    ("North Dakota", "38"),
    ("Ohio", "39"),
    ("Oklahoma", "40"),
    ("Oregon", "41"),
    ("Pennsylvania", "42"),
    ("Rhode Island", "44"),
    ("South Carolina", "45"),
    ("South Dakota", "46"),
    ("Tennessee", "47"),
    ("Texas", "48"),
    ("Vermont", "50"),
    ("Utah", "49"),
    ("Virginia", "51"),
    ("Washington", "53"),
    ("West Virginia", "54"),
    ("Wisconsin", "55"),
    ("Wyoming", "56"),
    ("Puerto Rico", "72"),
];

/// State name to FIPS code, in selector order.
pub fn state_fips_codes() -> Vec<GeoOption> {
    STATE_FIPS
        .iter()
        .map(|(name, fips)| GeoOption::new(*name, *fips))
        .collect()
}

/// Tribal area names; each name is its own key.
pub fn tribal_area_names() -> Vec<GeoOption> {
    TRIBAL_AREAS
        .iter()
        .map(|name| GeoOption::new(*name, *name))
        .collect()
}

/// Resolve a FIPS code or a case-insensitive state name.
pub fn find_state(query: &str) -> Option<GeoOption> {
    let query = query.trim();
    STATE_FIPS
        .iter()
        .find(|(name, fips)| *fips == query || name.eq_ignore_ascii_case(query))
        .map(|(name, fips)| GeoOption::new(*name, *fips))
}

/// Resolve a case-insensitive tribal area name.
pub fn find_tribal_area(query: &str) -> Option<GeoOption> {
    let query = query.trim();
    TRIBAL_AREAS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(query))
        .map(|name| GeoOption::new(*name, *name))
}

/// Indices of the options whose label contains `text`, ignoring case.
pub fn filter_options(options: &[GeoOption], text: &str) -> Vec<usize> {
    let needle = text.trim().to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| needle.is_empty() || option.label.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_codes_are_unique() {
        let states = state_fips_codes();
        assert_eq!(states.len(), 52);

        let keys: HashSet<&str> = states.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys.len(), states.len());
        assert!(states.iter().all(|s| s.key.len() == 2));
        assert_eq!(states[0], GeoOption::new("Alabama", "01"));
    }

    #[test]
    fn test_tribal_keys_match_labels() {
        let areas = tribal_area_names();
        assert!(areas.len() > 600);
        assert!(areas.iter().all(|a| a.key == a.label));

        let keys: HashSet<&str> = areas.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys.len(), areas.len());
    }

    #[test]
    fn test_find_state() {
        assert_eq!(find_state("06").unwrap().label, "California");
        assert_eq!(find_state("new york").unwrap().key, "36");
        assert!(find_state("Atlantis").is_none());
    }

    #[test]
    fn test_find_tribal_area() {
        let zuni = find_tribal_area("zuni reservation and off-reservation trust land, nm--az");
        assert_eq!(
            zuni.unwrap().key,
            "Zuni Reservation and Off-Reservation Trust Land, NM--AZ"
        );
        assert!(find_tribal_area("Zuni").is_none());
    }

    #[test]
    fn test_filter_options() {
        let states = state_fips_codes();
        let matches = filter_options(&states, "dakota");
        let labels: Vec<&str> = matches.iter().map(|&i| states[i].label.as_str()).collect();
        assert_eq!(labels, vec!["North Dakota", "South Dakota"]);

        assert_eq!(filter_options(&states, "").len(), states.len());
        assert!(filter_options(&states, "zzz").is_empty());
    }
}
