//! BigQuery dataset locations

use crate::connector::StaticOptionsFetcher;
use crate::forms::FormOption;

/// (location id, label)
const BQ_LOCATIONS: &[(&str, &str)] = &[
    ("US", "United States (multi-region)"),
    ("EU", "European Union (multi-region)"),
    ("us-central1", "Iowa"),
    ("us-east1", "South Carolina"),
    ("us-east4", "Northern Virginia"),
    ("us-west1", "Oregon"),
    ("us-west2", "Los Angeles"),
    ("northamerica-northeast1", "Montréal"),
    ("southamerica-east1", "São Paulo"),
    ("europe-north1", "Finland"),
    ("europe-west1", "Belgium"),
    ("europe-west2", "London"),
    ("europe-west3", "Frankfurt"),
    ("europe-west4", "Netherlands"),
    ("europe-west6", "Zürich"),
    ("asia-east1", "Taiwan"),
    ("asia-east2", "Hong Kong"),
    ("asia-northeast1", "Tokyo"),
    ("asia-northeast2", "Osaka"),
    ("asia-northeast3", "Seoul"),
    ("asia-south1", "Mumbai"),
    ("asia-southeast1", "Singapore"),
    ("asia-southeast2", "Jakarta"),
    ("australia-southeast1", "Sydney"),
];

/// Locations a BigQuery dataset can live in (`BQ_LOCATIONS`)
#[derive(Debug, Clone, Copy, Default)]
pub struct BqLocationsFetcher;

impl StaticOptionsFetcher for BqLocationsFetcher {
    fn options(&self) -> Vec<FormOption> {
        BQ_LOCATIONS
            .iter()
            .map(|&(id, label)| FormOption::new(id, label))
            .collect()
    }
}
