use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// The subset of an Overpass `out center` response the importer reads.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Node position, or the center of a way or relation.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.center
            .map(|c| (c.lat, c.lon))
            .or_else(|| self.lat.zip(self.lon))
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Result of `POST /trips/seed`.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SeedSummary {
    pub trips: usize,
    pub trip_ids: Vec<i32>,
}
