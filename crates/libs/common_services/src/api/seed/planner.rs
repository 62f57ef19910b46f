//! Turns OpenStreetMap attractions into demo trips.

use crate::api::seed::interfaces::OverpassElement;
use crate::api::validation::{check_latitude, check_longitude};
use crate::database::trip::{Coordinate, TripValues};
use fastrand::Rng;
use std::fmt::Write;

/// Jakarta, as (south, west, north, east).
pub const JAKARTA_BBOX: (f64, f64, f64, f64) = (-6.3713, 106.6486, -6.0835, 106.9758);

const POINTS_PER_TRIP: usize = 3;
const POINT_JITTER: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourismType {
    Attraction,
    Museum,
    Viewpoint,
    Gallery,
    ThemePark,
    Zoo,
    Aquarium,
    Artwork,
}

impl TourismType {
    pub const ALL: [Self; 8] = [
        Self::Attraction,
        Self::Museum,
        Self::Viewpoint,
        Self::Gallery,
        Self::ThemePark,
        Self::Zoo,
        Self::Aquarium,
        Self::Artwork,
    ];

    /// Parses an OSM `tourism` tag, defaulting to a generic attraction.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| Some(t.tag()) == tag)
            .unwrap_or(Self::Attraction)
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Attraction => "attraction",
            Self::Museum => "museum",
            Self::Viewpoint => "viewpoint",
            Self::Gallery => "gallery",
            Self::ThemePark => "theme_park",
            Self::Zoo => "zoo",
            Self::Aquarium => "aquarium",
            Self::Artwork => "artwork",
        }
    }

    #[must_use]
    pub const fn preferences(self) -> &'static [&'static str] {
        match self {
            Self::Attraction => &["Sightseeing", "Photography", "Culture", "History"],
            Self::Museum => &["Education", "Culture", "History", "Art"],
            Self::Viewpoint => &["Photography", "Sightseeing", "Nature"],
            Self::Gallery | Self::Artwork => &["Art", "Culture", "Photography"],
            Self::ThemePark => &["Family", "Entertainment", "Adventure"],
            Self::Zoo => &["Family", "Education", "Nature"],
            Self::Aquarium => &["Family", "Education", "Marine Life"],
        }
    }

    /// Ticket price range in rupiah.
    #[must_use]
    pub const fn price_range(self) -> (f64, f64) {
        match self {
            Self::Attraction => (0.0, 25_000.0),
            Self::Museum => (15_000.0, 50_000.0),
            Self::Viewpoint => (0.0, 15_000.0),
            Self::Gallery => (10_000.0, 40_000.0),
            Self::ThemePark => (100_000.0, 300_000.0),
            Self::Zoo => (30_000.0, 80_000.0),
            Self::Aquarium => (50_000.0, 150_000.0),
            Self::Artwork => (0.0, 10_000.0),
        }
    }

    /// Visit duration range in minutes.
    #[must_use]
    pub const fn duration_range(self) -> (i32, i32) {
        match self {
            Self::Attraction => (30, 120),
            Self::Museum => (60, 180),
            Self::Viewpoint => (20, 60),
            Self::Gallery => (45, 120),
            Self::ThemePark => (240, 480),
            Self::Zoo => (120, 300),
            Self::Aquarium => (90, 240),
            Self::Artwork => (10, 30),
        }
    }

    #[must_use]
    pub const fn cover_image(self) -> &'static str {
        match self {
            Self::Museum => "https://images.unsplash.com/photo-1566127992631-137a642a90f4?w=800",
            Self::ThemePark => "https://images.unsplash.com/photo-1544552866-d3ed42536cfd?w=800",
            Self::Zoo => "https://images.unsplash.com/photo-1564760055775-d63b17a55c44?w=800",
            Self::Aquarium => "https://images.unsplash.com/photo-1544551763-46a013bb70d5?w=800",
            Self::Viewpoint => "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df?w=800",
            Self::Gallery | Self::Artwork => {
                "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=800"
            }
            Self::Attraction => {
                "https://images.unsplash.com/photo-1539650116574-75c0c6d73f6e?w=800"
            }
        }
    }
}

/// A trip ready to be inserted, with preference names still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrip {
    pub values: TripValues,
    pub preference_names: &'static [&'static str],
    pub points: Vec<Coordinate>,
}

/// Overpass QL selecting named tourism features inside `bbox`.
#[must_use]
pub fn build_query(bbox: (f64, f64, f64, f64)) -> String {
    let (south, west, north, east) = bbox;
    let tags = TourismType::ALL.map(TourismType::tag).join("|");
    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for element in ["node", "way", "relation"] {
        let _ = writeln!(
            query,
            "  {element}[\"tourism\"~\"^({tags})$\"][\"name\"]({south},{west},{north},{east});"
        );
    }
    query.push_str(");\nout center;");
    query
}

#[must_use]
pub fn describe(element: &OverpassElement) -> String {
    let mut description = String::from("Explore this amazing attraction in Jakarta. ");
    if let Some(address) = element.tag("addr:full") {
        let _ = write!(description, "Located at {address}. ");
    }
    if element.tag("website").is_some() {
        description.push_str("Visit their website for more information. ");
    }
    if let Some(phone) = element.tag("phone") {
        let _ = write!(description, "Contact: {phone}. ");
    }
    description.push_str("Perfect for photography and sightseeing!");
    description
}

/// Uniform price in the type's range, rounded to whole rupiah.
pub fn random_price(kind: TourismType, rng: &mut Rng) -> f64 {
    let (low, high) = kind.price_range();
    (low + rng.f64() * (high - low)).round()
}

pub fn random_duration(kind: TourismType, rng: &mut Rng) -> i32 {
    let (low, high) = kind.duration_range();
    rng.i32(low..=high)
}

/// Waypoints scattered within half the jitter around a position.
pub fn jittered_points(latitude: f64, longitude: f64, rng: &mut Rng) -> Vec<Coordinate> {
    (0..POINTS_PER_TRIP)
        .map(|_| Coordinate {
            latitude: latitude + (rng.f64() - 0.5) * POINT_JITTER,
            longitude: longitude + (rng.f64() - 0.5) * POINT_JITTER,
        })
        .collect()
}

/// Plans up to `max_trips` trips, skipping elements without a name or a usable position.
pub fn plan_trips(elements: &[OverpassElement], max_trips: usize, rng: &mut Rng) -> Vec<PlannedTrip> {
    elements
        .iter()
        .filter_map(|element| {
            let name = element.tag("name")?;
            let (latitude, longitude) = element.position()?;
            check_latitude("lat", latitude).ok()?;
            check_longitude("lon", longitude).ok()?;
            let kind = TourismType::from_tag(element.tag("tourism"));

            Some(PlannedTrip {
                values: TripValues {
                    name: name.trim().to_owned(),
                    description: describe(element),
                    cover_image: kind.cover_image().to_owned(),
                    price: random_price(kind, rng),
                    duration: random_duration(kind, rng),
                    start_latitude: latitude,
                    start_longitude: longitude,
                    end_latitude: latitude,
                    end_longitude: longitude,
                },
                preference_names: kind.preferences(),
                points: jittered_points(latitude, longitude, rng),
            })
        })
        .take(max_trips)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::interfaces::OverpassCenter;
    use std::collections::HashMap;

    fn element(tags: &[(&str, &str)], lat: Option<f64>, lon: Option<f64>) -> OverpassElement {
        OverpassElement {
            kind: "node".to_owned(),
            id: 1,
            lat,
            lon,
            center: None,
            tags: tags
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn unknown_tourism_type_is_an_attraction() {
        assert_eq!(TourismType::from_tag(Some("zoo")), TourismType::Zoo);
        assert_eq!(TourismType::from_tag(Some("hotel")), TourismType::Attraction);
        assert_eq!(TourismType::from_tag(None), TourismType::Attraction);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let mut rng = Rng::with_seed(7);
        for kind in TourismType::ALL {
            let (low_price, high_price) = kind.price_range();
            let (low_duration, high_duration) = kind.duration_range();
            for _ in 0..200 {
                let price = random_price(kind, &mut rng);
                assert!((low_price..=high_price).contains(&price), "{kind:?} {price}");
                let duration = random_duration(kind, &mut rng);
                assert!(
                    (low_duration..=high_duration).contains(&duration),
                    "{kind:?} {duration}"
                );
                assert!(duration >= 1);
            }
        }
    }

    #[test]
    fn points_are_jittered_around_the_origin() {
        let mut rng = Rng::with_seed(1);
        let points = jittered_points(-6.2, 106.8, &mut rng);
        assert_eq!(points.len(), 3);
        for point in points {
            assert!((point.latitude + 6.2).abs() <= POINT_JITTER / 2.0 + 1e-9);
            assert!((point.longitude - 106.8).abs() <= POINT_JITTER / 2.0 + 1e-9);
        }
    }

    #[test]
    fn planning_skips_unusable_elements_and_respects_the_limit() {
        let mut with_center = element(&[("name", "Monas"), ("tourism", "attraction")], None, None);
        with_center.center = Some(OverpassCenter {
            lat: -6.1754,
            lon: 106.8272,
        });
        let elements = vec![
            element(&[("tourism", "museum")], Some(-6.1), Some(106.8)),
            element(&[("name", "No position")], None, None),
            with_center,
            element(
                &[("name", "Museum Nasional"), ("tourism", "museum")],
                Some(-6.1763),
                Some(106.8222),
            ),
            element(&[("name", "Ancol"), ("tourism", "theme_park")], Some(-6.12), Some(106.83)),
        ];

        let mut rng = Rng::with_seed(3);
        let planned = plan_trips(&elements, 2, &mut rng);
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].values.name, "Monas");
        assert!((planned[0].values.start_latitude + 6.1754).abs() < f64::EPSILON);
        assert_eq!(planned[1].values.name, "Museum Nasional");
        assert_eq!(planned[1].preference_names, TourismType::Museum.preferences());
        assert_eq!(planned[1].points.len(), 3);
    }

    #[test]
    fn description_mentions_known_contact_details() {
        let e = element(
            &[("name", "x"), ("addr:full", "Jl. Medan Merdeka"), ("phone", "021")],
            None,
            None,
        );
        let description = describe(&e);
        assert!(description.contains("Located at Jl. Medan Merdeka."));
        assert!(description.contains("Contact: 021."));
        assert!(!description.contains("website"));
    }

    #[test]
    fn query_covers_every_element_type() {
        let query = build_query(JAKARTA_BBOX);
        assert!(query.starts_with("[out:json]"));
        assert!(query.contains("node[\"tourism\""));
        assert!(query.contains("relation[\"tourism\""));
        assert!(query.contains("theme_park"));
        assert!(query.contains("(-6.3713,106.6486,-6.0835,106.9758)"));
        assert!(query.ends_with("out center;"));
    }
}
