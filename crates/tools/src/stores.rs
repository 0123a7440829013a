//! Store locator backed by a fixed catalog of store coordinates.

use async_trait::async_trait;
use cxbot_core::error::ToolError;
use cxbot_core::retail::{Store, StoreLocator};
use tracing::debug;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A catalog entry: a store and where it is.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreLocation {
    pub store: Store,
    pub lat: f64,
    pub lon: f64,
}

impl StoreLocation {
    pub fn new(id: &str, name: &str, lat: f64, lon: f64) -> Self {
        Self {
            store: Store {
                id: id.into(),
                name: name.into(),
            },
            lat,
            lon,
        }
    }
}

/// Returns catalog stores within `radius_km`, nearest first, at most `limit`.
#[derive(Debug, Clone)]
pub struct StaticStoreLocator {
    catalog: Vec<StoreLocation>,
    radius_km: f64,
    limit: usize,
}

impl StaticStoreLocator {
    pub fn new(catalog: Vec<StoreLocation>, radius_km: f64, limit: usize) -> Self {
        Self {
            catalog,
            radius_km,
            limit,
        }
    }
}

impl Default for StaticStoreLocator {
    fn default() -> Self {
        Self::new(
            vec![
                StoreLocation::new("S001", "Downtown Roastery", 40.7128, -74.0060),
                StoreLocation::new("S002", "Union Square Cafe", 40.7359, -73.9911),
                StoreLocation::new("S003", "Brooklyn Heights Kiosk", 40.6960, -73.9937),
                StoreLocation::new("S004", "Mission District Bar", 37.7599, -122.4148),
                StoreLocation::new("S005", "Embarcadero Express", 37.7955, -122.3937),
                StoreLocation::new("S006", "Shoreditch Corner", 51.5265, -0.0795),
            ],
            25.0,
            3,
        )
    }
}

#[async_trait]
impl StoreLocator for StaticStoreLocator {
    async fn nearby_stores(&self, lat: f64, lon: f64) -> Result<Vec<Store>, ToolError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ToolError::InvalidArguments(format!(
                "latitude {lat} is out of range"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ToolError::InvalidArguments(format!(
                "longitude {lon} is out of range"
            )));
        }

        let mut nearby: Vec<(f64, &StoreLocation)> = self
            .catalog
            .iter()
            .map(|loc| (haversine_km(lat, lon, loc.lat, loc.lon), loc))
            .filter(|(distance, _)| *distance <= self.radius_km)
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        debug!(
            in_radius = nearby.len(),
            radius_km = self.radius_km,
            "Store lookup"
        );

        Ok(nearby
            .into_iter()
            .take(self.limit)
            .map(|(_, loc)| loc.store.clone())
            .collect())
    }
}

/// Great-circle distance between two points, in kilometers.
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
