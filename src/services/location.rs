//! Location hint — coordinates supplied by the connecting request.
//!
//! Query parameters (`lat`, `lng`) take precedence over the Cloudflare
//! visitor-location headers (`cf-iplatitude`, `cf-iplongitude`). A value
//! that is missing, non-finite, or out of range counts as absent.

use std::collections::HashMap;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::message::Position;

pub const LAT_HEADER: &str = "cf-iplatitude";
pub const LNG_HEADER: &str = "cf-iplongitude";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocationHint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationHint {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat: Some(lat), lng: Some(lng) }
    }

    /// Build a hint from the upgrade request's query string and headers.
    #[must_use]
    pub fn from_request(query: &HashMap<String, String>, headers: &HeaderMap) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let lat = query
            .get("lat")
            .and_then(|v| parse_coordinate(v, 90.0))
            .or_else(|| header(LAT_HEADER).and_then(|v| parse_coordinate(v, 90.0)));
        let lng = query
            .get("lng")
            .and_then(|v| parse_coordinate(v, 180.0))
            .or_else(|| header(LNG_HEADER).and_then(|v| parse_coordinate(v, 180.0)));
        Self { lat, lng }
    }

    /// Resolve into a position owned by `id`. `None` if either coordinate is absent.
    #[must_use]
    pub fn resolve(self, id: Uuid) -> Option<Position> {
        Some(Position { lat: self.lat?, lng: self.lng?, id })
    }
}

fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value.abs() <= limit).then_some(value)
}
