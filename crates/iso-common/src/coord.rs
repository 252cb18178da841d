//! Geographic coordinate pairs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IsoError;

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lon, self.lat)
    }
}

/// Parses "lon,lat".
impl FromStr for Coordinate {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| IsoError::InvalidCoordinate(format!("{}. Expected 'lon,lat'", s)))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| IsoError::InvalidCoordinate(format!("invalid longitude '{}'", lon)))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| IsoError::InvalidCoordinate(format!("invalid latitude '{}'", lat)))?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(IsoError::InvalidCoordinate(s.to_string()));
        }
        Ok(Self { lon, lat })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let c: Coordinate = "2.3488, 48.8533".parse().unwrap();
        assert_eq!(c, Coordinate::new(2.3488, 48.8533));
        assert_eq!(c.to_string(), "2.348800,48.853300");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2.3488".parse::<Coordinate>().is_err());
        assert!("east,north".parse::<Coordinate>().is_err());
    }
}
