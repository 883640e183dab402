//! Great-circle geometry on a spherical Earth.
//!
//! All lane weights and snapping distances go through [`haversine_km`] so that
//! load-time edge weights and query-time measurements agree exactly for the
//! same input. The sphere radius is fixed at [`EARTH_RADIUS_KM`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres used for every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const KM_PER_MILE: f64 = 1.609_344;
const KM_PER_NAUTICAL_MILE: f64 = 1.852;
const KM_PER_FOOT: f64 = 0.000_304_8;

/// Validated geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate in kilometres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }

    /// Position on the unit sphere. Chord length between two of these vectors
    /// grows monotonically with great-circle distance.
    pub fn unit_vector(&self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    /// Parse the `"latitude,longitude"` text form.
    fn from_str(s: &str) -> Result<Self> {
        let parse_error = || Error::CoordinateParse {
            input: s.to_string(),
        };
        let (lat, lon) = s.split_once(',').ok_or_else(parse_error)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| parse_error())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| parse_error())?;
        Coordinate::new(latitude, longitude)
    }
}

/// Haversine great-circle distance between two coordinates in kilometres.
///
/// The haversine term is clamped to `[0, 1]` so rounding near antipodal pairs
/// yields `pi * EARTH_RADIUS_KM` rather than NaN.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Output unit for reported route distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Meters,
    Miles,
    NauticalMiles,
    Feet,
}

impl DistanceUnit {
    /// Convert a distance in kilometres into this unit.
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Meters => km * 1000.0,
            DistanceUnit::Miles => km / KM_PER_MILE,
            DistanceUnit::NauticalMiles => km / KM_PER_NAUTICAL_MILE,
            DistanceUnit::Feet => km / KM_PER_FOOT,
        }
    }

    /// Short label used in text output.
    pub fn symbol(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
            DistanceUnit::Miles => "mi",
            DistanceUnit::NauticalMiles => "nm",
            DistanceUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DistanceUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "m" | "meters" | "metres" => Ok(DistanceUnit::Meters),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            "nm" | "nmi" | "nautical_miles" => Ok(DistanceUnit::NauticalMiles),
            "ft" | "feet" => Ok(DistanceUnit::Feet),
            other => Err(Error::UnsupportedUnit {
                unit: other.to_string(),
            }),
        }
    }
}
