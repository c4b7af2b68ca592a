//! Universal Transverse Mercator inverse projection.
//!
//! Converts projected UTM coordinates (zone, hemisphere, easting, northing)
//! back to geodetic latitude/longitude on the WGS84 ellipsoid, using the
//! Krüger series expansion.
//!
//! The projection parameters are:
//! - Zone: 6-degree longitudinal band, 1..=60
//! - Hemisphere: North or South (selects the false northing)
//! - Easting: meters from the zone's central meridian plus 500 km false easting
//! - Northing: meters from the equator (plus 10 000 km false northing in the south)

use serde::{Deserialize, Serialize};
use wind_common::{GeodeticPoint, WindError, WindResult};

/// UTM scale factor at the central meridian.
const K0: f64 = 0.9996;

/// WGS84 equatorial radius in meters.
const R: f64 = 6_378_137.0;

/// WGS84 first eccentricity squared.
const E: f64 = 0.006_694_38;

const E2: f64 = E * E;
const E3: f64 = E2 * E;

/// e'^2 = e^2 / (1 - e^2)
const E_P2: f64 = E / (1.0 - E);

const M1: f64 = 1.0 - E / 4.0 - 3.0 * E2 / 64.0 - 5.0 * E3 / 256.0;

/// Valid easting range in meters.
const EASTING_RANGE: std::ops::RangeInclusive<f64> = 100_000.0..=1_000_000.0;

/// Valid northing range in meters.
const NORTHING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10_000_000.0;

/// Hemisphere selector for a UTM coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Parse the single-letter form used in dataset descriptors.
    pub fn parse(s: &str) -> WindResult<Self> {
        match s {
            "N" | "n" => Ok(Hemisphere::North),
            "S" | "s" => Ok(Hemisphere::South),
            other => Err(WindError::InvalidProjectionInput(format!(
                "hemisphere must be \"N\" or \"S\", got \"{}\"",
                other
            ))),
        }
    }
}

/// A validated UTM zone/hemisphere pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    /// Create a zone, validating the 1..=60 zone index.
    pub fn new(zone: i64, hemisphere: Hemisphere) -> WindResult<Self> {
        if !(1..=60).contains(&zone) {
            return Err(WindError::InvalidProjectionInput(format!(
                "UTM zone must be in 1..=60, got {}",
                zone
            )));
        }
        Ok(Self {
            zone: zone as u8,
            hemisphere,
        })
    }

    /// Central meridian of the zone in degrees.
    pub fn central_meridian_deg(&self) -> f64 {
        (self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Convert a UTM easting/northing to geodetic latitude/longitude.
    ///
    /// Inverse transverse Mercator, Krüger series on WGS84. Accurate to
    /// well under a meter across the valid coordinate range.
    pub fn to_geodetic(&self, easting: f64, northing: f64) -> WindResult<GeodeticPoint> {
        if !EASTING_RANGE.contains(&easting) {
            return Err(WindError::InvalidProjectionInput(format!(
                "easting {} outside valid range {:?}",
                easting, EASTING_RANGE
            )));
        }
        if !NORTHING_RANGE.contains(&northing) {
            return Err(WindError::InvalidProjectionInput(format!(
                "northing {} outside valid range {:?}",
                northing, NORTHING_RANGE
            )));
        }

        let x = easting - 500_000.0;
        let y = match self.hemisphere {
            Hemisphere::North => northing,
            Hemisphere::South => northing - 10_000_000.0,
        };

        // Footpoint latitude from the rectifying latitude mu
        let m = y / K0;
        let mu = m / (R * M1);

        let e1 = (1.0 - (1.0 - E).sqrt()) / (1.0 + (1.0 - E).sqrt());
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;

        let p2 = 3.0 / 2.0 * e1 - 27.0 / 32.0 * e1_3;
        let p3 = 21.0 / 16.0 * e1_2 - 55.0 / 32.0 * e1_4;
        let p4 = 151.0 / 96.0 * e1_3;
        let p5 = 1097.0 / 512.0 * e1_4;

        let p_rad = mu
            + p2 * (2.0 * mu).sin()
            + p3 * (4.0 * mu).sin()
            + p4 * (6.0 * mu).sin()
            + p5 * (8.0 * mu).sin();

        let p_sin = p_rad.sin();
        let p_cos = p_rad.cos();
        let p_tan = p_sin / p_cos;
        let p_tan2 = p_tan * p_tan;
        let p_tan4 = p_tan2 * p_tan2;

        let ep_sin = 1.0 - E * p_sin * p_sin;
        let n = R / ep_sin.sqrt();
        // n / r_curv, with r_curv the meridional radius of curvature
        let r = (1.0 - E) / ep_sin;

        let c = E_P2 * p_cos * p_cos;
        let c2 = c * c;

        let d = x / (n * K0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = p_rad
            - (p_tan / r)
                * (d2 / 2.0 - d4 / 24.0 * (5.0 + 3.0 * p_tan2 + 10.0 * c - 4.0 * c2 - 9.0 * E_P2)
                    + d6 / 720.0
                        * (61.0 + 90.0 * p_tan2 + 298.0 * c + 45.0 * p_tan4
                            - 252.0 * E_P2
                            - 3.0 * c2));

        let lon = (d - d3 / 6.0 * (1.0 + 2.0 * p_tan2 + c)
            + d5 / 120.0
                * (5.0 - 2.0 * c + 28.0 * p_tan2 - 3.0 * c2 + 8.0 * E_P2 + 24.0 * p_tan4))
            / p_cos;

        Ok(GeodeticPoint::new(
            lat.to_degrees(),
            lon.to_degrees() + self.central_meridian_deg(),
        ))
    }
}

/// A dataset's projected grid frame: zone, corner rectangle, and whether
/// raw-file coordinates are offsets relative to the lower-left corner.
#[derive(Debug, Clone, Copy)]
pub struct UtmGrid {
    pub zone: UtmZone,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub relative: bool,
}

impl UtmGrid {
    /// Create a grid frame from two projected corners (any order).
    ///
    /// Fails when the corners describe a degenerate rectangle (zero width
    /// or height).
    pub fn new(zone: UtmZone, corners: [[f64; 2]; 2], relative: bool) -> WindResult<Self> {
        let min_x = corners[0][0].min(corners[1][0]);
        let max_x = corners[0][0].max(corners[1][0]);
        let min_y = corners[0][1].min(corners[1][1]);
        let max_y = corners[0][1].max(corners[1][1]);

        if min_x == max_x || min_y == max_y {
            return Err(WindError::InvalidProjectionInput(format!(
                "corners ({}, {})..({}, {}) do not form a rectangle",
                min_x, min_y, max_x, max_y
            )));
        }

        Ok(Self {
            zone,
            min_x,
            min_y,
            max_x,
            max_y,
            relative,
        })
    }

    /// Resolve a raw-file coordinate to an absolute UTM coordinate.
    ///
    /// In relative mode coordinates are offsets anchored at the lower-left
    /// corner; otherwise they are absolute easting/northing already.
    pub fn resolve(&self, x: f64, y: f64) -> (f64, f64) {
        if self.relative {
            (self.min_x + x, self.min_y + y)
        } else {
            (x, y)
        }
    }

    /// Project a raw-file coordinate to geodetic latitude/longitude.
    pub fn to_geodetic(&self, x: f64, y: f64) -> WindResult<GeodeticPoint> {
        let (easting, northing) = self.resolve(x, y);
        self.zone.to_geodetic(easting, northing)
    }

    /// Geodetic positions of the lower-left and upper-right corners.
    pub fn geodetic_corners(&self) -> WindResult<(GeodeticPoint, GeodeticPoint)> {
        let lower_left = self.zone.to_geodetic(self.min_x, self.min_y)?;
        let upper_right = self.zone.to_geodetic(self.max_x, self.max_y)?;
        Ok((lower_left, upper_right))
    }
}
