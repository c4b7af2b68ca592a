//! Wind sample type and its positional wire encoding.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

/// One wind measurement: geodetic position, altitude, and a 3D velocity
/// vector. Immutable once ingested.
///
/// On the wire (and in persisted indexes) a sample is the positional array
/// `[lat, lon, alt, u, v, w]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude in meters
    pub alt: f64,
    /// Eastward wind component (m/s)
    pub u: f64,
    /// Northward wind component (m/s)
    pub v: f64,
    /// Vertical wind component (m/s)
    pub w: f64,
}

impl Sample {
    pub fn new(lat: f64, lon: f64, alt: f64, u: f64, v: f64, w: f64) -> Self {
        Self {
            lat,
            lon,
            alt,
            u,
            v,
            w,
        }
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(6)?;
        tup.serialize_element(&self.lat)?;
        tup.serialize_element(&self.lon)?;
        tup.serialize_element(&self.alt)?;
        tup.serialize_element(&self.u)?;
        tup.serialize_element(&self.v)?;
        tup.serialize_element(&self.w)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for Sample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SampleVisitor;

        impl<'de> Visitor<'de> for SampleVisitor {
            type Value = Sample;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an array [lat, lon, alt, u, v, w]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Sample, A::Error> {
                let mut next = |idx: usize| -> Result<f64, A::Error> {
                    seq.next_element()?
                        .ok_or_else(|| de::Error::invalid_length(idx, &self))
                };
                Ok(Sample {
                    lat: next(0)?,
                    lon: next(1)?,
                    alt: next(2)?,
                    u: next(3)?,
                    v: next(4)?,
                    w: next(5)?,
                })
            }
        }

        deserializer.deserialize_tuple(6, SampleVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_serializes_as_positional_array() {
        let sample = Sample::new(52.5, 13.3, 80.0, 1.5, -2.0, 0.25);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, "[52.5,13.3,80.0,1.5,-2.0,0.25]");
    }

    #[test]
    fn test_sample_deserializes_from_array() {
        let sample: Sample = serde_json::from_str("[52.5,13.3,80,1.5,-2,0.25]").unwrap();
        assert_eq!(sample, Sample::new(52.5, 13.3, 80.0, 1.5, -2.0, 0.25));
    }

    #[test]
    fn test_sample_rejects_short_array() {
        let result: Result<Sample, _> = serde_json::from_str("[52.5,13.3,80]");
        assert!(result.is_err());
    }
}
