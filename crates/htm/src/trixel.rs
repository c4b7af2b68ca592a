//! Trixel records: vertices, subdivision, naming, and containment.

use nalgebra::Vector3;
use serde::Serialize;
use wind_common::{WindError, WindResult};

/// Boundary tolerance for the great-circle half-space tests. Inclusive on
/// shared edges, so a boundary point is contained in every adjacent trixel;
/// the descent order decides which one claims it.
pub(crate) const EPSILON: f64 = f64::EPSILON;

/// Octahedron corner vertices on the unit sphere.
const OCTAHEDRON: [[f64; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, -1.0],
];

/// Root trixels in scan order: label and octahedron vertex indices.
const ROOTS: [(&str, [usize; 3]); 8] = [
    ("N0", [1, 0, 4]),
    ("N1", [4, 0, 3]),
    ("N2", [3, 0, 2]),
    ("N3", [2, 0, 1]),
    ("S0", [1, 5, 2]),
    ("S1", [2, 5, 3]),
    ("S2", [3, 5, 4]),
    ("S3", [4, 5, 1]),
];

/// Unit-sphere vector for a geodetic position in degrees.
pub fn unit_vector(lat: f64, lon: f64) -> Vector3<f64> {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    Vector3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}

/// Geodetic (lat, lon) in degrees for a unit-sphere vector.
pub fn to_lat_lon(v: &Vector3<f64>) -> (f64, f64) {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    (lat, lon)
}

/// Geodesic midpoint of two points on the unit sphere.
fn midpoint(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (a + b).normalize()
}

/// One triangular region of the subdivided sphere.
///
/// Immutable once built; vertices are unit vectors in counter-clockwise
/// order as seen from outside the sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Trixel {
    pub name: String,
    pub vertices: [Vector3<f64>; 3],
}

/// Wire form of a trixel: name plus geodetic `[lat, lon]` vertices.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrixelGeometry {
    pub name: String,
    pub vertices: [[f64; 2]; 3],
}

impl Trixel {
    /// The eight root trixels in fixed scan order.
    pub fn roots() -> Vec<Trixel> {
        ROOTS
            .iter()
            .map(|(name, [a, b, c])| Trixel {
                name: (*name).to_string(),
                vertices: [
                    Vector3::from(OCTAHEDRON[*a]),
                    Vector3::from(OCTAHEDRON[*b]),
                    Vector3::from(OCTAHEDRON[*c]),
                ],
            })
            .collect()
    }

    /// Depth of this trixel; roots are depth 0.
    pub fn depth(&self) -> usize {
        self.name.bytes().filter(|b| *b == b'-').count()
    }

    /// Whether the unit vector lies within this trixel.
    ///
    /// Three great-circle half-space tests, inclusive on the boundary.
    /// f64 precision holds for all trixels up to at least depth 20.
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        let [v0, v1, v2] = &self.vertices;
        v0.cross(v1).dot(p) >= -EPSILON
            && v1.cross(v2).dot(p) >= -EPSILON
            && v2.cross(v0).dot(p) >= -EPSILON
    }

    /// The four child trixels, in naming order.
    pub fn children(&self) -> [Trixel; 4] {
        let [v0, v1, v2] = &self.vertices;
        let w0 = midpoint(v1, v2);
        let w1 = midpoint(v2, v0);
        let w2 = midpoint(v0, v1);

        let child = |idx: usize, vertices: [Vector3<f64>; 3]| Trixel {
            name: format!("{}-{}", self.name, idx),
            vertices,
        };

        [
            child(0, [*v0, w2, w1]),
            child(1, [*v1, w0, w2]),
            child(2, [*v2, w1, w0]),
            child(3, [w0, w1, w2]),
        ]
    }

    /// All descendants at the given absolute depth, in naming order.
    pub fn descendants_at(&self, depth: usize) -> Vec<Trixel> {
        assert!(depth >= self.depth(), "target depth shallower than this trixel");

        let mut level = vec![self.clone()];
        for _ in self.depth()..depth {
            level = level.iter().flat_map(|t| t.children()).collect();
        }
        level
    }

    /// Normalized centroid of the trixel on the unit sphere.
    pub fn midpoint(&self) -> Vector3<f64> {
        let [v0, v1, v2] = &self.vertices;
        (v0 + v1 + v2).normalize()
    }

    /// Re-derive a trixel from its hierarchical name.
    pub fn by_name(name: &str) -> WindResult<Trixel> {
        let mut parts = name.split('-');
        let root_label = parts
            .next()
            .ok_or_else(|| WindError::InvalidTrixelName(name.to_string()))?;

        let mut trixel = Trixel::roots()
            .into_iter()
            .find(|t| t.name == root_label)
            .ok_or_else(|| WindError::InvalidTrixelName(name.to_string()))?;

        for part in parts {
            let idx: usize = match part {
                "0" => 0,
                "1" => 1,
                "2" => 2,
                "3" => 3,
                _ => return Err(WindError::InvalidTrixelName(name.to_string())),
            };
            trixel = trixel.children()[idx].clone();
        }

        Ok(trixel)
    }

    /// Name of the ancestor at the given depth.
    pub fn ancestor_name(name: &str, depth: usize) -> String {
        name.split('-')
            .take(depth + 1)
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Geodetic representation for the wire.
    pub fn geometry(&self) -> TrixelGeometry {
        TrixelGeometry {
            name: self.name.clone(),
            vertices: self.vertices.map(|v| {
                let (lat, lon) = to_lat_lon(&v);
                [lat, lon]
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_cover_sphere() {
        let roots = Trixel::roots();
        assert_eq!(roots.len(), 8);

        // every probe point lands in at least one root
        for lat in [-89.0, -45.0, 0.0, 33.3, 89.0] {
            for lon in [-179.0, -90.0, 0.0, 60.5, 179.0] {
                let p = unit_vector(lat, lon);
                assert!(
                    roots.iter().any(|r| r.contains(&p)),
                    "({}, {}) in no root",
                    lat,
                    lon
                );
            }
        }
    }

    #[test]
    fn test_children_partition_parent() {
        let parent = Trixel::roots().into_iter().next().unwrap();
        let children = parent.children();

        // the centroid of each child lies in the parent
        for child in &children {
            assert!(parent.contains(&child.midpoint()));
        }

        // a parent interior point lies in exactly one child modulo edges
        let p = parent.midpoint();
        assert!(children.iter().any(|c| c.contains(&p)));
    }

    #[test]
    fn test_names_and_depths() {
        let root = Trixel::roots().into_iter().next().unwrap();
        assert_eq!(root.name, "N0");
        assert_eq!(root.depth(), 0);

        let grandchild = root.children()[3].children()[1].clone();
        assert_eq!(grandchild.name, "N0-3-1");
        assert_eq!(grandchild.depth(), 2);
    }

    #[test]
    fn test_by_name_round_trips() {
        let trixel = Trixel::by_name("S2-1-0-3").unwrap();
        assert_eq!(trixel.name, "S2-1-0-3");
        assert_eq!(trixel.depth(), 3);

        // same vertices as walking the tree directly
        let walked = Trixel::roots()[6].children()[1].children()[0].children()[3].clone();
        assert_eq!(trixel, walked);
    }

    #[test]
    fn test_by_name_rejects_garbage() {
        assert!(Trixel::by_name("X9").is_err());
        assert!(Trixel::by_name("N0-4").is_err());
        assert!(Trixel::by_name("N0--1").is_err());
    }

    #[test]
    fn test_ancestor_name() {
        assert_eq!(Trixel::ancestor_name("N0-3-1-2", 2), "N0-3-1");
        assert_eq!(Trixel::ancestor_name("N0-3-1-2", 0), "N0");
    }

    #[test]
    fn test_geometry_is_geodetic() {
        let geom = Trixel::by_name("N3").unwrap().geometry();
        assert_eq!(geom.name, "N3");
        // N3 spans the first quadrant around the north pole; v1 is the pole
        assert!((geom.vertices[1][0] - 90.0).abs() < 1e-9);
    }
}
