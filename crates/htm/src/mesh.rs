//! Leaf-depth mesh operations: point assignment and radius queries.

use wind_common::{GeodeticPoint, WindError, WindResult};

use crate::halfspace::{CapIntersection, Halfspace};
use crate::trixel::{unit_vector, Trixel};

/// The subdivided mesh at a fixed leaf depth.
///
/// Purely structural: no per-dataset state, so one mesh value serves every
/// dataset ingested or queried at that depth. Assignment descends from the
/// roots and costs O(depth) per point regardless of total mesh size.
#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    depth: usize,
}

impl Mesh {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf trixel containing the given geodetic point.
    ///
    /// Children are tested in index order 0..3 and roots in the fixed scan
    /// order N0..N3, S0..S3; the first container wins, so a point exactly
    /// on a shared edge is claimed by exactly one deterministic leaf.
    pub fn assign(&self, point: GeodeticPoint) -> WindResult<Trixel> {
        let p = unit_vector(point.lat, point.lon);

        let outside = || WindError::PointOutsideMesh {
            lat: point.lat,
            lon: point.lon,
        };

        let mut trixel = Trixel::roots()
            .into_iter()
            .find(|t| t.contains(&p))
            .ok_or_else(outside)?;

        for _ in 0..self.depth {
            trixel = trixel
                .children()
                .into_iter()
                .find(|t| t.contains(&p))
                .ok_or_else(outside)?;
        }

        Ok(trixel)
    }

    /// All leaf trixels whose region intersects the given geodesic disk.
    ///
    /// Radius 0 degenerates to the single trixel containing the center. A
    /// radius spanning the whole sphere yields the complete leaf set. The
    /// result is sorted by name, so identical inputs produce identical
    /// output for caching clients.
    pub fn trixels_near(&self, center: GeodeticPoint, radius_m: f64) -> WindResult<Vec<Trixel>> {
        if radius_m <= 0.0 {
            return Ok(vec![self.assign(center)?]);
        }

        let halfspace = Halfspace::from_radius(center, radius_m);
        Ok(self.trixels_within(&halfspace))
    }

    /// Leaf trixels intersecting a halfspace.
    ///
    /// Hierarchical range query: descend from the roots, dropping OUTSIDE
    /// subtrees and setting FULL subtrees aside without further tests;
    /// FULL subtrees are expanded to leaf depth at the end.
    pub fn trixels_within(&self, halfspace: &Halfspace) -> Vec<Trixel> {
        let mut full = Vec::new();
        let mut partial = Vec::new();

        for root in Trixel::roots() {
            match halfspace.classify(&root) {
                CapIntersection::Full => full.push(root),
                CapIntersection::Partial => partial.push(root),
                CapIntersection::Outside => {}
            }
        }

        for _ in 0..self.depth {
            let mut next = Vec::new();
            for trixel in partial {
                for child in trixel.children() {
                    match halfspace.classify(&child) {
                        CapIntersection::Full => full.push(child),
                        CapIntersection::Partial => next.push(child),
                        CapIntersection::Outside => {}
                    }
                }
            }
            partial = next;
        }

        let mut leaves = partial;
        for trixel in full {
            leaves.extend(trixel.descendants_at(self.depth));
        }

        leaves.sort_by(|a, b| a.name.cmp(&b.name));
        leaves
    }
}
