//! Spherical cap (halfspace) queries against trixels.
//!
//! A halfspace is the region of the unit sphere on one side of a plane
//! `vector . p > distance`. A geodesic disk of radius r meters centered at
//! a point maps to the halfspace with that point's unit vector and
//! `distance = cos(r / EARTH_RADIUS)`.

use nalgebra::Vector3;
use wind_common::{GeodeticPoint, EARTH_RADIUS};

use crate::trixel::{unit_vector, Trixel, EPSILON};

/// How a trixel relates to a halfspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapIntersection {
    Outside,
    Partial,
    Full,
}

/// A spherical cap: unit normal vector and plane distance from the origin.
#[derive(Debug, Clone)]
pub struct Halfspace {
    pub vector: Vector3<f64>,
    pub distance: f64,
}

impl Halfspace {
    /// Cap covering the geodesic disk of `radius_m` meters around a point.
    pub fn from_radius(center: GeodeticPoint, radius_m: f64) -> Self {
        Self {
            vector: unit_vector(center.lat, center.lon),
            distance: (radius_m / EARTH_RADIUS).cos(),
        }
    }

    /// Angular radius of the cap.
    pub fn arc_angle(&self) -> f64 {
        self.distance.clamp(-1.0, 1.0).acos()
    }

    /// Classify a trixel against this halfspace.
    pub fn classify(&self, trixel: &Trixel) -> CapIntersection {
        let [v0, v1, v2] = &trixel.vertices;
        let v = &self.vector;
        let d = self.distance;

        let v0_inside = v.dot(v0) > d;
        let v1_inside = v.dot(v1) > d;
        let v2_inside = v.dot(v2) > d;

        if v0_inside && v1_inside && v2_inside {
            return CapIntersection::Full;
        }
        if v0_inside || v1_inside || v2_inside {
            return CapIntersection::Partial;
        }

        // No corner inside. Reject early when the trixel's bounding circle
        // cannot reach the cap.
        let bounding_normal = (v1 - v0).cross(&(v2 - v1)).normalize();
        let bounding_distance = v0.dot(&bounding_normal);
        let bounding_arc = bounding_distance.clamp(-1.0, 1.0).acos();

        let theta = angle_between(v, &bounding_normal);
        if theta >= self.arc_angle() + bounding_arc {
            return CapIntersection::Outside;
        }

        // The cap may still clip an edge without holding any corner: the
        // cap boundary crosses the edge arc iff the constraint quadratic
        // has a root with parameter s in [0, 1].
        for (vi, vj) in [(v0, v1), (v1, v2), (v2, v0)] {
            let theta_ij = angle_between(vi, vj);
            let u = (theta_ij / 2.0).tan();
            let u2 = u * u;

            let gamma_i = v.dot(vi);
            let gamma_j = v.dot(vj);

            let a = -u2 * (gamma_i + d);
            let b = gamma_i * (u2 - 1.0) + gamma_j * (u2 + 1.0);
            let c = gamma_i - d;

            if quadratic_root_in_unit_interval(a, b, c) {
                return CapIntersection::Partial;
            }
        }

        // Either the cap lies entirely inside the triangle, or entirely
        // outside it.
        for (vi, vj) in [(v0, v1), (v1, v2), (v2, v0)] {
            if vi.cross(vj).dot(v) < -EPSILON {
                return CapIntersection::Outside;
            }
        }

        CapIntersection::Partial
    }
}

fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let val = a.dot(b) / (a.norm() * b.norm());
    val.clamp(-1.0, 1.0).acos()
}

/// Whether `a s^2 + b s + c = 0` has a real root with `0 <= s <= 1`.
fn quadratic_root_in_unit_interval(a: f64, b: f64, c: f64) -> bool {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return false;
        }
        let s = -c / b;
        return (0.0..=1.0).contains(&s);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return false;
    }

    let sqrt_disc = disc.sqrt();
    let s1 = (-b + sqrt_disc) / (2.0 * a);
    let s2 = (-b - sqrt_disc) / (2.0 * a);
    (0.0..=1.0).contains(&s1) || (0.0..=1.0).contains(&s2)
}
