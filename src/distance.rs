//! Distance primitives for nearest-neighbor queries.
//!
//! This module provides two distance calculations:
//!
//! - [`box_distance`], a lower bound on the distance between two bounding boxes, with optional
//!   wraparound of the x axis for longitudes. This is what drives the priority queue in
//!   [`nearby`][crate::knn::nearby].
//! - [`point_distance`] and [`Ruler`], a locally linearized approximation of the distance in
//!   meters between two longitude/latitude points on the WGS84 ellipsoid.
//!
//! The two are **not** in the same units. [`box_distance`] returns a sum of squared coordinate
//! gaps, which preserves ordering but is neither in degrees nor in meters. Don't compare its
//! output with [`point_distance`] without taking that into account.

use std::f64::consts::PI;

use crate::bbox::BoundingBox;

/// WGS84 equatorial radius, in kilometers.
pub const WGS84_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1. / 298.257223563;

/// WGS84 eccentricity squared.
const E2: f64 = WGS84_FLATTENING * (2. - WGS84_FLATTENING);

const RAD: f64 = PI / 180.;

/// Degrees to radians combined with kilometers to meters.
const M: f64 = RAD * WGS84_EQUATORIAL_RADIUS_KM * 1000.;

/// Squared-gap lower bound on the distance between box `a` and box `b`.
///
/// On each axis the gap is `max(a_min, b_min) - min(a_max, b_max)`. A gap that is zero or
/// negative means the boxes overlap on that axis and contributes nothing; otherwise the gap
/// contributes `gap * gap`. The result is the sum over both axes, **without** a final square
/// root.
///
/// When `wrap_x` is set, the x gap is also measured with `a` shifted by -360 and by +360 and the
/// smallest of the three is used, which treats the x axis as a longitude cylinder where -180 and
/// +180 meet.
///
/// ```
/// use geo_knn::bbox::BoundingBox;
/// use geo_knn::distance::box_distance;
///
/// let a = BoundingBox::new([0., 0.], [1., 1.]);
/// let b = BoundingBox::new([4., 5.], [6., 6.]);
/// assert_eq!(box_distance(&a, &b, false), 3. * 3. + 4. * 4.);
/// assert_eq!(box_distance(&a, &a, false), 0.);
/// ```
pub fn box_distance(a: &BoundingBox, b: &BoundingBox, wrap_x: bool) -> f64 {
    let mut dist = 0.;

    // X
    let mut gap = axis_gap(a.min[0], a.max[0], b.min[0], b.max[0]);
    if wrap_x {
        let left = axis_gap(a.min[0] - 360., a.max[0] - 360., b.min[0], b.max[0]);
        let right = axis_gap(a.min[0] + 360., a.max[0] + 360., b.min[0], b.max[0]);
        gap = gap.min(left.min(right));
    }
    if gap > 0. {
        dist += gap * gap;
    }

    // Y
    let gap = axis_gap(a.min[1], a.max[1], b.min[1], b.max[1]);
    if gap > 0. {
        dist += gap * gap;
    }

    dist
}

/// Signed gap between two ranges on one axis. Non-positive when they overlap.
#[inline]
fn axis_gap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    a_min.max(b_min) - a_max.min(b_max)
}

/// Approximate distance in meters between two points near a reference latitude.
///
/// Both points are `[longitude, latitude]` in degrees, and `lat` is the reference latitude in
/// degrees. The first component is scaled along the parallel and the second along the meridian.
/// See [`Ruler`] for the model and its limits.
///
/// ```
/// use geo_knn::distance::point_distance;
///
/// let d = point_distance([-0.1, 51.5], [-0.1, 51.501], 51.5);
/// assert!((d - 111.26).abs() < 0.01);
/// ```
pub fn point_distance(a: [f64; 2], b: [f64; 2], lat: f64) -> f64 {
    Ruler::new(lat).distance(a, b)
}

/// Fast approximation of distances on the WGS84 ellipsoid around a fixed latitude.
///
/// The ruler linearizes the ellipsoid at the reference latitude: one degree of longitude is
/// `kx` meters (from the normal radius of curvature) and one degree of latitude is `ky` meters
/// (from the meridional radius of curvature). Distances are then measured in that local plane.
///
/// This is accurate for short distances close to the reference latitude and degrades as points
/// move away from it. It stays numerically defined at the poles, where `kx` goes to zero.
///
/// Building a ruler costs a cosine and a square root, so keep one around when scoring many items
/// against the same reference latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruler {
    kx: f64,
    ky: f64,
}

impl Ruler {
    /// Create a ruler for the given reference latitude in degrees.
    pub fn new(lat: f64) -> Self {
        let cos_lat = (lat * RAD).cos();
        let w2 = 1. / (1. - E2 * (1. - cos_lat * cos_lat));
        let w = w2.sqrt();

        Self {
            kx: M * w * cos_lat,
            ky: M * w * w2 * (1. - E2),
        }
    }

    /// Meters per degree along the first coordinate.
    pub fn kx(&self) -> f64 {
        self.kx
    }

    /// Meters per degree along the second coordinate.
    pub fn ky(&self) -> f64 {
        self.ky
    }

    /// Distance in meters between two `[longitude, latitude]` points.
    pub fn distance(&self, a: [f64; 2], b: [f64; 2]) -> f64 {
        let dx = (a[0] - b[0]) * self.kx;
        let dy = (a[1] - b[1]) * self.ky;
        (dx * dx + dy * dy).sqrt()
    }
}
