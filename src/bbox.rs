//! Axis-aligned bounding boxes.

use geo_traits::{
    CoordTrait, Dimensions, GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection,
    UnimplementedLine, UnimplementedLineString, UnimplementedMultiLineString,
    UnimplementedMultiPoint, UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon,
    UnimplementedTriangle,
};

use crate::error::{GeoKnnError, Result};

/// An axis-aligned bounding box described by its minimum and maximum corners.
///
/// For geographic data the first component of each corner is the longitude and the second the
/// latitude, but nothing in this crate depends on that beyond the x-axis wraparound of
/// [`box_distance`][crate::distance::box_distance].
///
/// [`BoundingBox::new`] does not check that `min <= max` on each axis. That is the job of
/// whoever produces the boxes; use [`BoundingBox::try_new`] when the input is untrusted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// The minimum corner, `[min_x, min_y]`.
    pub min: [f64; 2],
    /// The maximum corner, `[max_x, max_y]`.
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Create a new box from its two corners without validation.
    pub const fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Create a new box, returning an error if `min > max` on either axis.
    pub fn try_new(min: [f64; 2], max: [f64; 2]) -> Result<Self> {
        if min[0] > max[0] || min[1] > max[1] {
            return Err(GeoKnnError::InvalidBox { min, max });
        }
        Ok(Self { min, max })
    }

    /// A zero-size box located at `point`.
    pub const fn from_point(point: [f64; 2]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// A box centered on `point` extending `padding` in every direction.
    pub fn from_point_with_padding(point: [f64; 2], padding: f64) -> Self {
        Self {
            min: [point[0] - padding, point[1] - padding],
            max: [point[0] + padding, point[1] + padding],
        }
    }

    /// Copy any [`RectTrait`] implementation into a box.
    pub fn from_rect(rect: &impl RectTrait<T = f64>) -> Self {
        Self {
            min: [rect.min().x(), rect.min().y()],
            max: [rect.max().x(), rect.max().y()],
        }
    }

    pub fn min_x(&self) -> f64 {
        self.min[0]
    }

    pub fn min_y(&self) -> f64 {
        self.min[1]
    }

    pub fn max_x(&self) -> f64 {
        self.max[0]
    }

    pub fn max_y(&self) -> f64 {
        self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// The center point of this box.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.,
            (self.min[1] + self.max[1]) / 2.,
        ]
    }

    /// Returns `true` if this box intersects or touches `other`.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.max[0] < other.min[0] {
            return false;
        }
        if self.max[1] < other.min[1] {
            return false;
        }
        if self.min[0] > other.max[0] {
            return false;
        }
        if self.min[1] > other.max[1] {
            return false;
        }
        true
    }

    /// Grow this box to also cover `other`.
    pub fn expand(&mut self, other: &BoundingBox) {
        if other.min[0] < self.min[0] {
            self.min[0] = other.min[0];
        }
        if other.min[1] < self.min[1] {
            self.min[1] = other.min[1];
        }
        if other.max[0] > self.max[0] {
            self.max[0] = other.max[0];
        }
        if other.max[1] > self.max[1] {
            self.max[1] = other.max[1];
        }
    }
}

/// A single corner of a [`BoundingBox`].
///
/// Used in the implementation of [`RectTrait`] for [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    x: f64,
    y: f64,
}

impl CoordTrait for Corner {
    type T = f64;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

impl GeometryTrait for BoundingBox {
    type T = f64;
    type PointType<'a>
        = UnimplementedPoint<f64>
    where
        Self: 'a;
    type LineStringType<'a>
        = UnimplementedLineString<f64>
    where
        Self: 'a;
    type PolygonType<'a>
        = UnimplementedPolygon<f64>
    where
        Self: 'a;
    type MultiPointType<'a>
        = UnimplementedMultiPoint<f64>
    where
        Self: 'a;
    type MultiLineStringType<'a>
        = UnimplementedMultiLineString<f64>
    where
        Self: 'a;
    type MultiPolygonType<'a>
        = UnimplementedMultiPolygon<f64>
    where
        Self: 'a;
    type GeometryCollectionType<'a>
        = UnimplementedGeometryCollection<f64>
    where
        Self: 'a;
    type RectType<'a>
        = BoundingBox
    where
        Self: 'a;
    type TriangleType<'a>
        = UnimplementedTriangle<f64>
    where
        Self: 'a;
    type LineType<'a>
        = UnimplementedLine<f64>
    where
        Self: 'a;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<f64>,
        UnimplementedLineString<f64>,
        UnimplementedPolygon<f64>,
        UnimplementedMultiPoint<f64>,
        UnimplementedMultiLineString<f64>,
        UnimplementedMultiPolygon<f64>,
        UnimplementedGeometryCollection<f64>,
        BoundingBox,
        UnimplementedTriangle<f64>,
        UnimplementedLine<f64>,
    > {
        GeometryType::Rect(self)
    }
}

impl RectTrait for BoundingBox {
    type CoordType<'a>
        = Corner
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Corner {
            x: self.min[0],
            y: self.min[1],
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Corner {
            x: self.max[0],
            y: self.max[1],
        }
    }
}
