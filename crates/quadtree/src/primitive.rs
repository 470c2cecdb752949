/* ---------------------------------------------------------------------------------------------- */
/*                                              POINT                                             */
/* ---------------------------------------------------------------------------------------------- */

use derive_more::{Add, AddAssign, From, Sub, SubAssign};

/// Integer coordinate used by every geometric type of this crate.
pub type Coord = i32;

/// A point in 2D integer space. `y` grows downward, so the "top" half of a region is the one
/// with the smaller `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(Add, Sub, AddAssign, SubAssign, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(other.x)?,
            y: self.y.checked_add(other.y)?,
        })
    }
}

#[cfg(feature = "glam")]
mod _impl_glam {
    use super::Point;

    impl From<glam::IVec2> for Point {
        fn from(v: glam::IVec2) -> Self {
            Self::new(v.x, v.y)
        }
    }

    impl From<Point> for glam::IVec2 {
        fn from(p: Point) -> Self {
            glam::IVec2::new(p.x, p.y)
        }
    }
}

/* ---------------------------------------------------------------------------------------------- */
/*                                             QUADRANT                                           */
/* ---------------------------------------------------------------------------------------------- */

/// One quarter of a region. The discriminant is the slot of the quadrant within a split node,
/// which is also the order in which children are tried during insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];
}

/* ---------------------------------------------------------------------------------------------- */
/*                                             REGION                                             */
/* ---------------------------------------------------------------------------------------------- */

/// Axis-aligned rectangle. `min` is inclusive and `max` is exclusive on both axes, so a region
/// `(0,0)-(10,10)` covers exactly 10x10 unit cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    min: Point,
    max: Point,
}

impl Region {
    /// Creates a new region spanning the two corner points.
    ///
    /// Corners are normalized per axis, so any two opposite corners may be given in any
    /// order.
    pub fn new(p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        let (p1, p2) = (p1.into(), p2.into());

        Self {
            min: Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Shorthand of [`Region::new`] with raw coordinates.
    pub fn from_coords(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Self {
        Self::new((x0, y0), (x1, y1))
    }

    /// A region anchored at origin, i.e. `(0,0)-(width,height)`. This is the usual local shape
    /// of a tracked object.
    pub fn from_size(width: Coord, height: Coord) -> Self {
        Self::new(Point::ZERO, (width, height))
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> u32 {
        self.max.x.abs_diff(self.min.x)
    }

    pub fn height(&self) -> u32 {
        self.max.y.abs_diff(self.min.y)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// A region with zero width or height covers no cell at all.
    pub fn is_empty(&self) -> bool {
        self.min.x == self.max.x || self.min.y == self.max.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + (self.width() / 2) as Coord,
            self.min.y + (self.height() / 2) as Coord,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.min.x <= point.x
            && point.x < self.max.x
            && self.min.y <= point.y
            && point.y < self.max.y
    }

    /// Whether `other` lies entirely within this region. Shared edges count as contained.
    pub fn contains_region(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && other.max.x <= self.max.x
            && self.min.y <= other.min.y
            && other.max.y <= self.max.y
    }

    /// Overlap with non-empty area. Regions that only touch at an edge, or either region being
    /// empty, never intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Returns the region moved by `offset`, or `None` if any corner leaves the coordinate
    /// range. A clamped corner would shrink the region, so no partial result is produced.
    pub fn translated(&self, offset: Point) -> Option<Self> {
        Some(Self {
            min: self.min.checked_add(offset)?,
            max: self.max.checked_add(offset)?,
        })
    }

    /// Whether both halves of this region would be non-empty on both axes.
    pub fn is_divisible(&self) -> bool {
        self.width() / 2 > 0 && self.height() / 2 > 0
    }

    /// Divides the region at its midlines, in [`Quadrant::ALL`] order. The four quadrants
    /// tile this region with no gap or overlap.
    pub fn quadrants(&self) -> [Region; 4] {
        let Self { min, max } = *self;
        let half = self.center();

        [
            Region { min, max: half },
            Region {
                min: Point::new(half.x, min.y),
                max: Point::new(max.x, half.y),
            },
            Region {
                min: Point::new(min.x, half.y),
                max: Point::new(half.x, max.y),
            },
            Region { min: half, max },
        ]
    }

    pub fn quadrant(&self, q: Quadrant) -> Region {
        self.quadrants()[q as usize]
    }
}

static_assertions::assert_impl_all!(Region: Copy, Send, Sync);
static_assertions::assert_eq_size!(Region, [Coord; 4]);

/* ---------------------------------------------------------------------------------------------- */
/*                                              TESTS                                             */
/* ---------------------------------------------------------------------------------------------- */
