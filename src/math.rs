//! Types, aliases and helper operations for doing math with `ultraviolet`.
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    /// Normalize the given vector, falling back to the x axis
    /// if it has no direction to speak of.
    pub fn new_normalize(v: Vec2) -> Self {
        let mag = v.mag();
        if mag > f64::EPSILON {
            Unit(v / mag)
        } else {
            Self::unit_x()
        }
    }

    pub const fn new_unchecked(v: Vec2) -> Self {
        Unit(v)
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    pub fn unit_y() -> Self {
        Unit(Vec2::unit_y())
    }

    #[inline]
    pub fn into_inner(self) -> Vec2 {
        self.0
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Neg for Unit<T>
where
    T: std::ops::Neg,
{
    type Output = Unit<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        Unit(-self.0)
    }
}

/// An axis-aligned rectangle in world space.
///
/// Screen-style coordinates: `top` is the smaller y value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Aabb {
    /// Create an AABB from its center point and full side lengths.
    #[inline]
    pub fn from_center(center: Vec2, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Aabb {
            left: center.x - hw,
            right: center.x + hw,
            top: center.y - hh,
            bottom: center.y + hh,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Touching edges count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    /// The point inside (or on the boundary of) this box closest to `p`.
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right),
            p.y.clamp(self.top, self.bottom),
        )
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}
