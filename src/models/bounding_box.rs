use glam::Vec2;

/// An axis-aligned bounding box in 2D space.
///
/// The y axis grows downward, so the `min.y` half of a box is its top half. Degenerate boxes
/// (zero width, zero height, or both) are legal.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::{BoundingBox, Vec2};
///
/// let bbox = BoundingBox::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
/// assert_eq!(bbox.center(), Vec2::new(1.0, 1.0));
/// assert!(bbox.contains(Vec2::new(2.0, 0.5)));
/// assert_eq!(bbox.distance_to_point(Vec2::new(5.0, 1.0)), 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::unit()
    }
}

impl BoundingBox {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The box `[0, 1] x [0, 1]`, used as the bounds of an empty particle set.
    pub const fn unit() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }

    /// Returns the tightest box containing every position, or the unit box when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::{BoundingBox, Vec2};
    ///
    /// let bbox = BoundingBox::enclosing([Vec2::new(1.0, -2.0), Vec2::new(-3.0, 4.0)]);
    /// assert_eq!(bbox.min, Vec2::new(-3.0, -2.0));
    /// assert_eq!(bbox.max, Vec2::new(1.0, 4.0));
    ///
    /// assert_eq!(BoundingBox::enclosing(std::iter::empty()), BoundingBox::unit());
    /// ```
    pub fn enclosing<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut positions = positions.into_iter();
        let first = match positions.next() {
            Some(p) => p,
            None => return Self::unit(),
        };
        positions.fold(Self::new(first, first), |bbox, p| {
            Self::new(bbox.min.min(p), bbox.max.max(p))
        })
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True when the box has collapsed to a single point, so splitting it cannot separate
    /// anything.
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Index of the quadrant a position is routed to.
    ///
    /// Quadrants are numbered top-left (0), top-right (1), bottom-left (2), bottom-right (3).
    /// A coordinate equal to the midpoint belongs to the right or bottom half.
    pub fn quadrant_of(&self, p: Vec2) -> usize {
        let center = self.center();
        usize::from(p.x >= center.x) | (usize::from(p.y >= center.y) << 1)
    }

    /// The box of quadrant `index`, numbered as in [`BoundingBox::quadrant_of`].
    pub fn quadrant(&self, index: usize) -> BoundingBox {
        let center = self.center();
        let min = Vec2::new(
            if index & 1 == 0 { self.min.x } else { center.x },
            if index & 2 == 0 { self.min.y } else { center.y },
        );
        let max = Vec2::new(
            if index & 1 == 0 { center.x } else { self.max.x },
            if index & 2 == 0 { center.y } else { self.max.y },
        );
        BoundingBox::new(min, max)
    }

    pub fn quadrants(&self) -> [BoundingBox; 4] {
        std::array::from_fn(|i| self.quadrant(i))
    }

    /// Euclidean distance from the box to a point, zero when the point is inside.
    pub fn distance_to_point(&self, p: Vec2) -> f32 {
        let dx = (self.min.x - p.x).max(p.x - self.max.x).max(0.0);
        let dy = (self.min.y - p.y).max(p.y - self.max.y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this box grown by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> BoundingBox {
        BoundingBox::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
    }
}
