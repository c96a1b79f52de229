// core/geometry.rs
//
// Axis-aligned rectangles and the world-space collider shapes built from them.
// Edges are derived from position + size on every read, never stored.
// y grows downward: `top` is the smaller y.

use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_pos_size(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.half_width()
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.half_height()
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.center_x(), self.center_y())
    }

    // Setters move the rectangle; the size is kept.

    pub fn set_left(&mut self, left: f64) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f64) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f64) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f64) {
        self.y = bottom - self.height;
    }

    pub fn set_center_x(&mut self, cx: f64) {
        self.x = cx - self.half_width();
    }

    pub fn set_center_y(&mut self, cy: f64) {
        self.y = cy - self.half_height();
    }

    /// Resize around the current center.
    pub fn set_half_width(&mut self, half: f64) {
        let cx = self.center_x();
        self.width = half * 2.0;
        self.set_center_x(cx);
    }

    pub fn set_half_height(&mut self, half: f64) {
        let cy = self.center_y();
        self.height = half * 2.0;
        self.set_center_y(cy);
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Inclusive point test.
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// A collider's shape resolved into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    Rect(Rect),
    Circle { center: DVec2, radius: f64 },
}

impl WorldShape {
    /// Only matching variants can collide; mixed pairs never do.
    pub fn intersects(&self, other: &WorldShape) -> bool {
        match (self, other) {
            (WorldShape::Rect(a), WorldShape::Rect(b)) => a.overlaps(b),
            (
                WorldShape::Circle { center: c1, radius: r1 },
                WorldShape::Circle { center: c2, radius: r2 },
            ) => c1.distance(*c2) < r1 + r2,
            _ => false,
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            WorldShape::Rect(r) => r,
            WorldShape::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
        }
    }

    pub fn contains_point(&self, p: DVec2) -> bool {
        match *self {
            WorldShape::Rect(r) => r.contains_point(p),
            WorldShape::Circle { center, radius } => center.distance(p) <= radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), DVec2::new(25.0, 40.0));
        assert_eq!(r.half_width(), 15.0);
        assert_eq!(r.half_height(), 20.0);
    }

    #[test]
    fn setters_keep_size() {
        let mut r = Rect::new(0.0, 0.0, 10.0, 4.0);
        r.set_right(100.0);
        assert_eq!((r.left(), r.width), (90.0, 10.0));
        r.set_bottom(50.0);
        assert_eq!((r.top(), r.height), (46.0, 4.0));
        r.set_center_x(0.0);
        assert_eq!(r.left(), -5.0);
        r.set_half_width(10.0);
        assert_eq!((r.left(), r.right()), (-10.0, 10.0));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 10.0, 10.0)),
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 5.0, 5.0)),
            (Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(10.0, 10.0, 1.0, 1.0)),
            (Rect::new(-3.0, 2.0, 1.5, 7.0), Rect::new(-2.0, 8.5, 4.0, 4.0)),
        ];
        for (a, b) in cases {
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        assert!(!a.overlaps(&below));
        assert!(a.overlaps(&Rect::new(9.999, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn point_test_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(DVec2::new(10.0, 10.0)));
        assert!(!r.contains_point(DVec2::new(10.1, 5.0)));
    }

    #[test]
    fn circles_and_mixed_pairs() {
        let a = WorldShape::Circle { center: DVec2::ZERO, radius: 5.0 };
        let b = WorldShape::Circle { center: DVec2::new(9.0, 0.0), radius: 5.0 };
        let touching = WorldShape::Circle { center: DVec2::new(10.0, 0.0), radius: 5.0 };
        let rect = WorldShape::Rect(Rect::new(-1.0, -1.0, 2.0, 2.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&rect));
        assert!(!rect.intersects(&a));
        assert_eq!(a.bounds(), Rect::new(-5.0, -5.0, 10.0, 10.0));
    }
}
