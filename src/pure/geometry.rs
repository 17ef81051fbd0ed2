//! Geometry primitives
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

/// An x,y coordinate pair
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: u32,
    /// An absolute y coordinate relative to the root window
    pub y: u32,
}

impl Point {
    /// Create a new Point.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from(raw: (u32, u32)) -> Self {
        let (x, y) = raw;

        Self { x, y }
    }
}

// A Rect converts to its top left corner
impl From<Rect> for Point {
    fn from(r: Rect) -> Self {
        let Rect { x, y, .. } = r;

        Self { x, y }
    }
}

/// A screen position: top left corner + extent
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    /// The x-coordinate of the top left corner of this rect
    pub x: u32,
    /// The y-coordinate of the top left corner of this rect
    pub y: u32,
    /// The width of this rect
    pub w: u32,
    /// The height of this rect
    pub h: u32,
}

impl Rect {
    /// Create a new Rect.
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The midpoint of this rectangle.
    ///
    /// Odd side lengths will lead to a truncated point towards the top left corner
    /// in order to maintain integer coordinates.
    pub fn midpoint(&self) -> Point {
        Point {
            x: self.x + self.w / 2,
            y: self.y + self.h / 2,
        }
    }

    /// Shrink width and height by the given pixel border, maintaining the current x and y
    /// coordinates. The resulting `Rect` will always have a minimum width and height of 1.
    /// ```
    /// # use panewm::pure::geometry::Rect;
    /// let r = Rect::new(0, 0, 100, 200);
    ///
    /// assert_eq!(r.shrink_in(10), Rect::new(0, 0, 80, 180));
    /// assert_eq!(r.shrink_in(50), Rect::new(0, 0, 1, 100));
    /// assert_eq!(r.shrink_in(100), Rect::new(0, 0, 1, 1));
    /// ```
    pub fn shrink_in(&self, border: u32) -> Self {
        let w = if self.w <= 2 * border {
            1
        } else {
            self.w - 2 * border
        };
        let h = if self.h <= 2 * border {
            1
        } else {
            self.h - 2 * border
        };

        Self { w, h, ..*self }
    }

    /// Check whether this Rect contains `p`
    pub fn contains_point<P>(&self, p: P) -> bool
    where
        P: Into<Point>,
    {
        let p = p.into();

        (self.x..(self.x + self.w + 1)).contains(&p.x)
            && (self.y..(self.y + self.h + 1)).contains(&p.y)
    }

    /// The area (in pixels) of the overlap between this Rect and `other`.
    ///
    /// Zero when the two rects are disjoint. This is what decides which
    /// monitor a window belongs to when its position could fall on several.
    /// ```
    /// # use panewm::pure::geometry::Rect;
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    ///
    /// assert_eq!(a.overlap_area(&b), 2500);
    /// assert_eq!(b.overlap_area(&a), 2500);
    /// assert_eq!(a.overlap_area(&Rect::new(200, 0, 10, 10)), 0);
    /// ```
    pub fn overlap_area(&self, other: &Rect) -> u32 {
        let dx = min(self.x + self.w, other.x + other.w).saturating_sub(max(self.x, other.x));
        let dy = min(self.y + self.h, other.y + other.h).saturating_sub(max(self.y, other.y));

        dx * dy
    }

    /// Center this Rect inside of `enclosing`.
    ///
    /// Returns `None` if this Rect can not fit inside enclosing
    pub fn centered_in(&self, enclosing: &Rect) -> Option<Self> {
        if self.w > enclosing.w || self.h > enclosing.h {
            return None;
        }

        Some(Self {
            x: enclosing.x + ((enclosing.w - self.w) / 2),
            y: enclosing.y + ((enclosing.h - self.h) / 2),
            ..*self
        })
    }

    /// Split this `Rect` into `n` equal integer shares along its width,
    /// any remainder pixels being appended to the last share.
    pub fn split_columns_with_remainder(&self, n: u32) -> Vec<Rect> {
        if n <= 1 {
            return vec![*self];
        }
        let each = self.w / n;
        (0..n)
            .map(|i| {
                let w = if i == n - 1 { self.w - each * (n - 1) } else { each };
                Rect::new(self.x + i * each, self.y, w, self.h)
            })
            .collect()
    }

    /// Split this `Rect` into `n` equal integer shares along its height,
    /// any remainder pixels being appended to the last share.
    pub fn split_rows_with_remainder(&self, n: u32) -> Vec<Rect> {
        if n <= 1 {
            return vec![*self];
        }
        let each = self.h / n;
        (0..n)
            .map(|i| {
                let h = if i == n - 1 { self.h - each * (n - 1) } else { each };
                Rect::new(self.x, self.y + i * each, self.w, h)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn r(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect::new(x, y, w, h)
    }

    fn p(x: u32, y: u32) -> Point {
        Point { x, y }
    }

    #[test_case(r(0, 0, 10, 20), 1, 8, 18; "small border")]
    #[test_case(r(0, 0, 10, 20), 1000, 1, 1; "massive border")]
    #[test_case(r(0, 0, 10, 20), 5, 1, 10; "border half of width")]
    #[test_case(r(0, 0, 20, 10), 5, 10, 1; "border half of height")]
    #[test]
    fn shrink_in_works(r: Rect, b: u32, w: u32, h: u32) {
        let res = r.shrink_in(b);
        assert_eq!(
            res,
            Rect {
                x: r.x,
                y: r.y,
                w,
                h
            }
        )
    }

    #[test_case(p(0, 0), false; "outside")]
    #[test_case(p(30, 20), true; "inside")]
    #[test_case(p(10, 20), true; "top left")]
    #[test_case(p(40, 60), true; "bottom right")]
    #[test]
    fn contains_point(p: Point, expected: bool) {
        let r = Rect::new(10, 20, 30, 40);

        assert_eq!(r.contains_point(p), expected);
    }

    #[test_case(r(0, 0, 100, 100), r(0, 0, 100, 100), 10000; "identical")]
    #[test_case(r(0, 0, 100, 100), r(50, 50, 100, 100), 2500; "corner quarter")]
    #[test_case(r(0, 0, 100, 100), r(25, 25, 50, 50), 2500; "contained")]
    #[test_case(r(0, 0, 100, 100), r(100, 0, 50, 50), 0; "adjacent")]
    #[test_case(r(0, 0, 100, 100), r(500, 500, 50, 50), 0; "disjoint")]
    #[test]
    fn overlap_area(a: Rect, b: Rect, expected: u32) {
        assert_eq!(a.overlap_area(&b), expected);
        assert_eq!(b.overlap_area(&a), expected);
    }

    #[test_case(r(0, 0, 10, 10), Some(r(5, 5, 10, 10)); "fits")]
    #[test_case(r(0, 0, 100, 100), None; "doesn't fit")]
    #[test]
    fn centered_in(inner: Rect, expected: Option<Rect>) {
        let outer = Rect::new(0, 0, 20, 20);

        assert_eq!(inner.centered_in(&outer), expected);
    }

    #[test_case(r(0, 0, 100, 90), 1; "single")]
    #[test_case(r(0, 0, 100, 90), 3; "with remainder")]
    #[test_case(r(0, 0, 100, 90), 4; "even")]
    #[test_case(r(7, 3, 79, 57), 7; "awkward")]
    #[test]
    fn split_rows_covers_rect(r: Rect, n: u32) {
        let rects = r.split_rows_with_remainder(n);

        assert_eq!(rects.len(), n as usize);
        assert_eq!(rects.iter().map(|r| r.h).sum::<u32>(), r.h);
        assert!(rects.iter().all(|s| s.w == r.w && s.x == r.x));
        assert_eq!(rects[0].y, r.y);
    }

    #[test_case(r(0, 0, 100, 90), 1; "single")]
    #[test_case(r(0, 0, 100, 90), 3; "with remainder")]
    #[test_case(r(7, 3, 79, 57), 6; "awkward")]
    #[test]
    fn split_columns_covers_rect(r: Rect, n: u32) {
        let rects = r.split_columns_with_remainder(n);

        assert_eq!(rects.len(), n as usize);
        assert_eq!(rects.iter().map(|r| r.w).sum::<u32>(), r.w);
        assert!(rects.iter().all(|s| s.h == r.h && s.y == r.y));
    }

    #[test]
    fn split_remainder_goes_to_last() {
        let rects = r(0, 0, 100, 10).split_columns_with_remainder(3);

        assert_eq!(rects[0].w, 33);
        assert_eq!(rects[1].w, 33);
        assert_eq!(rects[2].w, 34);
        assert_eq!(rects[2].x, 66);
    }
}
