use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// A set of pixels, stored as pairwise-disjoint non-empty rectangles.
///
/// Damage flows through the compositor as regions. Every mutating operation
/// keeps the rectangles disjoint, so `area()` is exact and a pixel is never
/// attributed to two rectangles. Equality compares pixel coverage, not the
/// particular decomposition into rectangles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self {
        Self { rects: Vec::new() }
    }

    pub fn from_rects<I: IntoIterator<Item = Rect>>(rects: I) -> Self {
        let mut region = Self::new();
        for rect in rects {
            region.add_rect(rect);
        }
        region
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    /// Total number of pixels covered.
    pub fn area(&self) -> i64 {
        self.rects.iter().map(Rect::area).sum()
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        self.rects.iter().any(|r| r.contains_point(p))
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Add the pixels of `rect`. Parts already covered are not duplicated.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| subtract_rect(piece, existing))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    pub fn union(&mut self, other: &Region) {
        for rect in &other.rects {
            self.add_rect(*rect);
        }
    }

    pub fn subtract_rect(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        self.rects = self
            .rects
            .iter()
            .flat_map(|r| subtract_rect(*r, rect))
            .collect();
    }

    pub fn subtract(&mut self, other: &Region) {
        for rect in &other.rects {
            self.subtract_rect(rect);
        }
    }

    /// The part of this region that lies inside `rect`.
    pub fn intersect_rect(&self, rect: &Rect) -> Region {
        Region {
            rects: self
                .rects
                .iter()
                .filter_map(|r| r.intersection(rect))
                .collect(),
        }
    }

    pub fn intersect(&self, other: &Region) -> Region {
        let mut rects = Vec::new();
        for a in &self.rects {
            for b in &other.rects {
                if let Some(overlap) = a.intersection(b) {
                    rects.push(overlap);
                }
            }
        }
        Region { rects }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Region {
        Region {
            rects: self.rects.iter().map(|r| r.translate(dx, dy)).collect(),
        }
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        let mut region = Region::new();
        region.add_rect(rect);
        region
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        Region::from_rects(iter)
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        if self.area() != other.area() {
            return false;
        }
        let mut rest = self.clone();
        rest.subtract(other);
        rest.is_empty()
    }
}

impl Eq for Region {}

/// Split `a` minus `b` into at most four disjoint bands.
fn subtract_rect(a: Rect, b: &Rect) -> Vec<Rect> {
    let Some(hole) = a.intersection(b) else {
        return vec![a];
    };
    let mut pieces = Vec::with_capacity(4);
    if hole.y > a.y {
        pieces.push(Rect::from_edges(a.x, a.y, a.x2(), hole.y));
    }
    if hole.y2() < a.y2() {
        pieces.push(Rect::from_edges(a.x, hole.y2(), a.x2(), a.y2()));
    }
    if hole.x > a.x {
        pieces.push(Rect::from_edges(a.x, hole.y, hole.x, hole.y2()));
    }
    if hole.x2() < a.x2() {
        pieces.push(Rect::from_edges(hole.x2(), hole.y, a.x2(), hole.y2()));
    }
    pieces
}
