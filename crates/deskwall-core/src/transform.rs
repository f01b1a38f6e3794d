//! Mapping boxes between two rectangles that cover the same logical area.
//!
//! The wall uses this in both directions: viewport ↔ bounding box, to project
//! wall-space damage into the node's external space and back, and cell ↔ wall
//! when lifting a single workspace's damage into the shared wall space.

use crate::geometry::Rect;
use crate::region::Region;

/// Map `bbox` from the coordinate space of `src` into the space of `dst`.
///
/// Each edge is placed at the same fractional position inside `dst` that it
/// has inside `src`, rounding down. Because both edges use the same rounding,
/// `scale_box(src, dst, src) == dst`, `scale_box(r, r, b) == b`, and boxes
/// sharing an edge in `src` still share it in `dst`.
///
/// A non-empty box never maps to an empty one while `dst` has an extent:
/// when shrinking (scale < 1) a thin box is widened to one pixel, so two
/// adjacent thin boxes may then cover the same destination pixel. Damage is
/// over-reported in that case, never lost.
///
/// An empty `src` has no meaningful mapping; the result is an empty box at the
/// origin of `dst`.
pub fn scale_box(src: Rect, dst: Rect, bbox: Rect) -> Rect {
    if src.is_empty() {
        return Rect::new(dst.x, dst.y, 0, 0);
    }
    let (x1, x2) = map_span(bbox.x, bbox.x2(), src.x, src.width, dst.x, dst.width);
    let (y1, y2) = map_span(bbox.y, bbox.y2(), src.y, src.height, dst.y, dst.height);
    Rect::from_edges(x1, y1, x2, y2)
}

/// Map every rectangle of `region` with [`scale_box`].
pub fn scale_region(src: Rect, dst: Rect, region: &Region) -> Region {
    region
        .iter()
        .map(|r| scale_box(src, dst, *r))
        .collect()
}

/// Map `bbox` from `src` into `dst`, rounding the start edge down and the end
/// edge up, so that mapping the result back with
/// `scale_box(dst, src, ·)` covers all of `bbox` (when `bbox` lies in `src`).
///
/// Used to find the part of a sub-target's geometry that must be redrawn for
/// a given set of framebuffer pixels.
pub fn cover_box(src: Rect, dst: Rect, bbox: Rect) -> Rect {
    if src.is_empty() || dst.is_empty() || bbox.is_empty() {
        return Rect::new(dst.x, dst.y, 0, 0);
    }
    let x1 = map_edge(bbox.x, src.x, src.width, dst.x, dst.width);
    let x2 = map_edge_up(bbox.x2(), src.x, src.width, dst.x, dst.width);
    let y1 = map_edge(bbox.y, src.y, src.height, dst.y, dst.height);
    let y2 = map_edge_up(bbox.y2(), src.y, src.height, dst.y, dst.height);
    Rect::from_edges(x1, y1, x2, y2)
}

/// Map every rectangle of `region` with [`cover_box`].
pub fn cover_region(src: Rect, dst: Rect, region: &Region) -> Region {
    region
        .iter()
        .map(|r| cover_box(src, dst, *r))
        .collect()
}

fn map_span(
    start: i32,
    end: i32,
    src_origin: i32,
    src_len: i32,
    dst_origin: i32,
    dst_len: i32,
) -> (i32, i32) {
    let a = map_edge(start, src_origin, src_len, dst_origin, dst_len);
    let mut b = map_edge(end, src_origin, src_len, dst_origin, dst_len);
    if end > start && b <= a && dst_len > 0 {
        b = a + 1;
    }
    (a, b)
}

fn map_edge(value: i32, src_origin: i32, src_len: i32, dst_origin: i32, dst_len: i32) -> i32 {
    let offset = (value as i64 - src_origin as i64) * dst_len as i64;
    let scaled = offset.div_euclid(src_len as i64);
    (dst_origin as i64 + scaled) as i32
}

fn map_edge_up(value: i32, src_origin: i32, src_len: i32, dst_origin: i32, dst_len: i32) -> i32 {
    let offset = (value as i64 - src_origin as i64) * dst_len as i64;
    let scaled = -(-offset).div_euclid(src_len as i64);
    (dst_origin as i64 + scaled) as i32
}
