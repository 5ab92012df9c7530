use std::collections::HashMap;

use crate::error::{BufferError, TopologyError};
use crate::geometry::{remove_repeated_points, PrecisionModel};
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::{coord_key, same_point, CoordKey, Point2};

use super::{for_each_segment_pair, Noder, SegmentString};

/// A grid cell of the fixed precision model that contains a vertex or an
/// intersection point.
///
/// The cell is closed on its left and bottom sides and open on its right
/// and top sides, so a point belongs to exactly one cell.
#[derive(Debug, Clone, Copy)]
struct HotPixel {
    centre: Point2,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    /// Segments passing through this pixel must be noded at its centre.
    is_node: bool,
}

impl HotPixel {
    fn new(centre: Point2, scale: f64) -> Self {
        let half = 0.5 / scale;
        Self {
            centre,
            min_x: centre.x - half,
            max_x: centre.x + half,
            min_y: centre.y - half,
            max_y: centre.y + half,
            is_node: false,
        }
    }

    fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }

    /// Liang-Barsky clip of the segment against the pixel.
    #[allow(clippy::float_cmp)]
    fn intersects_segment(&self, p0: &Point2, p1: &Point2) -> bool {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, p0.x - self.min_x),
            (dx, self.max_x - p0.x),
            (-dy, p0.y - self.min_y),
            (dy, self.max_y - p0.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 {
                        return false;
                    }
                    t0 = t0.max(r);
                } else {
                    if r < t0 {
                        return false;
                    }
                    t1 = t1.min(r);
                }
            }
        }
        // Touching only the open top or right side does not count.
        let a = Point2::new(p0.x + t0 * dx, p0.y + t0 * dy);
        let b = Point2::new(p0.x + t1 * dx, p0.y + t1 * dy);
        !((a.x >= self.max_x && b.x >= self.max_x) || (a.y >= self.max_y && b.y >= self.max_y))
    }
}

/// Hot pixels sorted by centre x for range queries.
#[derive(Debug, Default)]
struct PixelIndex {
    pixels: Vec<HotPixel>,
    by_key: HashMap<CoordKey, usize>,
}

impl PixelIndex {
    fn add(&mut self, centre: Point2, scale: f64, is_node: bool) {
        let key = coord_key(&centre);
        if let Some(&i) = self.by_key.get(&key) {
            self.pixels[i].is_node |= is_node;
            return;
        }
        let mut pixel = HotPixel::new(centre, scale);
        pixel.is_node = is_node;
        self.by_key.insert(key, self.pixels.len());
        self.pixels.push(pixel);
    }

    fn finish(&mut self) {
        self.pixels
            .sort_by(|a, b| a.centre.x.total_cmp(&b.centre.x).then(a.centre.y.total_cmp(&b.centre.y)));
        self.by_key = self
            .pixels
            .iter()
            .enumerate()
            .map(|(i, px)| (coord_key(&px.centre), i))
            .collect();
    }

    /// Indices of pixels whose x range may overlap `[min_x, max_x]`.
    fn x_range(&self, min_x: f64, max_x: f64, half: f64) -> std::ops::Range<usize> {
        let start = self.pixels.partition_point(|px| px.centre.x < min_x - half);
        let end = self.pixels.partition_point(|px| px.centre.x <= max_x + half);
        start..end.max(start)
    }

    fn is_node(&self, p: &Point2) -> bool {
        self.by_key.get(&coord_key(p)).is_some_and(|&i| self.pixels[i].is_node)
    }
}

/// Robust noder that rounds all output to a fixed grid.
///
/// Every vertex and intersection point defines a hot pixel. Segments passing
/// through a hot pixel are noded at its centre, so no two output segments
/// cross except at shared grid points.
#[derive(Debug, Clone, Copy)]
pub struct SnapRoundingNoder {
    scale: f64,
}

impl SnapRoundingNoder {
    /// Creates a snap-rounding noder for the grid `1 / scale`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidArgument` if `scale` is not positive and
    /// finite.
    pub fn new(scale: f64) -> Result<Self, BufferError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(BufferError::InvalidArgument(format!(
                "snap-rounding scale must be positive and finite, got {scale}"
            )));
        }
        Ok(Self { scale })
    }

    /// The grid scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn precision(&self) -> PrecisionModel {
        PrecisionModel::Fixed { scale: self.scale }
    }

    fn build_pixels(&self, strings: &[SegmentString]) -> PixelIndex {
        let pm = self.precision();
        let mut index = PixelIndex::default();
        for_each_segment_pair(strings, |a, i, b, j| {
            let pa = strings[a].points();
            let pb = strings[b].points();
            let intersection = segment_intersection(&pa[i], &pa[i + 1], &pb[j], &pb[j + 1]);
            for point in intersection.points() {
                index.add(pm.make_precise(point), self.scale, true);
            }
        });
        for ss in strings {
            for p in ss.points() {
                index.add(pm.make_precise(*p), self.scale, false);
            }
        }
        index.finish();
        index
    }

    fn snap_segment(&self, index: &mut PixelIndex, p0: &Point2, p1: &Point2, ss: &mut SegmentString, seg: usize) {
        let half = 0.5 / self.scale;
        for k in index.x_range(p0.x.min(p1.x), p0.x.max(p1.x), half) {
            let pixel = &mut index.pixels[k];
            // A pixel holding one of the segment's own vertices only nodes the
            // segment once some other segment has made it a node.
            if !pixel.is_node && (pixel.contains(p0) || pixel.contains(p1)) {
                continue;
            }
            if pixel.intersects_segment(p0, p1) {
                ss.add_intersection(pixel.centre, seg);
                pixel.is_node = true;
            }
        }
    }

    fn snap_string(&self, index: &mut PixelIndex, ss: &SegmentString) -> Option<SegmentString> {
        let pm = self.precision();
        let pts = ss.points();
        let rounded: Vec<Point2> = pts.iter().map(|p| pm.make_precise(*p)).collect();
        let rounded = remove_repeated_points(&rounded);
        if rounded.len() < 2 {
            return None;
        }
        let mut snapped = SegmentString::new(rounded, ss.label());
        let mut seg = 0;
        for w in pts.windows(2) {
            let current = snapped.points()[seg];
            if same_point(&pm.make_precise(w[1]), &current) {
                continue;
            }
            self.snap_segment(index, &w[0], &w[1], &mut snapped, seg);
            seg += 1;
        }
        Some(snapped)
    }
}

/// Fails if any two output segments still cross in their interiors.
fn check_noding(strings: &[SegmentString]) -> Result<(), TopologyError> {
    let mut crossing = None;
    for_each_segment_pair(strings, |a, i, b, j| {
        if crossing.is_some() {
            return;
        }
        let pa = strings[a].points();
        let pb = strings[b].points();
        if let SegmentIntersection::Point { point, proper: true } =
            segment_intersection(&pa[i], &pa[i + 1], &pb[j], &pb[j + 1])
        {
            crossing = Some(point);
        }
    });
    match crossing {
        Some(p) => Err(TopologyError::NonConvergent(format!(
            "segments still cross at ({}, {}) after snap rounding",
            p.x, p.y
        ))),
        None => Ok(()),
    }
}

impl Noder for SnapRoundingNoder {
    fn compute_nodes(&mut self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>, BufferError> {
        let mut index = self.build_pixels(&strings);

        let mut snapped: Vec<SegmentString> = strings
            .iter()
            .filter_map(|ss| self.snap_string(&mut index, ss))
            .collect();

        for ss in &mut snapped {
            let vertex_nodes: Vec<(usize, Point2)> = ss
                .points()
                .iter()
                .enumerate()
                .filter(|(_, p)| index.is_node(p))
                .map(|(i, p)| (i, *p))
                .collect();
            for (i, p) in vertex_nodes {
                ss.add_intersection(p, i);
            }
        }

        let noded: Vec<SegmentString> = snapped
            .into_iter()
            .flat_map(SegmentString::noded_substrings)
            .filter(|ss| {
                let pts = ss.points();
                pts.len() >= 2 && !pts.iter().all(|p| same_point(p, &pts[0]))
            })
            .collect();
        check_noding(&noded)?;
        Ok(noded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Label, Location};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn label() -> Label {
        Label::new(Location::Boundary, Location::Exterior, Location::Interior)
    }

    #[test]
    fn pixel_contains_points_rounding_into_it() {
        let pm = PrecisionModel::Fixed { scale: 2.0 };
        for q in [p(-0.25, 0.75), p(0.25, -0.75), p(-0.75, -0.25), p(0.1, -0.3)] {
            let pixel = HotPixel::new(pm.make_precise(q), 2.0);
            assert!(pixel.contains(&q), "{q:?} not in pixel at {:?}", pixel.centre);
        }
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(SnapRoundingNoder::new(0.0).is_err());
        assert!(SnapRoundingNoder::new(f64::INFINITY).is_err());
    }

    #[test]
    fn output_lies_on_grid() {
        let strings = vec![
            SegmentString::new(vec![p(0.01, 0.02), p(2.04, 1.98)], label()),
            SegmentString::new(vec![p(0.03, 2.01), p(1.97, -0.02)], label()),
        ];
        let noded = SnapRoundingNoder::new(10.0).unwrap().compute_nodes(strings).unwrap();
        assert_eq!(noded.len(), 4);
        for q in noded.iter().flat_map(SegmentString::points) {
            assert!(((q.x * 10.0).round() - q.x * 10.0).abs() < 1e-9);
            assert!(((q.y * 10.0).round() - q.y * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn segment_through_vertex_pixel_is_noded() {
        // The vertex (1.02, 0.01) of the second string rounds into the pixel
        // crossed by the first string.
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(2.0, 0.0)], label()),
            SegmentString::new(vec![p(1.02, 0.01), p(1.0, 1.0)], label()),
        ];
        let noded = SnapRoundingNoder::new(10.0).unwrap().compute_nodes(strings).unwrap();
        // The horizontal line is split at (1, 0).
        assert_eq!(noded.len(), 3);
        assert!(noded.iter().all(|ss| ss.points().len() == 2));
    }

    #[test]
    fn collapsed_strings_are_dropped() {
        let strings = vec![SegmentString::new(vec![p(0.01, 0.01), p(0.02, 0.02)], label())];
        let noded = SnapRoundingNoder::new(10.0).unwrap().compute_nodes(strings).unwrap();
        assert!(noded.is_empty());
    }

    #[test]
    fn pixel_is_half_open() {
        let px = HotPixel::new(p(0.0, 0.0), 1.0);
        assert!(px.contains(&p(-0.5, -0.5)));
        assert!(!px.contains(&p(0.5, 0.0)));
        assert!(px.intersects_segment(&p(-1.0, 0.0), &p(1.0, 0.0)));
        assert!(!px.intersects_segment(&p(-1.0, 0.5), &p(1.0, 0.5)));
        assert!(px.intersects_segment(&p(-1.0, -0.5), &p(1.0, -0.5)));
        assert!(!px.intersects_segment(&p(2.0, 2.0), &p(3.0, 3.0)));
    }
}
