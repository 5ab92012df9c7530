mod segment_string;
mod simple_noder;
mod snap_round;

pub use segment_string::SegmentString;
pub use simple_noder::SimpleNoder;
pub use snap_round::SnapRoundingNoder;

use crate::error::BufferError;

/// Computes a noding of a set of segment strings.
///
/// The output strings never cross in their interiors: every intersection
/// point is a shared end point. Each output string keeps the label of the
/// input string it was split from.
pub trait Noder {
    /// Nodes the given strings.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Topology` if the noding cannot be completed at
    /// the noder's precision.
    fn compute_nodes(&mut self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>, BufferError>;
}

/// Visits every pair of segments whose envelopes overlap, once per pair.
///
/// Pairs are reported as `(string_a, segment_a, string_b, segment_b)` with
/// `(string_a, segment_a) < (string_b, segment_b)`.
fn for_each_segment_pair(strings: &[SegmentString], mut visit: impl FnMut(usize, usize, usize, usize)) {
    let envelopes: Vec<_> = strings.iter().map(|s| s.points()).map(crate::geometry::Envelope::from_points).collect();
    for a in 0..strings.len() {
        for b in a..strings.len() {
            if !envelopes[a].intersects(&envelopes[b]) {
                continue;
            }
            for i in 0..strings[a].segment_count() {
                let env_i = strings[a].segment_envelope(i);
                if !env_i.intersects(&envelopes[b]) {
                    continue;
                }
                let start = if a == b { i + 1 } else { 0 };
                for j in start..strings[b].segment_count() {
                    if env_i.intersects(&strings[b].segment_envelope(j)) {
                        visit(a, i, b, j);
                    }
                }
            }
        }
    }
}
