//! Closed multi-lane race tracks assembled from curve segments.

mod catalog;
mod mesh;
mod progress;

use std::fmt::{self, Display};

use glam::DVec3;
use log::debug;

use crate::{
    curve::CurveSegment,
    error::{RaceError, RaceResult},
};

pub use catalog::{TrackId, Tracks};
pub use mesh::TrackMesh;
pub use progress::RobotRaceState;

pub const LANE_COUNT: usize = 4;

/// Shortest horizontal tangent that still defines a sideways direction.
const MIN_LATERAL_MAGNITUDE: f64 = 1e-9;

/// Arc lengths below this make a segment untraversable.
const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// One of the parallel paths along a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lane(u8);

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane(0), Lane(1), Lane(2), Lane(3)];

    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&index| usize::from(index) < LANE_COUNT)
            .map(Lane)
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Lane centers sit at -1.5, -0.5, 0.5 and 1.5 lane widths from the curve.
    #[must_use]
    pub fn offset_factor(self) -> f64 {
        f64::from(self.0) + 0.5 - lane_count_f64() / 2.0
    }
}

impl Display for Lane {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "lane {}", self.0)
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "the lane count is a small constant"
)]
fn lane_count_f64() -> f64 {
    LANE_COUNT as f64
}

/// Horizontal unit vector to the right of `tangent`.
///
/// Track segments lie in horizontal planes, so the vertical part of the tangent is ignored.
/// Returns `None` for tangents without a horizontal component.
#[must_use]
pub fn lateral_normal(tangent: DVec3) -> Option<DVec3> {
    let magnitude = tangent.x.hypot(tangent.y);
    (magnitude > MIN_LATERAL_MAGNITUDE)
        .then(|| DVec3::new(tangent.y / magnitude, -tangent.x / magnitude, 0.0))
}

/// A read-only closed track.
///
/// Arc lengths are measured once at construction. Racers only run on the first
/// `traversable` segments; any segments after those exist to close the drawn band.
#[derive(Clone, Debug)]
pub struct Track {
    name: String,
    segments: Vec<CurveSegment>,
    arc_lengths: Vec<f64>,
    traversable: usize,
    textured: bool,
    tangent_step: f64,
}

impl Track {
    /// # Errors
    ///
    /// Fails if there are no segments, if `traversable` is zero or exceeds the segment count,
    /// or if a traversable segment has no length.
    pub fn new(
        name: impl Into<String>,
        segments: Vec<CurveSegment>,
        traversable: usize,
        arc_length_samples: u32,
        tangent_step: f64,
    ) -> RaceResult<Self> {
        if segments.is_empty() {
            return Err(RaceError::EmptyTrack);
        }
        if traversable == 0 || traversable > segments.len() {
            return Err(RaceError::Traversable {
                traversable,
                segments: segments.len(),
            });
        }

        let arc_lengths: Vec<f64> = segments
            .iter()
            .map(|segment| segment.arc_length(arc_length_samples))
            .collect();

        if let Some(index) = arc_lengths
            .iter()
            .take(traversable)
            .position(|&length| length < MIN_SEGMENT_LENGTH)
        {
            return Err(RaceError::DegenerateSegment { index });
        }

        let track = Self {
            name: name.into(),
            segments,
            arc_lengths,
            traversable,
            textured: true,
            tangent_step,
        };
        debug!(
            "built track '{}': {} segments ({} traversable), lap length {:.2}",
            track.name,
            track.segments.len(),
            track.traversable,
            track.lap_length()
        );
        Ok(track)
    }

    /// Marks the track to be drawn as a plain band without textures.
    #[must_use]
    pub fn untextured(mut self) -> Self {
        self.textured = false;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    #[must_use]
    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc_lengths
    }

    #[must_use]
    pub fn traversable(&self) -> usize {
        self.traversable
    }

    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.textured
    }

    #[must_use]
    pub fn tangent_step(&self) -> f64 {
        self.tangent_step
    }

    /// Distance covered by one lap along the curve itself.
    #[must_use]
    pub fn lap_length(&self) -> f64 {
        self.arc_lengths.iter().take(self.traversable).sum()
    }

    /// Indices are wrapped, so any index names some segment.
    #[allow(
        clippy::indexing_slicing,
        reason = "wrapped into range, and a track always has segments"
    )]
    fn segment(&self, index: usize) -> &CurveSegment {
        debug_assert!(index < self.segments.len(), "segment {index} out of range");
        &self.segments[index % self.segments.len()]
    }

    #[must_use]
    pub fn segment_arc_length(&self, index: usize) -> f64 {
        let wrapped = index % self.arc_lengths.len();
        self.arc_lengths.get(wrapped).copied().unwrap_or_default()
    }

    /// Point on the center curve.
    #[must_use]
    pub fn point(&self, segment_index: usize, local_t: f64) -> DVec3 {
        self.segment(segment_index).evaluate(local_t)
    }

    /// Horizontal unit vector to the right of the curve, zero where there is none.
    #[must_use]
    pub fn lateral_at(&self, segment_index: usize, local_t: f64) -> DVec3 {
        let tangent = self
            .segment(segment_index)
            .tangent(local_t, self.tangent_step);
        lateral_normal(tangent).unwrap_or_default()
    }

    /// Point on the curve shifted sideways by `offset` track units.
    ///
    /// Where the curve has no horizontal direction the point is left unshifted.
    #[must_use]
    pub fn offset_point(&self, segment_index: usize, local_t: f64, offset: f64) -> DVec3 {
        self.point(segment_index, local_t) + self.lateral_at(segment_index, local_t) * offset
    }

    /// Center of `lane` at `local_t` of a segment. Height is taken from the curve.
    #[must_use]
    pub fn position_on_lane(
        &self,
        segment_index: usize,
        local_t: f64,
        lane: Lane,
        lane_width: f64,
    ) -> DVec3 {
        self.offset_point(segment_index, local_t, lane_width * lane.offset_factor())
    }

    /// Forward difference of [`Track::position_on_lane`]; not normalized.
    #[must_use]
    pub fn tangent(
        &self,
        segment_index: usize,
        local_t: f64,
        lane: Lane,
        lane_width: f64,
    ) -> DVec3 {
        self.position_on_lane(segment_index, local_t + self.tangent_step, lane, lane_width)
            - self.position_on_lane(segment_index, local_t, lane, lane_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(length: f64) -> Track {
        Track::new(
            "straight",
            vec![CurveSegment::line(DVec3::ZERO, DVec3::new(length, 0.0, 0.0))],
            1,
            100,
            0.001,
        )
        .unwrap()
    }

    #[test]
    fn lane_offsets_are_evenly_spaced_and_centered() {
        let factors = Lane::ALL.map(Lane::offset_factor);
        assert_eq!(factors, [-1.5, -0.5, 0.5, 1.5]);
        assert_eq!(Lane::new(4), None);
        assert_eq!(Lane::new(2).map(Lane::index), Some(2));
    }

    #[test]
    fn straight_segment_arc_length_matches() {
        let track = straight(173.0);
        assert!((track.segment_arc_length(0) - 173.0).abs() < 173.0 * 1e-3);
        assert!((track.lap_length() - 173.0).abs() < 173.0 * 1e-3);
    }

    #[test]
    fn zero_lane_width_stays_on_the_curve() {
        let track = straight(10.0);
        let position = track.position_on_lane(0, 0.5, Lane::ALL[3], 0.0);
        assert!(position.distance(DVec3::new(5.0, 0.0, 0.0)) < 1e-12);

        let tangent = track.tangent(0, 0.5, Lane::ALL[3], 0.0);
        assert!(tangent.distance(DVec3::new(0.01, 0.0, 0.0)) < 1e-12);
        assert!(tangent.normalize().distance(DVec3::X) < 1e-12);
    }

    #[test]
    fn lanes_are_shifted_to_the_right_of_travel() {
        // travelling +x, right is -y
        let track = straight(10.0);
        let inner = track.position_on_lane(0, 0.5, Lane::ALL[0], 2.0);
        let outer = track.position_on_lane(0, 0.5, Lane::ALL[3], 2.0);
        assert!(inner.distance(DVec3::new(5.0, 3.0, 0.0)) < 1e-9, "{inner}");
        assert!(outer.distance(DVec3::new(5.0, -3.0, 0.0)) < 1e-9, "{outer}");
    }

    #[test]
    fn lane_offset_keeps_the_curve_height() {
        let track = Track::new(
            "ramp",
            vec![CurveSegment::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 5.0))],
            1,
            100,
            0.001,
        )
        .unwrap();
        let position = track.position_on_lane(0, 0.4, Lane::ALL[1], 10.0);
        assert!((position.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn vertical_tangent_has_no_lateral_normal() {
        assert_eq!(lateral_normal(DVec3::Z), None);

        let track = Track::new(
            "lift",
            vec![CurveSegment::line(DVec3::ZERO, DVec3::new(0.0, 0.0, 10.0))],
            1,
            100,
            0.001,
        )
        .unwrap();
        let position = track.position_on_lane(0, 0.5, Lane::ALL[0], 10.0);
        assert!(position.is_finite());
        assert!(position.distance(DVec3::new(0.0, 0.0, 5.0)) < 1e-12);
    }

    #[test]
    fn construction_rejects_bad_tables() {
        assert_eq!(
            Track::new("empty", Vec::new(), 0, 100, 0.001).unwrap_err(),
            RaceError::EmptyTrack
        );

        let segments = vec![CurveSegment::line(DVec3::ZERO, DVec3::X)];
        assert_eq!(
            Track::new("too many", segments.clone(), 2, 100, 0.001).unwrap_err(),
            RaceError::Traversable {
                traversable: 2,
                segments: 1
            }
        );

        let degenerate = vec![
            CurveSegment::line(DVec3::ZERO, DVec3::X),
            CurveSegment::line(DVec3::X, DVec3::X),
        ];
        assert_eq!(
            Track::new("point", degenerate.clone(), 2, 100, 0.001).unwrap_err(),
            RaceError::DegenerateSegment { index: 1 }
        );
        // a degenerate closing segment is fine as long as nobody runs on it
        assert!(Track::new("closed", degenerate, 1, 100, 0.001).is_ok());
    }
}
