use log::{debug, trace};
use rand::Rng;

use super::{Lane, Track};
use crate::config::RobotConfig;

/// Where one robot is on its lane and how fast it goes.
///
/// Progress is counted along the center curve. `distance_before_segment` only ever grows,
/// by exactly the arc length of each completed segment, so laps never drift.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotRaceState {
    segment_index: usize,
    distance_before_segment: f64,
    distance: f64,
    local_t: f64,
    laps: u32,
    speed: f64,
    lane: Lane,
}

impl RobotRaceState {
    #[must_use]
    pub fn new(lane: Lane, speed: f64) -> Self {
        Self {
            segment_index: 0,
            distance_before_segment: 0.0,
            distance: 0.0,
            local_t: 0.0,
            laps: 0,
            speed,
            lane,
        }
    }

    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Arc length of all segments completed so far, over all laps.
    #[must_use]
    pub fn distance_before_segment(&self) -> f64 {
        self.distance_before_segment
    }

    /// Total distance travelled.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Parameter within the current segment, in `[0, 1]`.
    #[must_use]
    pub fn local_t(&self) -> f64 {
        self.local_t
    }

    #[must_use]
    pub fn laps(&self) -> u32 {
        self.laps
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Back to the start line, keeping lane and speed.
    pub fn reset(&mut self) {
        *self = Self::new(self.lane, self.speed);
    }

    /// Random walk of the speed within the configured bounds.
    pub fn perturb_speed(&mut self, rng: &mut impl Rng, config: &RobotConfig) {
        let jitter = config.speed_jitter.abs();
        let change = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let (low, high) = if config.min_speed <= config.max_speed {
            (config.min_speed, config.max_speed)
        } else {
            (config.max_speed, config.min_speed)
        };
        self.speed = (self.speed + change).clamp(low, high);
    }

    /// Moves on by `speed * dt`.
    pub fn advance(&mut self, track: &Track, dt: f64) {
        let step = self.speed * dt;
        if step.is_finite() && step > 0.0 {
            self.advance_to(track, self.distance + step);
        } else {
            self.advance_to(track, self.distance);
        }
    }

    /// Places the robot at `distance` along the track.
    ///
    /// Completed segments are consumed one after the other, wrapping to the first
    /// segment after the last traversable one. Calling this again with the same distance
    /// changes nothing. Distances behind the current segment start are held at its start.
    pub fn advance_to(&mut self, track: &Track, distance: f64) {
        if !distance.is_finite() {
            trace!("ignoring non-finite distance {distance}");
            return;
        }
        self.distance = distance;

        if self.segment_index >= track.traversable() {
            trace!(
                "segment {} is past the traversable range, wrapping",
                self.segment_index
            );
            self.segment_index = 0;
        }

        loop {
            let length = track.segment_arc_length(self.segment_index);
            let local_t = (distance - self.distance_before_segment) / length;
            if local_t <= 1.0 {
                self.local_t = local_t.max(0.0);
                return;
            }

            self.distance_before_segment += length;
            self.segment_index += 1;
            trace!(
                "{} entered segment {} of '{}'",
                self.lane,
                self.segment_index,
                track.name()
            );
            if self.segment_index >= track.traversable() {
                self.segment_index = 0;
                self.laps += 1;
                debug!(
                    "{} completed lap {} of '{}'",
                    self.lane,
                    self.laps,
                    track.name()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::curve::CurveSegment;

    fn square(side: f64) -> Track {
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(side, 0.0, 0.0),
            DVec3::new(side, side, 0.0),
            DVec3::new(0.0, side, 0.0),
        ];
        let segments = (0..4)
            .map(|index| CurveSegment::line(corners[index], corners[(index + 1) % 4]))
            .collect();
        Track::new("square", segments, 4, 100, 0.001).unwrap()
    }

    #[test]
    fn single_line_at_half_distance() {
        let track = Track::new(
            "line",
            vec![CurveSegment::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))],
            1,
            100,
            0.001,
        )
        .unwrap();
        let mut state = RobotRaceState::new(Lane::ALL[0], 1.0);
        state.advance_to(&track, 5.0);
        assert_eq!(state.segment_index(), 0);
        assert!((state.local_t() - 0.5).abs() < 1e-12);
        let position =
            track.position_on_lane(state.segment_index(), state.local_t(), state.lane(), 0.0);
        assert!(position.distance(DVec3::new(5.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn repeating_the_same_distance_changes_nothing() {
        let track = square(10.0);
        let mut state = RobotRaceState::new(Lane::ALL[1], 1.0);
        state.advance_to(&track, 23.0);
        let before = state.clone();
        state.advance_to(&track, 23.0);
        assert_eq!(state, before);
        assert_eq!(state.segment_index(), 2);
        assert!((state.local_t() - 0.3).abs() < 1e-9);

        state.advance(&track, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn crossing_several_segments_in_one_step() {
        let track = square(10.0);
        let mut state = RobotRaceState::new(Lane::ALL[0], 1.0);
        state.advance_to(&track, 35.0);
        assert_eq!(state.segment_index(), 3);
        assert!((state.distance_before_segment() - 30.0).abs() < 1e-9);
        assert!((state.local_t() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn exact_segment_end_stays_on_the_segment() {
        let track = square(10.0);
        let mut state = RobotRaceState::new(Lane::ALL[0], 1.0);
        let first = track.segment_arc_length(0);
        state.advance_to(&track, first);
        assert_eq!(state.segment_index(), 0);
        assert!((state.local_t() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hundred_laps_without_drift() {
        let track = square(10.0);
        let lap = track.lap_length();
        let mut state = RobotRaceState::new(Lane::ALL[2], 7.5);
        let dt = 1.0 / 60.0;
        while state.distance() < 100.0 * lap + 0.5 * track.segment_arc_length(0) {
            state.advance(&track, dt);
            let into_segment = state.distance() - state.distance_before_segment();
            assert!(into_segment >= 0.0);
            assert!(into_segment <= track.segment_arc_length(state.segment_index()) * (1.0 + 1e-9));
        }
        assert_eq!(state.laps(), 100);
        assert_eq!(state.segment_index(), 0);
        let expected = 100.0 * lap;
        assert!(
            (state.distance_before_segment() - expected).abs() < expected * 1e-9,
            "{} vs {expected}",
            state.distance_before_segment()
        );
    }

    #[test]
    fn closing_segment_is_skipped() {
        let segments = vec![
            CurveSegment::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)),
            CurveSegment::line(DVec3::new(10.0, 0.0, 0.0), DVec3::new(10.0, 10.0, 0.0)),
            CurveSegment::line(DVec3::new(10.0, 10.0, 0.0), DVec3::ZERO),
        ];
        let track = Track::new("triangle", segments, 2, 100, 0.001).unwrap();
        let mut state = RobotRaceState::new(Lane::ALL[0], 1.0);
        state.advance_to(&track, 25.0);
        assert_eq!(state.segment_index(), 0);
        assert_eq!(state.laps(), 1);
        assert!((state.local_t() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn non_finite_distances_are_ignored() {
        let track = square(10.0);
        let mut state = RobotRaceState::new(Lane::ALL[0], 1.0);
        state.advance_to(&track, 12.0);
        let before = state.clone();
        state.advance_to(&track, f64::INFINITY);
        state.advance_to(&track, f64::NAN);
        assert_eq!(state, before);
    }

    #[test]
    fn speed_stays_within_bounds() {
        let config = RobotConfig {
            initial_speed: 10.0,
            speed_jitter: 5.0,
            min_speed: 8.0,
            max_speed: 12.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = RobotRaceState::new(Lane::ALL[0], config.initial_speed);
        for _ in 0..1_000 {
            state.perturb_speed(&mut rng, &config);
            assert!((8.0..=12.0).contains(&state.speed()));
        }
    }

    #[test]
    fn reset_returns_to_the_start() {
        let track = square(10.0);
        let mut state = RobotRaceState::new(Lane::ALL[3], 2.0);
        state.advance_to(&track, 57.0);
        state.reset();
        assert_eq!(state, RobotRaceState::new(Lane::ALL[3], 2.0));
    }
}
