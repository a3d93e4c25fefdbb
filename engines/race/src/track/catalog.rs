use std::{
    f64::consts::FRAC_PI_2,
    fmt::{self, Display},
};

use glam::DVec3;

use super::Track;
use crate::{
    config::{CustomTrackConfig, TrackConfig},
    curve::CurveSegment,
    error::{RaceError, RaceResult},
};

/// Every track sits this far above the terrain's mean level.
const TRACK_HEIGHT: f64 = 1.0;

/// Distance of the cubic weights from the end points when approximating a quarter ellipse.
const QUARTER_ARC_WEIGHT: f64 = 0.552_284_749_8;

/// Selects one of the built-in tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TrackId {
    /// parametric oval for checking the lane math
    #[default]
    Test = 0,
    O = 1,
    L = 2,
    C = 3,
    Custom = 4,
}

impl TrackId {
    pub const ALL: [TrackId; 5] = [
        TrackId::Test,
        TrackId::O,
        TrackId::L,
        TrackId::C,
        TrackId::Custom,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self as u8)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TrackId::Test => "test",
            TrackId::O => "O-track",
            TrackId::L => "L-track",
            TrackId::C => "C-track",
            TrackId::Custom => "custom",
        }
    }
}

impl TryFrom<usize> for TrackId {
    type Error = RaceError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        TrackId::ALL
            .into_iter()
            .find(|id| id.index() == index)
            .ok_or(RaceError::UnknownTrack(index))
    }
}

impl Display for TrackId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// All selectable tracks, measured once.
#[derive(Clone, Debug)]
pub struct Tracks {
    test: Track,
    o: Track,
    l: Track,
    c: Track,
    custom: Track,
}

impl Tracks {
    /// # Errors
    ///
    /// Fails if the configured custom track is malformed.
    pub fn build(config: &TrackConfig) -> RaceResult<Self> {
        let samples = config.arc_length_samples;
        let step = config.tangent_step;

        let custom = match config.custom {
            Some(ref custom) => configured_track(custom, samples, step)?,
            None => Track::new(TrackId::Custom.name(), custom_segments(), 4, samples, step)?,
        };

        Ok(Self {
            test: Track::new(TrackId::Test.name(), test_oval_segments(), 4, samples, step)?
                .untextured(),
            o: Track::new(TrackId::O.name(), o_segments(), 4, samples, step)?,
            l: Track::new(TrackId::L.name(), l_segments(), 12, samples, step)?,
            c: Track::new(TrackId::C.name(), c_segments(), 4, samples, step)?,
            custom,
        })
    }

    #[must_use]
    pub fn get(&self, id: TrackId) -> &Track {
        match id {
            TrackId::Test => &self.test,
            TrackId::O => &self.o,
            TrackId::L => &self.l,
            TrackId::C => &self.c,
            TrackId::Custom => &self.custom,
        }
    }
}

fn configured_track(config: &CustomTrackConfig, samples: u32, step: f64) -> RaceResult<Track> {
    let segments = config
        .segments
        .iter()
        .map(|segment| CurveSegment::from_points(segment.kind, &segment.points))
        .collect::<RaceResult<Vec<_>>>()?;
    let traversable = config.traversable.unwrap_or(segments.len());
    Track::new(config.name.clone(), segments, traversable, samples, step)
}

fn at(x: f64, y: f64) -> DVec3 {
    DVec3::new(x, y, TRACK_HEIGHT)
}

/// `(100 cos 2πt, 140 sin 2πt)`, as four cubic quarter arcs running counterclockwise.
fn test_oval_segments() -> Vec<CurveSegment> {
    let (rx, ry) = (100.0, 140.0);
    (0..4_u8)
        .map(|quarter| {
            let (sin, cos) = (f64::from(quarter) * FRAC_PI_2).sin_cos();
            let (next_sin, next_cos) = (f64::from(quarter + 1) * FRAC_PI_2).sin_cos();
            let start = at(rx * cos, ry * sin);
            let end = at(rx * next_cos, ry * next_sin);
            // tangents at both ends, scaled for a quarter arc
            let start_direction = DVec3::new(-rx * sin, ry * cos, 0.0);
            let end_direction = DVec3::new(-rx * next_sin, ry * next_cos, 0.0);
            CurveSegment::cubic(
                start,
                end,
                start + start_direction * QUARTER_ARC_WEIGHT,
                end - end_direction * QUARTER_ARC_WEIGHT,
            )
        })
        .collect()
}

/// Two straights joined by cubic half turns.
fn o_segments() -> Vec<CurveSegment> {
    vec![
        CurveSegment::line(at(-100.0, -80.0), at(100.0, -80.0)),
        CurveSegment::cubic(
            at(100.0, -80.0),
            at(100.0, 80.0),
            at(207.0, -80.0),
            at(207.0, 80.0),
        ),
        CurveSegment::line(at(100.0, 80.0), at(-100.0, 80.0)),
        CurveSegment::cubic(
            at(-100.0, 80.0),
            at(-100.0, -80.0),
            at(-207.0, 80.0),
            at(-207.0, -80.0),
        ),
    ]
}

/// Straights with quadratic corners, one of them turning inwards.
fn l_segments() -> Vec<CurveSegment> {
    vec![
        CurveSegment::line(at(-150.0, -200.0), at(150.0, -200.0)),
        CurveSegment::quadratic(at(150.0, -200.0), at(200.0, -150.0), at(200.0, -200.0)),
        CurveSegment::line(at(200.0, -150.0), at(200.0, -50.0)),
        CurveSegment::quadratic(at(200.0, -50.0), at(150.0, 0.0), at(200.0, 0.0)),
        CurveSegment::line(at(150.0, 0.0), at(50.0, 0.0)),
        CurveSegment::quadratic(at(50.0, 0.0), at(0.0, 50.0), at(0.0, 0.0)),
        CurveSegment::line(at(0.0, 50.0), at(0.0, 150.0)),
        CurveSegment::quadratic(at(0.0, 150.0), at(-50.0, 200.0), at(0.0, 200.0)),
        CurveSegment::line(at(-50.0, 200.0), at(-150.0, 200.0)),
        CurveSegment::quadratic(at(-150.0, 200.0), at(-200.0, 150.0), at(-200.0, 200.0)),
        CurveSegment::line(at(-200.0, 150.0), at(-200.0, -150.0)),
        CurveSegment::quadratic(at(-200.0, -150.0), at(-150.0, -200.0), at(-200.0, -200.0)),
    ]
}

/// A wide outer arc over a hill, a cap, an inner arc and another cap.
fn c_segments() -> Vec<CurveSegment> {
    vec![
        CurveSegment::cubic(
            at(100.0, -150.0),
            at(100.0, 150.0),
            DVec3::new(-250.0, -150.0, 12.0),
            DVec3::new(-250.0, 150.0, 12.0),
        ),
        CurveSegment::cubic(
            at(100.0, 150.0),
            at(100.0, 70.0),
            at(150.0, 150.0),
            at(150.0, 70.0),
        ),
        CurveSegment::cubic(
            at(100.0, 70.0),
            at(100.0, -70.0),
            at(-60.0, 70.0),
            at(-60.0, -70.0),
        ),
        CurveSegment::cubic(
            at(100.0, -70.0),
            at(100.0, -150.0),
            at(150.0, -70.0),
            at(150.0, -150.0),
        ),
    ]
}

/// Cubic loop with a ramp up to a raised back straight and down again.
/// The last segment only closes the drawn band and is never raced on.
fn custom_segments() -> Vec<CurveSegment> {
    let raised = TRACK_HEIGHT + 7.0;
    vec![
        CurveSegment::cubic(
            at(-150.0, -100.0),
            DVec3::new(150.0, -100.0, raised),
            at(-50.0, -160.0),
            DVec3::new(50.0, -40.0, raised),
        ),
        CurveSegment::cubic(
            DVec3::new(150.0, -100.0, raised),
            DVec3::new(150.0, 100.0, raised),
            DVec3::new(270.0, -100.0, raised),
            DVec3::new(270.0, 100.0, raised),
        ),
        CurveSegment::cubic(
            DVec3::new(150.0, 100.0, raised),
            at(-150.0, 100.0),
            DVec3::new(50.0, 40.0, raised),
            at(-50.0, 160.0),
        ),
        CurveSegment::cubic(
            at(-150.0, 100.0),
            at(-150.0, -99.0),
            at(-270.0, 100.0),
            at(-270.0, -99.0),
        ),
        CurveSegment::line(at(-150.0, -99.0), at(-150.0, -100.0)),
    ]
}
