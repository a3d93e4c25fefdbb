use std::fmt::{self, Display};

use crate::curve::CurveKind;

pub type RaceResult<T> = Result<T, RaceError>;

/// Misconfiguration of the race. None of these are recoverable at runtime:
/// the indices and tables involved are fixed when the race is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceError {
    UnknownTrack(usize),
    UnknownCameraMode(usize),
    ControlPointCount {
        kind: CurveKind,
        expected: usize,
        found: usize,
    },
    EmptyTrack,
    Traversable {
        traversable: usize,
        segments: usize,
    },
    /// A traversable segment without length would stall every racer on it.
    DegenerateSegment {
        index: usize,
    },
}

impl Display for RaceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::UnknownTrack(index) => write!(formatter, "unknown track index {index}"),
            RaceError::UnknownCameraMode(index) => {
                write!(formatter, "unknown camera mode index {index}")
            }
            RaceError::ControlPointCount {
                kind,
                expected,
                found,
            } => write!(
                formatter,
                "a {kind} segment needs {expected} control points, but {found} were given"
            ),
            RaceError::EmptyTrack => write!(formatter, "a track needs at least one segment"),
            RaceError::Traversable {
                traversable,
                segments,
            } => write!(
                formatter,
                "{traversable} traversable segments requested, but the track has {segments}"
            ),
            RaceError::DegenerateSegment { index } => {
                write!(formatter, "traversable segment {index} has zero length")
            }
        }
    }
}

impl std::error::Error for RaceError {}
