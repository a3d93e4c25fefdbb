//! Tunable parameters of the race. Every field has a default, so a configuration file
//! only needs to name what it changes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::curve::{CurveKind, DEFAULT_TANGENT_STEP};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaceConfig {
    pub track: TrackConfig,
    pub robots: RobotConfig,
    pub gait: GaitConfig,
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// lateral distance between neighbouring lane centers
    pub lane_width: f64,
    /// chords summed per segment when measuring arc length
    pub arc_length_samples: u32,
    /// parameter step of forward-difference tangents
    pub tangent_step: f64,
    /// quad strip steps per segment when drawing
    pub draw_steps: u32,
    /// how far the side walls reach below the driving surface
    pub wall_depth: f64,
    /// arc length covered by one repetition of the track texture
    pub texture_length: f64,
    /// replaces the built-in custom track
    pub custom: Option<CustomTrackConfig>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            lane_width: 10.0,
            arc_length_samples: 100,
            tangent_step: DEFAULT_TANGENT_STEP,
            draw_steps: 64,
            wall_depth: 4.0,
            texture_length: 40.0,
            custom: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomTrackConfig {
    #[serde(default = "CustomTrackConfig::default_name")]
    pub name: String,
    pub segments: Vec<SegmentConfig>,
    /// Number of leading segments racers run on. All segments if absent.
    #[serde(default)]
    pub traversable: Option<usize>,
}

impl CustomTrackConfig {
    fn default_name() -> String {
        "custom".to_owned()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentConfig {
    pub kind: CurveKind,
    /// start, end, then the interior weights
    pub points: Vec<DVec3>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// track units per animation second
    pub initial_speed: f64,
    /// largest speed change per frame
    pub speed_jitter: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            initial_speed: 25.0,
            speed_jitter: 0.2,
            min_speed: 15.0,
            max_speed: 35.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaitConfig {
    /// peak hip swing in degrees
    pub max_angle: f64,
    /// stride duration in gait time units
    pub period: f64,
    /// animation time is scaled by `speed / speed_divisor`
    pub speed_divisor: f64,
    /// Phase of front-left, rear-right, front-right and rear-left, in periods.
    pub phase_offsets: [f64; 4],
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            max_angle: 35.0,
            period: 5.0,
            speed_divisor: 8.0,
            phase_offsets: [0.0, 0.4, 0.8, 1.2],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// animation seconds each view is held in auto mode
    pub auto_interval: f64,
    pub helicopter_offset: DVec3,
    pub motorcycle_distance: f64,
    pub first_person_back: f64,
    pub first_person_height: f64,
    /// how far ahead of the robot the first person view looks
    pub first_person_look_ahead: f64,
    /// orbit elevations whose cosine is at most this are nudged towards the horizon
    pub gimbal_epsilon: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            auto_interval: 4.0,
            helicopter_offset: DVec3::new(5.0, 5.0, 300.0),
            motorcycle_distance: 100.0,
            first_person_back: 15.0,
            first_person_height: 15.0,
            first_person_look_ahead: 100.0,
            gimbal_epsilon: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainConfig {
    /// half the side length of the square terrain
    pub extent: f64,
    /// grid cells along each side
    pub resolution: u32,
    pub height_scale: f64,
    /// spatial frequency multiplier of the height function
    pub frequency_scale: f64,
    pub water_level: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            extent: 400.0,
            resolution: 80,
            height_scale: 1.0,
            frequency_scale: 0.125,
            water_level: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: RaceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RaceConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: RaceConfig =
            serde_json::from_str(r#"{ "track": { "lane_width": 6.5 }, "gait": { "period": 2.0 } }"#)
                .unwrap();
        assert!((config.track.lane_width - 6.5).abs() < f64::EPSILON);
        assert_eq!(config.track.arc_length_samples, 100);
        assert!((config.gait.period - 2.0).abs() < f64::EPSILON);
        assert!((config.gait.max_angle - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_track_segments_parse() {
        let config: RaceConfig = serde_json::from_str(
            r#"{ "track": { "custom": {
                "segments": [
                    { "kind": "line", "points": [[0, 0, 1], [100, 0, 1]] },
                    { "kind": "quadratic_bezier", "points": [[100, 0, 1], [0, 0, 1], [50, 80, 1]] }
                ]
            } } }"#,
        )
        .unwrap();
        let custom = config.track.custom.unwrap();
        assert_eq!(custom.name, "custom");
        assert_eq!(custom.traversable, None);
        assert_eq!(custom.segments.len(), 2);
        assert_eq!(custom.segments[1].kind, CurveKind::QuadraticBezier);
        assert_eq!(custom.segments[1].points[2], DVec3::new(50.0, 80.0, 1.0));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<RaceConfig>(r#"{ "camera": { "zoom": 2 } }"#);
        assert!(result.is_err());
    }
}
